//! polypack CLI - HTML polyglot builder
//!
//! A command-line interface for the polypack library.
//! Wraps a payload as a ZIP archive or a PNG image that also loads as HTML,
//! and breaks compressed streams down into per-symbol bit costs.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

use polypack::compress::{CompressOptions, Compressor, Flate2Compressor};
use polypack::decode::{self, DeflateBlock};
use polypack::{png, zip, Format};

/// Build files that are both a container and an HTML document.
#[derive(Parser, Debug)]
#[command(name = "polypack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress INPUT and wrap it as a single-entry ZIP archive
    Zip {
        /// File to store
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file path (defaults to INPUT with a .zip extension)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Entry name inside the archive (defaults to the input file name)
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        compression: CompressionArgs,
    },
    /// Store INPUT as one row of grayscale pixels and append a bootstrap
    Png {
        /// Payload to store in the image
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// File holding the bootstrap markup
        #[arg(short, long, value_name = "FILE", conflicts_with = "eval")]
        bootstrap: Option<PathBuf>,

        /// Bootstrap markup given inline
        #[arg(short, long, value_name = "TEXT")]
        eval: Option<String>,

        /// Output file path (defaults to INPUT with a .png extension)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        #[command(flatten)]
        compression: CompressionArgs,
    },
    /// Decode a compressed stream and report its blocks
    Inspect {
        /// Compressed stream
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Framing around the DEFLATE data
        #[arg(short, long, value_enum, default_value = "raw")]
        format: FormatArg,

        /// Print every block as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Show per-block details
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(ClapArgs, Debug)]
struct CompressionArgs {
    /// Compression preset (explicit flags below override it)
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,

    /// Number of compressor iterations (the built-in flate2 compressor
    /// maps this to its level, 1..=9)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    iterations: Option<u32>,

    /// Disable block splitting (ignored by the built-in flate2 compressor)
    #[arg(long)]
    no_block_splitting: bool,

    /// Maximum number of block splits (ignored by the built-in flate2
    /// compressor)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    block_splitting_max: Option<u32>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl CompressionArgs {
    fn to_options(&self) -> CompressOptions {
        let mut options = match self.preset {
            Some(PresetArg::Fast) => CompressOptions::fast(),
            Some(PresetArg::Balanced) | None => CompressOptions::balanced(),
            Some(PresetArg::Max) => CompressOptions::max_compression(),
        };
        if let Some(iterations) = self.iterations {
            options.iterations = iterations;
        }
        if self.no_block_splitting {
            options.block_splitting = false;
        }
        if let Some(max) = self.block_splitting_max {
            options.block_splitting_max = max;
        }
        options.verbose = self.verbose;
        options
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetArg {
    /// Single iteration
    Fast,
    /// Default settings
    Balanced,
    /// Many iterations
    Max,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// RFC 1952 gzip
    Gzip,
    /// RFC 1950 zlib
    Zlib,
    /// Bare DEFLATE
    Raw,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Gzip => Format::Gzip,
            FormatArg::Zlib => Format::Zlib,
            FormatArg::Raw => Format::Raw,
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        Command::Zip {
            input,
            output,
            name,
            compression,
        } => run_zip(&input, output, name, &compression),
        Command::Png {
            input,
            bootstrap,
            eval,
            output,
            compression,
        } => {
            let bootstrap = match (bootstrap, eval) {
                (Some(path), _) => fs::read(path)?,
                (None, Some(text)) => text.into_bytes(),
                (None, None) => return Err("either --bootstrap or --eval is required".into()),
            };
            run_png(&input, output, &bootstrap, &compression)
        }
        Command::Inspect {
            input,
            format,
            json,
            verbose,
        } => run_inspect(&input, format.into(), json, verbose),
    }
}

fn run_zip(
    input: &Path,
    output: Option<PathBuf>,
    name: Option<String>,
    args: &CompressionArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let name = match name {
        Some(name) => name,
        None => input
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_owned)
            .ok_or("cannot derive an entry name from the input path, use --name")?,
    };
    let options = args.to_options();

    let start = Instant::now();
    let deflated = Flate2Compressor.compress(&data, Format::Raw, &options)?;
    let archive = zip::build_zip(&name, &data, &deflated)?;
    let elapsed = start.elapsed();

    let output_path = output.unwrap_or_else(|| input.with_extension("zip"));
    fs::write(&output_path, &archive)?;

    if args.verbose {
        eprintln!("Output: {:?}", output_path);
        eprintln!("  Entry: {}", name);
        eprintln!(
            "  Level: {} ({} iterations)",
            Flate2Compressor::level(&options).level(),
            options.iterations
        );
        eprintln!(
            "  Deflated: {} -> {}",
            format_size(data.len() as u64),
            format_size(deflated.len() as u64)
        );
        eprintln!("  Build time: {:.2?}", elapsed);
    }
    println!(
        "{} -> {}",
        format_size(data.len() as u64),
        format_size(archive.len() as u64)
    );
    Ok(())
}

fn run_png(
    input: &Path,
    output: Option<PathBuf>,
    bootstrap: &[u8],
    args: &CompressionArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let options = args.to_options();

    let start = Instant::now();
    let idat = png::compress_idat(&Flate2Compressor, &data, &options)?;
    let (image, overlap) = png::build_png_with_overlap(idat.width, &idat.compressed, bootstrap)?;
    let elapsed = start.elapsed();

    let output_path = output.unwrap_or_else(|| input.with_extension("png"));
    fs::write(&output_path, &image)?;

    if args.verbose {
        eprintln!("Output: {:?}", output_path);
        eprintln!("  Width: {}", idat.width);
        eprintln!("  Filter: {:?}", idat.filter);
        eprintln!("  IDAT: {}", format_size(idat.compressed.len() as u64));
        eprintln!("  Bootstrap: {:?}", overlap);
        eprintln!("  Build time: {:.2?}", elapsed);
    }
    println!(
        "{} -> {}",
        format_size(data.len() as u64),
        format_size(image.len() as u64)
    );
    Ok(())
}

fn run_inspect(
    input: &Path,
    format: Format,
    json: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let blocks = decode::inspect(format, &data)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&blocks)?);
        return Ok(());
    }

    if verbose {
        for (i, block) in blocks.iter().enumerate() {
            print_block(i, block);
        }
    }

    let summary = decode::summarize(&blocks);
    println!("format:   {}", format.name());
    println!("blocks:   {}", summary.blocks);
    println!("entries:  {}", summary.entries);
    println!("produced: {}", format_size(summary.produced_len as u64));
    println!(
        "bits:     {} ({} payload, {} overhead)",
        summary.total_bits(),
        summary.payload_bits,
        summary.overhead_bits
    );
    Ok(())
}

fn print_block(index: usize, block: &DeflateBlock) {
    eprintln!(
        "block {}: {:?}, {} entries, {} bits ({} overhead), {} bytes",
        index,
        block.kind,
        block.entries.len(),
        block.total_bits(),
        block.overhead_bits,
        block.produced_len()
    );
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
