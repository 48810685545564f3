//! Component-level microbenchmarks for polypack.
//! Focuses on checksums, stream inspection, and overlap analysis.

use std::io::Write;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flate2::write::{DeflateEncoder, ZlibEncoder};
use flate2::Compression;
use polypack::compress::crc32;
use polypack::html::overlap_or_close;
use polypack::{decode, png, zip, Format};

fn make_pattern(len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let pattern = b"<p>The quick brown fox jumps over the lazy dog.</p>\n";
    while out.len() < len {
        out.extend_from_slice(pattern);
    }
    out.truncate(len);
    out
}

fn make_random(len: usize, mut seed: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
        out.push((seed >> 16) as u8);
    }
    out.truncate(len);
    out
}

fn raw_deflate(data: &[u8]) -> Vec<u8> {
    let mut e = DeflateEncoder::new(Vec::new(), Compression::best());
    e.write_all(data).unwrap();
    e.finish().unwrap()
}

fn zlib(data: &[u8]) -> Vec<u8> {
    let mut e = ZlibEncoder::new(Vec::new(), Compression::best());
    e.write_all(data).unwrap();
    e.finish().unwrap()
}

fn bench_crc32(c: &mut Criterion) {
    let data = make_random(1 << 20, 0xDEAD_BEEF);
    let mut group = c.benchmark_group("crc32");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("1MiB", |b| b.iter(|| crc32(black_box(&data))));
    group.finish();
}

fn bench_inspect(c: &mut Criterion) {
    let mut group = c.benchmark_group("inspect");
    for (name, data) in [
        ("pattern", make_pattern(1 << 18)),
        ("random", make_random(1 << 18, 0x1234_5678)),
    ] {
        let stream = raw_deflate(&data);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("raw", name), &stream, |b, s| {
            b.iter(|| decode::inspect(Format::Raw, black_box(s)).unwrap())
        });
    }
    group.finish();
}

fn bench_overlap(c: &mut Criterion) {
    let bootstrap = b"<script>eval(document.body.textContent)</script>";
    let mut group = c.benchmark_group("overlap");
    for len in [1usize << 10, 1 << 16] {
        // compressed bytes are a realistic, markup-free prefix
        let prefix = zlib(&make_random(len, 7));
        group.throughput(Throughput::Bytes(prefix.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &prefix, |b, p| {
            b.iter(|| overlap_or_close(black_box(p), bootstrap))
        });
    }
    group.finish();
}

fn bench_containers(c: &mut Criterion) {
    let data = make_pattern(1 << 16);
    let deflated = raw_deflate(&data);
    let idat = zlib(&data);
    let mut group = c.benchmark_group("containers");
    group.bench_function("zip", |b| {
        b.iter(|| zip::build_zip(black_box("index.html"), &data, &deflated).unwrap())
    });
    group.bench_function("png", |b| {
        b.iter(|| png::build_png(data.len() as u32, black_box(&idat), b"<p>"))
    });
    group.finish();
}

criterion_group!(benches, bench_crc32, bench_inspect, bench_overlap, bench_containers);
criterion_main!(benches);
