//! polypack-web - WebAssembly binary for the polyglot builders
//!
//! This binary provides the WASM entrypoint for the polypack library.
//! Build with: cargo build --bin polypack-web --target wasm32-unknown-unknown --release --features wasm

#[cfg(feature = "wasm")]
pub use polypack::wasm::*;

#[cfg(not(feature = "wasm"))]
fn main() {
    eprintln!("polypack-web requires the 'wasm' feature.");
    eprintln!("Build with: cargo build --bin polypack-web --target wasm32-unknown-unknown --release --features wasm");
    std::process::exit(1);
}

/// Dummy main for wasm32 target (wasm-bindgen handles the entry point).
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
fn main() {}

#[cfg(all(feature = "wasm", not(target_arch = "wasm32")))]
fn main() {
    eprintln!("polypack-web is designed for WASM targets.");
    eprintln!("Build with: cargo build --bin polypack-web --target wasm32-unknown-unknown --release --features wasm");
    std::process::exit(1);
}
