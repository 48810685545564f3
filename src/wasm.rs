//! WebAssembly bindings for polypack.
//!
//! Exposes the container builders and the DEFLATE inspector to a web front
//! end that runs the compressor itself.
//!
//! # Building
//!
//! ```bash
//! rustup target add wasm32-unknown-unknown
//! cargo install wasm-bindgen-cli
//!
//! cargo build --target wasm32-unknown-unknown --release --features wasm
//! wasm-bindgen --target web --out-dir web/src/lib/polypack-wasm --out-name polypack \
//!   target/wasm32-unknown-unknown/release/polypack.wasm
//! ```
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { buildZip, buildPng, inspectDeflate } from 'polypack';
//!
//! await init();
//!
//! const zip = buildZip('index.html', inflated, deflated);
//! const png = buildPng(width, idat, '<script>...</script>');
//! const blocks = JSON.parse(inspectDeflate(1, idat));
//! ```

// Use talc allocator for WASM - smaller binary and proper memory management.
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
#[global_allocator]
static ALLOC: talc::TalckWasm = unsafe { talc::TalckWasm::new_global() };

use wasm_bindgen::prelude::*;

use crate::decode;
use crate::format::Format;
use crate::png;
use crate::zip;

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// Convert a u8 format code to a [`Format`].
fn format_from_u8(value: u8) -> Result<Format, JsError> {
    Format::try_from(value).map_err(|v| {
        JsError::new(&format!(
            "Invalid format: {v}. Expected 0 (gzip), 1 (zlib), or 2 (raw)",
        ))
    })
}

/// Build a single-entry ZIP archive.
///
/// * `filename` - Entry name, `[0-9A-Za-z-._]+`
/// * `inflated` - Uncompressed data (for the CRC and size fields)
/// * `deflated` - Raw DEFLATE stream of `inflated`
#[wasm_bindgen(js_name = "buildZip")]
pub fn build_zip(filename: &str, inflated: &[u8], deflated: &[u8]) -> Result<Vec<u8>, JsError> {
    zip::build_zip(filename, inflated, deflated).map_err(js_error)
}

/// Build a PNG that is also an HTML document.
///
/// * `width` - Scanline length in pixels
/// * `deflated` - zlib stream of the filtered scanline
/// * `bootstrap` - Markup appended after the image, starting with `<`
#[wasm_bindgen(js_name = "buildPng")]
pub fn build_png(width: u32, deflated: &[u8], bootstrap: &str) -> Result<Vec<u8>, JsError> {
    png::build_png(width, deflated, bootstrap.as_bytes()).map_err(js_error)
}

/// Decode a compressed stream into blocks, returned as JSON.
///
/// * `format` - 0=gzip, 1=zlib, 2=raw
#[wasm_bindgen(js_name = "inspectDeflate")]
pub fn inspect_deflate(format: u8, data: &[u8]) -> Result<String, JsError> {
    let format = format_from_u8(format)?;
    let blocks = decode::inspect(format, data).map_err(js_error)?;
    serde_json::to_string(&blocks).map_err(js_error)
}

// JsError can only be constructed on wasm32 targets; the functions above are
// thin wrappers and their logic is tested natively in the respective modules.
#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;

    #[test]
    fn test_build_png_signature() {
        let idat = [0x78, 0x01, 0x03, 0x00, 0x00, 0x00, 0x00, 0x01];
        let png = build_png(1, &idat, "<p>").unwrap();
        assert_eq!(&png[0..8], &png::PNG_SIGNATURE);
    }

    #[test]
    fn test_invalid_format() {
        assert!(inspect_deflate(9, &[]).is_err());
    }

    #[test]
    fn test_build_zip_rejects_bad_name() {
        assert!(build_zip("a/b", b"", &[0x03, 0x00]).is_err());
    }
}
