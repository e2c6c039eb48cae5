//! Build script for storefront crate.
//!
//! Generates a content hash for the gate script so the snippet can reference
//! it with a cache-busting query string.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    hash_gate_script();
}

/// Hash `country_blocker.js`.
///
/// Sets `ASSET_HASH` environment variable for use with `env!("ASSET_HASH")`.
fn hash_gate_script() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let js_path = Path::new(&manifest_dir).join("static/js/country_blocker.js");

    println!("cargo:rerun-if-changed={}", js_path.display());

    let content = match fs::read(&js_path) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read country_blocker.js: {e}");
            println!("cargo:rustc-env=ASSET_HASH=");
            return;
        }
    };

    // First 8 chars of SHA256
    let mut hasher = Sha256::new();
    hasher.update(&content);
    let hash = format!("{:x}", hasher.finalize());
    let short_hash = hash.get(..8).unwrap_or(&hash);

    println!("cargo:rustc-env=ASSET_HASH={short_hash}");
}
