//! Puts the RP2350 memory layout where `cortex-m-rt`'s `link.x` expects to
//! find `memory.x`.

use std::env;
use std::fs;
use std::path::PathBuf;

const MEMORY_SCRIPT: &str = "rp2350.x";

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    fs::copy(MEMORY_SCRIPT, out_dir.join("memory.x"))
        .unwrap_or_else(|e| panic!("Failed to copy {MEMORY_SCRIPT} to memory.x: {e}"));

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed={MEMORY_SCRIPT}");
    println!("cargo:rerun-if-changed=build.rs");
}
