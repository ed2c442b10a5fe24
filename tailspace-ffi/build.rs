// Build script that tries to generate the C header with `cbindgen`.
// If `cbindgen` is not installed it falls back to copying the checked-in
// `include/tailspace.h` to $OUT_DIR.
//
// Consumers can include the header from:
//   - <repo>/tailspace-ffi/include/tailspace.h   (checked-in)
//   - $OUT_DIR/tailspace.h

use std::{env, fs, path::PathBuf, process::Command};

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=include/tailspace.h");

    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"));
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));
    let header_repo = crate_dir.join("include").join("tailspace.h");
    let header_out = out_dir.join("tailspace.h");

    let cbindgen_ok = Command::new("cbindgen")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);

    if cbindgen_ok {
        let generated = Command::new("cbindgen")
            .args(["--crate", "tailspace-ffi", "--lang", "C", "--output"])
            .arg(&header_out)
            .current_dir(&crate_dir)
            .status()
            .map(|s| s.success())
            .unwrap_or(false);
        if generated {
            println!("cargo:warning=tailspace-ffi: generated header with cbindgen -> {}", header_out.display());
            return;
        }
        println!("cargo:warning=tailspace-ffi: cbindgen failed; using checked-in header");
    }

    // The checked-in header is the source of truth when cbindgen is absent.
    fs::copy(&header_repo, &header_out).expect("failed to copy include/tailspace.h to OUT_DIR");
}
