//! Generate `include/fx_ffi.h` for C hosts.

use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    let crate_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string()));
    let include_dir = crate_dir.join("include");

    let bindings = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("FX_FFI_H")
        .generate();

    match bindings {
        Ok(bindings) => {
            if let Err(err) = std::fs::create_dir_all(&include_dir) {
                println!("cargo:warning=could not create {}: {err}", include_dir.display());
                return;
            }
            bindings.write_to_file(include_dir.join("fx_ffi.h"));
        }
        Err(err) => println!("cargo:warning=header generation skipped: {err}"),
    }
}
