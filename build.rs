#![allow(dead_code)]

use std::env;
use std::path::PathBuf;

#[path = "src/error.rs"]
mod error;
#[path = "src/registry.rs"]
mod registry;
#[path = "src/config.rs"]
mod config;
#[path = "src/codegen.rs"]
mod codegen;

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    println!("cargo:rerun-if-changed=src/error.rs");
    println!("cargo:rerun-if-changed=src/registry.rs");
    println!("cargo:rerun-if-changed=src/codegen.rs");
    println!("cargo:rerun-if-changed=src/config.rs");
    println!("cargo:rerun-if-changed={}", config::CONFIG_FILE);
    for key in [config::ENV_GUILE_VERSION, config::ENV_INCLUDE_DIRS, config::ENV_LIB] {
        println!("cargo:rerun-if-env-changed={}", key);
    }

    // A registry entry the generators cannot express fails the build here,
    // not at the first call.
    if let Err(err) = registry::validate(registry::PRIMITIVES) {
        panic!("invalid primitive registry: {}", err);
    }

    let config = config::ShimConfig::from_env(&manifest_dir)
        .unwrap_or_else(|err| panic!("{}", err));

    let artifacts = codegen::write_artifacts(&out_dir, registry::PRIMITIVES, &config.codegen)
        .unwrap_or_else(|err| panic!("failed to write generated proxies: {}", err));

    if env::var_os("CARGO_FEATURE_GUILE").is_none() {
        return;
    }

    let mut build = cc::Build::new();
    for dir in config.guile.include_search() {
        build.include(dir);
    }
    build
        .file(&artifacts.source)
        .flag_if_supported("-std=c99")
        .warnings(false)
        .compile("guile_shim");

    println!("cargo:rustc-link-search=native={}", out_dir.display());
    println!("cargo:rustc-link-lib=static=guile_shim");
    println!("cargo:rustc-link-lib={}", config.guile.library());
}
