//! Runs the generator over `schema/e2e.json` for both backends.
//!
//! Output layout under `OUT_DIR`:
//!
//! - `heavy/e2e.pb.rs`, `heavy/e2e.pb.thunks.cc`
//! - `light/e2e.pb.rs`
//! - `bridge/catalog.rs`

use anyhow::{Context, Result};
use protobridge_codegen::logging::init_logging;
use protobridge_codegen::{
    Backend, GeneratorOptions, SchemaSet, generate_to_dir, write_catalog,
};
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    let manifest_dir =
        PathBuf::from(env::var("CARGO_MANIFEST_DIR").context("CARGO_MANIFEST_DIR is not set")?);
    let out_dir = PathBuf::from(env::var("OUT_DIR").context("OUT_DIR is not set")?);

    let schema_path = manifest_dir.join("schema").join("e2e.json");
    let options_path = manifest_dir.join("codegen.toml");
    println!("cargo:rerun-if-changed={}", schema_path.display());
    println!("cargo:rerun-if-changed={}", options_path.display());

    let base = GeneratorOptions::from_file(&options_path)?;
    init_logging(&base.log_level);
    let schema = SchemaSet::from_file(&schema_path)?;

    for backend in [Backend::Heavy, Backend::Light] {
        let opts = GeneratorOptions {
            backend,
            ..base.clone()
        };
        let written = generate_to_dir(&schema, &opts, &out_dir.join(backend.as_str()), "e2e")
            .with_context(|| format!("Failed to generate {backend} wrappers"))?;
        tracing::info!(%backend, files = written.len(), "generated e2e wrappers");
    }

    write_catalog(&base, &out_dir.join("bridge").join("catalog.rs"))?;
    Ok(())
}
