//! protobridge-codegen - Generator for protobridge message wrappers
//!
//! Given a [`SchemaSet`] and [`GeneratorOptions`], produces:
//!
//! - Rust source for every message: owning type, view, cursor, accessors and
//!   the foreign declarations of the thunks they call
//! - C++ source defining those thunks (heavy backend only)
//! - once per build, the declaration catalog of the container bridge
//!   ([`bridge::generate_catalog`])
//!
//! Unsupported schema items are skipped and reported in
//! [`GeneratedUnit::diagnostics`]; generation of everything else continues.
//!
//! # Example
//!
//! ```
//! use protobridge_codegen::{Backend, GeneratorOptions, SchemaSet, generate};
//!
//! let schema = SchemaSet::from_json(r#"{
//!     "package": "demo",
//!     "messages": [{ "name": "Ping", "fields": [{ "name": "seq", "number": 1, "kind": "uint64" }] }]
//! }"#).unwrap();
//!
//! let unit = generate(&schema, &GeneratorOptions::new(Backend::Light)).unwrap();
//!
//! assert!(unit.rust_source().contains("pub struct Ping {"));
//! assert!(unit.cc_source().is_none());
//! ```

pub mod accessors;
pub mod backend;
pub mod bridge;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod message;
pub mod naming;
pub mod oneof;
pub mod printer;
pub mod schema;
pub mod thunks;

pub use backend::{Backend, BackendStrategy};
pub use config::GeneratorOptions;
pub use context::Diagnostic;
pub use error::{CodegenError, CodegenResult};
pub use schema::SchemaSet;

use anyhow::Context as _;
use context::Context;
use message::{claim_type_names, emit_message, plan_message};
use schema::SchemaTable;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thunks::emit_thunks;

/// Generated code for one top-level message and everything nested in it
#[derive(Debug, Clone)]
pub struct GeneratedMessage {
    pub full_name: String,
    pub rust: String,
    /// Heavy backend only
    pub cc: Option<String>,
}

/// Output of one generator run
#[derive(Debug, Clone)]
pub struct GeneratedUnit {
    pub backend: Backend,
    pub package: String,
    /// Header included by the C++ thunks
    pub cc_header: String,
    /// Top-level messages in declaration order
    pub messages: Vec<GeneratedMessage>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GeneratedUnit {
    /// The whole Rust source of the unit
    pub fn rust_source(&self) -> String {
        let mut out = format!(
            "// Generated by protobridge-codegen ({} backend). Do not edit.\n// package: {}\n",
            self.backend, self.package
        );
        for message in &self.messages {
            out.push('\n');
            out.push_str(&message.rust);
        }
        out
    }

    /// The whole C++ thunk source of the unit, heavy backend only
    pub fn cc_source(&self) -> Option<String> {
        if !self.backend.strategy().emits_cc_thunks() {
            return None;
        }
        let mut out = format!(
            "// Generated by protobridge-codegen ({} backend). Do not edit.\n// package: {}\n\n#include \"protobridge/cpp_api.h\"\n#include \"{}\"\n",
            self.backend, self.package, self.cc_header
        );
        for cc in self.messages.iter().filter_map(|m| m.cc.as_deref()) {
            out.push('\n');
            out.push_str(cc);
        }
        Some(out)
    }
}

/// Generate wrappers for every message of `schema`.
///
/// Runs are deterministic: the same input always yields the same text.
pub fn generate(schema: &SchemaSet, opts: &GeneratorOptions) -> CodegenResult<GeneratedUnit> {
    opts.validate()?;
    let table = SchemaTable::build(schema)?;
    let ctx = Context::new(opts, &table);
    tracing::debug!(
        package = %table.package(),
        messages = table.len(),
        backend = %opts.backend,
        "generating unit"
    );

    let mut plans = Vec::new();
    let mut root_items = BTreeSet::new();
    for info in table.roots() {
        if let Some(plan) = plan_message(&ctx, info)? {
            claim_type_names(&mut root_items, "the crate root", &plan)?;
            plans.push(plan);
        }
    }

    let mut messages = Vec::with_capacity(plans.len());
    for plan in &plans {
        let cc = if ctx.strategy.emits_cc_thunks() {
            Some(emit_thunks(&ctx, plan)?)
        } else {
            None
        };
        messages.push(GeneratedMessage {
            full_name: plan.info.full_name.clone(),
            rust: emit_message(&ctx, plan)?,
            cc,
        });
    }

    let diagnostics = ctx.into_diagnostics();
    if !diagnostics.is_empty() {
        tracing::info!(skipped = diagnostics.len(), "some schema items were not generated");
    }

    Ok(GeneratedUnit {
        backend: opts.backend,
        package: table.package().to_string(),
        cc_header: opts.cc_header_for(table.package()),
        messages,
        diagnostics,
    })
}

/// Generate `schema` and write `<stem>.pb.rs`, plus `<stem>.pb.thunks.cc` for
/// the heavy backend, into `dir`. Returns the written paths.
pub fn generate_to_dir(
    schema: &SchemaSet,
    opts: &GeneratorOptions,
    dir: &Path,
    stem: &str,
) -> anyhow::Result<Vec<PathBuf>> {
    let unit = generate(schema, opts)
        .with_context(|| format!("Failed to generate package `{}`", schema.package))?;

    fs::create_dir_all(dir).with_context(|| format!("Failed to create directory: {dir:?}"))?;

    let mut written = Vec::new();
    let rs_path = dir.join(format!("{stem}.pb.rs"));
    fs::write(&rs_path, unit.rust_source())
        .with_context(|| format!("Failed to write {rs_path:?}"))?;
    written.push(rs_path);

    if let Some(cc) = unit.cc_source() {
        let cc_path = dir.join(format!("{stem}.pb.thunks.cc"));
        fs::write(&cc_path, cc).with_context(|| format!("Failed to write {cc_path:?}"))?;
        written.push(cc_path);
    }

    Ok(written)
}

/// Write the container bridge catalog to `path`
pub fn write_catalog(opts: &GeneratorOptions, path: &Path) -> anyhow::Result<()> {
    let catalog = bridge::generate_catalog(opts).context("Failed to generate bridge catalog")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {parent:?}"))?;
    }
    fs::write(path, catalog).with_context(|| format!("Failed to write {path:?}"))
}
