//! Generator configuration

use crate::backend::Backend;
use crate::error::{CodegenError, CodegenResult};
use crate::naming::is_identifier;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for one generator run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorOptions {
    /// Native backend the generated code links against
    #[serde(default)]
    pub backend: Backend,

    /// Path prefix under which generated messages are reachable
    ///
    /// Submessage accessors and oneof case enums name their types through
    /// this prefix, e.g. `crate::Outer_::Inner`.
    #[serde(default = "default_crate_root")]
    pub crate_root: String,

    /// Path of the runtime crate as seen from the generated code
    #[serde(default = "default_runtime_crate")]
    pub runtime_crate: String,

    /// Header declaring the native message classes, included by the emitted
    /// thunks (heavy backend only). Defaults to `<package path>.pb.h`.
    #[serde(default)]
    pub cc_header: Option<String>,

    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_crate_root() -> String {
    "crate".to_string()
}

fn default_runtime_crate() -> String {
    "::protobridge".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            crate_root: default_crate_root(),
            runtime_crate: default_runtime_crate(),
            cc_header: None,
            log_level: default_log_level(),
        }
    }
}

impl GeneratorOptions {
    /// Default options for `backend`
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }

    /// Parse options from TOML text. Empty input yields the defaults.
    pub fn from_toml(text: &str) -> CodegenResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let opts: Self = toml::from_str(text).map_err(|e| CodegenError::Config(e.to_string()))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Load options from a TOML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {path:?}"))?;
        Self::from_toml(&text).with_context(|| format!("Failed to load options from {path:?}"))
    }

    /// Check that the configured paths are usable in generated code
    pub fn validate(&self) -> CodegenResult<()> {
        if !is_rust_path(&self.crate_root) {
            return Err(CodegenError::Config(format!(
                "crate_root `{}` is not a Rust path",
                self.crate_root
            )));
        }
        if !is_rust_path(&self.runtime_crate) {
            return Err(CodegenError::Config(format!(
                "runtime_crate `{}` is not a Rust path",
                self.runtime_crate
            )));
        }
        Ok(())
    }

    /// Header included by the emitted thunks for `package`
    pub fn cc_header_for(&self, package: &str) -> String {
        match &self.cc_header {
            Some(header) => header.clone(),
            None if package.is_empty() => "messages.pb.h".to_string(),
            None => format!("{}.pb.h", package.replace('.', "/")),
        }
    }
}

fn is_rust_path(path: &str) -> bool {
    let path = path.strip_prefix("::").unwrap_or(path);
    !path.is_empty() && path.split("::").all(is_identifier)
}
