//! Per-run generation state shared by the message, field and oneof generators

use crate::backend::BackendStrategy;
use crate::config::GeneratorOptions;
use crate::error::CodegenResult;
use crate::naming::{EntryPoint, NameOwner, NameRegistry, thunk_name};
use crate::printer;
use crate::schema::SchemaTable;
use serde::Serialize;
use std::cell::RefCell;
use std::fmt;

/// A schema item that was skipped instead of generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// e.g. `e2e.Outer.tags`
    pub subject: String,
    pub reason: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skipped {}: {}", self.subject, self.reason)
    }
}

pub struct Context<'a> {
    pub opts: &'a GeneratorOptions,
    pub table: &'a SchemaTable<'a>,
    pub strategy: &'static dyn BackendStrategy,
    names: RefCell<NameRegistry>,
    diagnostics: RefCell<Vec<Diagnostic>>,
    pb: String,
    pbi: String,
    pbr: String,
}

impl<'a> Context<'a> {
    pub fn new(opts: &'a GeneratorOptions, table: &'a SchemaTable<'a>) -> Self {
        let strategy = opts.backend.strategy();
        let pb = opts.runtime_crate.clone();
        Self {
            opts,
            table,
            strategy,
            names: RefCell::new(NameRegistry::new()),
            diagnostics: RefCell::new(Vec::new()),
            pbi: format!("{pb}::__internal"),
            pbr: format!("{pb}::__runtime::{}", strategy.runtime_module()),
            pb,
        }
    }

    /// Path of the runtime's internal module
    pub fn pbi(&self) -> &str {
        &self.pbi
    }

    /// Render a template with the runtime path variables bound
    pub fn render(&self, template: &str, vars: &[(&str, &str)]) -> CodegenResult<String> {
        let mut all = Vec::with_capacity(vars.len() + 3);
        all.push(("pb", self.pb.as_str()));
        all.push(("pbi", self.pbi.as_str()));
        all.push(("pbr", self.pbr.as_str()));
        all.extend_from_slice(vars);
        printer::render(template, &all)
    }

    /// Symbol name for `entry`, recorded so that no other entry point can
    /// claim it in this run
    pub fn thunk(&self, entry: EntryPoint) -> CodegenResult<String> {
        let name = thunk_name(&entry);
        self.names
            .borrow_mut()
            .register(&name, NameOwner::Thunk(entry))?;
        Ok(name)
    }

    /// Path of a generated message type from the crate root
    pub fn type_path(&self, rust_path: &str) -> String {
        format!("{}::{rust_path}", self.opts.crate_root)
    }

    pub fn skip(&self, subject: &str, reason: &str) {
        tracing::warn!(subject, reason, "skipping unsupported schema item");
        self.diagnostics.borrow_mut().push(Diagnostic {
            subject: subject.to_string(),
            reason: reason.to_string(),
        });
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_inner()
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("backend", &self.strategy.backend())
            .field("package", &self.table.package())
            .field("names", &self.names.borrow().len())
            .field("diagnostics", &self.diagnostics.borrow().len())
            .finish()
    }
}
