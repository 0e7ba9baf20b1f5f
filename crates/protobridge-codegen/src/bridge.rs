//! Foreign declarations of the container bridge
//!
//! The bridge functions are exported by `protobridge-containers`. The catalog
//! declares all of them in one `__pb_bridge` module so generated code and
//! native callers share one list of names and signatures. It is emitted once
//! per build rather than per message.

use crate::config::GeneratorOptions;
use crate::error::CodegenResult;
use crate::naming::{BridgeEntryPoint, MapOp, NameOwner, NameRegistry, RepeatedOp};
use crate::printer::render;

/// Rust declarations of every container bridge entry point
pub fn generate_catalog(opts: &GeneratorOptions) -> CodegenResult<String> {
    opts.validate()?;
    let pbi = format!("{}::__internal", opts.runtime_crate);

    let mut registry = NameRegistry::new();
    let mut decls = Vec::new();
    for entry in BridgeEntryPoint::all() {
        let name = entry.name();
        registry.register(&name, NameOwner::Bridge(entry))?;
        decls.push(format!("pub fn {name}{};", signature(&entry, &pbi)));
    }
    tracing::debug!(entry_points = registry.len(), "emitting bridge catalog");

    render(
        r#"
            #[allow(non_snake_case, dead_code)]
            pub mod __pb_bridge {
                unsafe extern "C" {
                    $decls$
                }
            }
        "#,
        &[("decls", decls.join("\n").as_str())],
    )
}

/// Parameter list and return type of `entry`
fn signature(entry: &BridgeEntryPoint, pbi: &str) -> String {
    match *entry {
        BridgeEntryPoint::Repeated { elem, op } => {
            let field = format!("{pbi}::RawRepeatedField");
            let t = elem.ffi_type(pbi);
            match op {
                RepeatedOp::New => format!("() -> {field}"),
                RepeatedOp::Add => format!("(r: {field}, val: {t})"),
                RepeatedOp::Size => format!("(r: {field}) -> usize"),
                RepeatedOp::Get => format!("(r: {field}, index: usize) -> {t}"),
                RepeatedOp::Set => format!("(r: {field}, index: usize, val: {t})"),
                RepeatedOp::CopyFrom => format!("(src: {field}, dst: {field})"),
                RepeatedOp::Free => format!("(r: {field})"),
            }
        }
        BridgeEntryPoint::Map { key, value, op } => {
            let map = format!("{pbi}::RawMap");
            let k = key.ffi_type(pbi);
            let v = value.ffi_type(pbi);
            match op {
                MapOp::New => format!("() -> {map}"),
                MapOp::Clear => format!("(m: {map})"),
                MapOp::Size => format!("(m: {map}) -> usize"),
                MapOp::Insert => format!("(m: {map}, key: {k}, value: {v})"),
                MapOp::Get => format!("(m: {map}, key: {k}, value: *mut {v}) -> bool"),
                MapOp::Remove => format!("(m: {map}, key: {k}) -> bool"),
                MapOp::Free => format!("(m: {map})"),
            }
        }
    }
}
