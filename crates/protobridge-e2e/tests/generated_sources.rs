//! Checks on the text the build script generated for `schema/e2e.json`

#![allow(non_snake_case)]

use protobridge_codegen::{Backend, GeneratorOptions, SchemaSet, generate};
use protobridge_e2e::{HEAVY_CC, HEAVY_RS, LIGHT_RS, OPTIONS, SCHEMA};
use std::collections::BTreeSet;

/// Names of the thunks declared in generated Rust
fn declared_thunks(rust: &str) -> BTreeSet<&str> {
    rust.lines()
        .filter_map(|line| line.trim().strip_prefix("fn __pb_thunk_"))
        .filter_map(|rest| rest.split('(').next())
        .collect()
}

fn regenerate(backend: Backend) -> protobridge_codegen::GeneratedUnit {
    let schema = SchemaSet::from_json(SCHEMA).unwrap();
    let opts = GeneratorOptions {
        backend,
        ..GeneratorOptions::from_toml(OPTIONS).unwrap()
    };
    generate(&schema, &opts).unwrap()
}

// ============================================================================
// Boundary agreement
// ============================================================================

mod boundary {
    use super::*;

    #[test]
    fn HEAVY_RS___every_declared_thunk___defined_in_cc() {
        let declared = declared_thunks(HEAVY_RS);

        assert!(!declared.is_empty());
        for name in declared {
            let definition = format!("__pb_thunk_{name}(");
            assert!(HEAVY_CC.contains(&definition), "missing {name}");
        }
    }

    #[test]
    fn LIGHT_RS___declares_no_delete_thunk() {
        assert!(!declared_thunks(LIGHT_RS).iter().any(|n| n.ends_with("_delete")));
        assert!(declared_thunks(LIGHT_RS).contains("3e2e5Outer_new"));
    }
}

// ============================================================================
// Determinism and diagnostics
// ============================================================================

mod regeneration {
    use super::*;

    #[test]
    fn generate___same_inputs___reproduces_build_output() {
        assert_eq!(regenerate(Backend::Heavy).rust_source(), HEAVY_RS);
        assert_eq!(regenerate(Backend::Heavy).cc_source().as_deref(), Some(HEAVY_CC));
        assert_eq!(regenerate(Backend::Light).rust_source(), LIGHT_RS);
    }

    #[test]
    fn generate___unsupported_items___reported_in_order() {
        let unit = regenerate(Backend::Light);

        let subjects: Vec<&str> = unit.diagnostics.iter().map(|d| d.subject.as_str()).collect();

        assert_eq!(
            subjects,
            vec![
                "e2e.Outer.tags",
                "e2e.Outer.mode",
                "e2e.Outer.legacy",
                "e2e.Outer.attrs",
                "e2e.Outer.AttrsEntry",
            ]
        );
    }
}
