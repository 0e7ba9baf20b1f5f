#![allow(non_snake_case)]

use super::*;

#[test]
fn CodegenError___name_collision___names_both_owners() {
    let err = CodegenError::NameCollision {
        name: "__pb_thunk_1a_get".to_string(),
        first: "a.get".to_string(),
        second: "b.get".to_string(),
    };

    let display = err.to_string();

    assert!(display.contains("__pb_thunk_1a_get"));
    assert!(display.contains("a.get"));
    assert!(display.contains("b.get"));
}

#[test]
fn CodegenError___duplicate_name___display() {
    let err = CodegenError::DuplicateName {
        kind: "field",
        name: "count".to_string(),
    };

    assert_eq!(err.to_string(), "duplicate field `count`");
}

#[test]
fn CodegenError___invalid_schema___display() {
    let err = CodegenError::InvalidSchema("field number 0".to_string());

    assert_eq!(err.to_string(), "invalid schema: field number 0");
}

#[test]
fn CodegenError___template___display() {
    let err = CodegenError::Template("unknown variable `x`".to_string());

    assert_eq!(err.to_string(), "template error: unknown variable `x`");
}

#[test]
fn CodegenError___converts_into_anyhow() {
    let result: anyhow::Result<()> = Err(CodegenError::Config("bad backend".to_string()).into());

    let err = result.unwrap_err();

    assert_eq!(err.to_string(), "configuration error: bad backend");
}
