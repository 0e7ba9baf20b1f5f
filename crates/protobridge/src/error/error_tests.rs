#![allow(non_snake_case)]

use super::*;

#[test]
fn ParseError___display___describes_failure() {
    let err = ParseError;

    let display = err.to_string();

    assert_eq!(display, "failed to parse serialized message");
}

#[test]
fn ParseError___is_std_error() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>(_: &E) {}

    assert_error(&ParseError);
}

#[test]
fn ParseError___converts_into_boxed_error() {
    let result: Result<(), Box<dyn std::error::Error>> = Err(ParseError.into());

    assert!(result.is_err());
}
