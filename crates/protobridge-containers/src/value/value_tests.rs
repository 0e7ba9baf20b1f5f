#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

#[test_case(0)]
#[test_case(-1)]
#[test_case(i32::MAX)]
fn FfiValue___i32___passes_through(value: i32) {
    let stored = unsafe { <i32 as FfiValue>::from_ffi(value) };

    assert_eq!(<i32 as FfiValue>::to_ffi(&stored), value);
}

#[test]
fn FfiValue___f64_nan___keeps_bit_pattern() {
    let stored = unsafe { <f64 as FfiValue>::from_ffi(f64::NAN) };

    assert!(<f64 as FfiValue>::to_ffi(&stored).is_nan());
}

#[test]
fn FfiValue___text___copies_into_owned_storage() {
    let source = String::from("copied");

    let stored = unsafe { <ProtoStr as FfiValue>::from_ffi(PtrAndLen::from_slice(source.as_bytes())) };
    drop(source);

    assert_eq!(&*stored, b"copied");
}

#[test]
fn FfiValue___text_from_null___stores_empty() {
    let stored = unsafe { <ProtoStr as FfiValue>::from_ffi(PtrAndLen::empty()) };

    assert!(stored.is_empty());
}

#[test]
fn FfiValue___text_to_ffi___borrows_storage() {
    let stored: Box<[u8]> = b"abc".to_vec().into_boxed_slice();

    let ffi = <ProtoStr as FfiValue>::to_ffi(&stored);

    assert_eq!(ffi.ptr, stored.as_ptr());
    assert_eq!(ffi.len, 3);
}
