//! Conversions between the FFI form of an element and its stored form

use protobridge::ProtoStr;
use protobridge::__internal::PtrAndLen;
use std::hash::Hash;

/// An element type that can cross the bridge.
///
/// Scalars cross and are stored by value. Text crosses as a borrowed
/// [`PtrAndLen`] and is copied into container-owned storage on the way in.
pub trait FfiValue {
    /// Representation on the native side of the boundary
    type Ffi: Copy;

    /// Representation retained inside a container
    type Stored: Clone;

    /// Copy a value arriving from native code into owned storage.
    ///
    /// # Safety
    ///
    /// Borrowed forms (text) must point to valid memory for the call.
    unsafe fn from_ffi(value: Self::Ffi) -> Self::Stored;

    /// Borrow stored data in its FFI form. For text the result is valid until
    /// `stored` is mutated or dropped.
    fn to_ffi(stored: &Self::Stored) -> Self::Ffi;
}

/// An element type usable as a map key.
pub trait FfiKey: FfiValue<Stored: Eq + Hash> {}

macro_rules! scalar_ffi_value {
    ($($t:ty),+ $(,)?) => {
        $(
            impl FfiValue for $t {
                type Ffi = $t;
                type Stored = $t;

                unsafe fn from_ffi(value: $t) -> $t {
                    value
                }

                fn to_ffi(stored: &$t) -> $t {
                    *stored
                }
            }
        )+
    };
}

scalar_ffi_value!(i32, u32, f32, f64, bool, u64, i64);

impl FfiKey for i32 {}
impl FfiKey for u32 {}
impl FfiKey for bool {}
impl FfiKey for u64 {}
impl FfiKey for i64 {}

impl FfiValue for ProtoStr {
    type Ffi = PtrAndLen;
    type Stored = Box<[u8]>;

    unsafe fn from_ffi(value: PtrAndLen) -> Box<[u8]> {
        // SAFETY: forwarded caller guarantee
        unsafe { value.as_ref() }.into()
    }

    fn to_ffi(stored: &Box<[u8]>) -> PtrAndLen {
        PtrAndLen::from_slice(stored)
    }
}

impl FfiKey for ProtoStr {}

#[cfg(test)]
#[path = "value/value_tests.rs"]
mod value_tests;
