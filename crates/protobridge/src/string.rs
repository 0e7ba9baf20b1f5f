//! Text and byte-string field values
//!
//! [`ProtoStr`] is the borrowed form of a `string` field. It is a byte slice
//! that is expected, but not guaranteed, to hold UTF-8: the native engine
//! may hand back anything that was put on the wire.
//!
//! [`ProtoStrMut`] and [`BytesMut`] edit `string` and `bytes` fields. When
//! the owning message lives in an arena the new contents are first copied
//! into that arena, because the arena engine keeps a view of the bytes rather
//! than its own copy.

use crate::internal::{Private, PtrAndLen, RawMessage};
use crate::vtable::RawVTableMutator;
use std::borrow::Cow;
use std::fmt;
use std::str::Utf8Error;

/// Borrowed contents of a `string` field.
#[repr(transparent)]
pub struct ProtoStr([u8]);

impl ProtoStr {
    /// Wrap raw bytes without validating them.
    pub fn from_bytes(bytes: &[u8]) -> &ProtoStr {
        // SAFETY: ProtoStr is repr(transparent) over [u8]
        unsafe { &*(bytes as *const [u8] as *const ProtoStr) }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> &ProtoStr {
        Self::from_bytes(s.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// View as `&str`, failing if the bytes are not valid UTF-8.
    pub fn to_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(&self.0)
    }

    /// View as text, replacing invalid sequences with U+FFFD.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl AsRef<[u8]> for ProtoStr {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for ProtoStr {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for ProtoStr {}

impl PartialEq<str> for ProtoStr {
    fn eq(&self, other: &str) -> bool {
        &self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for ProtoStr {
    fn eq(&self, other: &&str) -> bool {
        &self.0 == other.as_bytes()
    }
}

impl fmt::Debug for ProtoStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.to_string_lossy(), f)
    }
}

impl fmt::Display for ProtoStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_string_lossy(), f)
    }
}

impl<'a> From<&'a str> for &'a ProtoStr {
    fn from(s: &'a str) -> Self {
        ProtoStr::from_str(s)
    }
}

/// Getter/setter thunks for a `string` or `bytes` field.
pub struct BytesMutVTable {
    pub(crate) getter: unsafe extern "C" fn(RawMessage) -> PtrAndLen,
    pub(crate) setter: unsafe extern "C" fn(RawMessage, PtrAndLen),
}

impl BytesMutVTable {
    #[doc(hidden)]
    pub const fn new(
        _private: Private,
        getter: unsafe extern "C" fn(RawMessage) -> PtrAndLen,
        setter: unsafe extern "C" fn(RawMessage, PtrAndLen),
    ) -> Self {
        Self { getter, setter }
    }
}

impl fmt::Debug for BytesMutVTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BytesMutVTable").finish_non_exhaustive()
    }
}

fn read_bytes<'a>(inner: &'a RawVTableMutator<'_, BytesMutVTable>) -> &'a [u8] {
    // SAFETY: the mutator exclusively borrows a live message; the returned
    // bytes stay valid until the next write, which needs &mut self
    unsafe { (inner.vtable().getter)(inner.msg()).as_ref() }
}

fn write_bytes(inner: &mut RawVTableMutator<'_, BytesMutVTable>, bytes: &[u8]) {
    let staged = match inner.arena() {
        Some(arena) => arena.copy_slice(bytes),
        None => bytes,
    };
    // SAFETY: staged outlives the call; arena-backed messages get an
    // arena-owned copy that lives as long as the message
    unsafe { (inner.vtable().setter)(inner.msg(), PtrAndLen::from_slice(staged)) }
}

/// Exclusive handle to a `bytes` field.
pub struct BytesMut<'msg> {
    inner: RawVTableMutator<'msg, BytesMutVTable>,
}

impl<'msg> BytesMut<'msg> {
    #[doc(hidden)]
    pub fn from_inner(_private: Private, inner: RawVTableMutator<'msg, BytesMutVTable>) -> Self {
        Self { inner }
    }

    pub fn get(&self) -> &[u8] {
        read_bytes(&self.inner)
    }

    pub fn set(&mut self, val: impl AsRef<[u8]>) {
        write_bytes(&mut self.inner, val.as_ref());
    }
}

impl fmt::Debug for BytesMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BytesMut").field(&self.get()).finish()
    }
}

/// Exclusive handle to a `string` field.
pub struct ProtoStrMut<'msg> {
    inner: RawVTableMutator<'msg, BytesMutVTable>,
}

impl<'msg> ProtoStrMut<'msg> {
    #[doc(hidden)]
    pub fn from_inner(_private: Private, inner: RawVTableMutator<'msg, BytesMutVTable>) -> Self {
        Self { inner }
    }

    pub fn get(&self) -> &ProtoStr {
        ProtoStr::from_bytes(read_bytes(&self.inner))
    }

    pub fn set(&mut self, val: impl AsRef<[u8]>) {
        write_bytes(&mut self.inner, val.as_ref());
    }
}

impl fmt::Debug for ProtoStrMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ProtoStrMut").field(&self.get()).finish()
    }
}
