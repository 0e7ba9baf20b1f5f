//! Raw FFI types shared by generated code and native thunks

use std::ptr::{self, NonNull};

/// Token that keeps generated-code-only constructors out of user reach.
#[derive(Debug, Clone, Copy)]
pub struct Private;

/// Opaque pointer to a live native message.
pub type RawMessage = NonNull<u8>;

/// Opaque pointer to the state behind an [`Arena`](crate::Arena).
pub type RawArena = NonNull<u8>;

/// Opaque pointer to a native sequence container.
pub type RawRepeatedField = NonNull<u8>;

/// Opaque pointer to a native key/value container.
pub type RawMap = NonNull<u8>;

/// Borrowed byte run passed across the FFI boundary.
///
/// Ownership of the bytes is never transferred. A receiver that needs to keep
/// them copies them.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct PtrAndLen {
    /// Pointer to the first byte (may be null when `len` is 0)
    pub ptr: *const u8,
    /// Number of bytes
    pub len: usize,
}

impl PtrAndLen {
    /// An empty run with a null pointer.
    pub const fn empty() -> Self {
        Self {
            ptr: ptr::null(),
            len: 0,
        }
    }

    /// Borrow a slice as a pointer/length pair.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            ptr: bytes.as_ptr(),
            len: bytes.len(),
        }
    }

    /// Reinterpret the pair as a slice.
    ///
    /// # Safety
    ///
    /// Unless `ptr` is null, it must point to `len` initialized bytes that stay
    /// valid and unmodified for `'a`.
    pub unsafe fn as_ref<'a>(self) -> &'a [u8] {
        if self.ptr.is_null() || self.len == 0 {
            &[]
        } else {
            // SAFETY: caller guarantees ptr is valid for len bytes during 'a
            unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
        }
    }
}

impl Default for PtrAndLen {
    fn default() -> Self {
        Self::empty()
    }
}
