//! Runtime support for the heavy backend
//!
//! Each heavy message is a separate allocation on the native side. The owning
//! Rust handle calls the message's delete thunk on drop, and nothing is shared
//! between messages except what the native engine itself shares.
//!
//! Serialized output is allocated by Rust (through [`__pb_rust_alloc`]) and
//! filled by native code, so it can be returned as a [`SerializedData`] that
//! Rust frees normally.

use crate::arena::Arena;
use crate::internal::{Private, RawMessage};
use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::ptr::NonNull;

/// Storage inside every owning heavy-backend message.
#[derive(Debug)]
pub struct MessageInner {
    pub msg: RawMessage,
}

/// Exclusive borrow of a heavy message, held by a generated `MsgMut`.
#[derive(Debug)]
pub struct MutatorMessageRef<'msg> {
    msg: RawMessage,
    _phantom: PhantomData<&'msg mut ()>,
}

impl<'msg> MutatorMessageRef<'msg> {
    #[doc(hidden)]
    pub fn from_parent(_private: Private, parent: &'msg mut MessageInner) -> Self {
        Self {
            msg: parent.msg,
            _phantom: PhantomData,
        }
    }

    pub fn msg(&self) -> RawMessage {
        self.msg
    }

    /// Heavy messages never live in an arena.
    pub fn arena(&self, _private: Private) -> Option<&'msg Arena> {
        None
    }

    /// Shorter-lived cursor on the same message.
    pub fn reborrow(&mut self) -> MutatorMessageRef<'_> {
        MutatorMessageRef {
            msg: self.msg,
            _phantom: PhantomData,
        }
    }

    /// Cursor on a submessage reached through this one.
    ///
    /// # Safety
    ///
    /// `msg` must be a submessage owned by the message this cursor borrows.
    #[doc(hidden)]
    pub unsafe fn child(&mut self, _private: Private, msg: RawMessage) -> MutatorMessageRef<'_> {
        MutatorMessageRef {
            msg,
            _phantom: PhantomData,
        }
    }
}

/// Serialized bytes produced by a heavy message.
///
/// Native code fills a buffer obtained from [`__pb_rust_alloc`] and hands it
/// back in this shape; dropping it returns the buffer to the Rust allocator.
#[repr(C)]
pub struct SerializedData {
    data: NonNull<u8>,
    len: usize,
}

impl SerializedData {
    /// Take ownership of the bytes of a `Vec`.
    pub fn from_vec(vec: Vec<u8>) -> Self {
        let boxed = vec.into_boxed_slice();
        let len = boxed.len();
        let data = NonNull::from(Box::leak(boxed)).cast::<u8>();
        Self { data, len }
    }

    /// # Safety
    ///
    /// For `len > 0`, `data` must come from [`__pb_rust_alloc`] called with
    /// the same `len`, and must be fully initialized.
    pub unsafe fn from_raw_parts(data: NonNull<u8>, len: usize) -> Self {
        Self { data, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Deref for SerializedData {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        // SAFETY: data is valid for len initialized bytes while self lives
        unsafe { std::slice::from_raw_parts(self.data.as_ptr(), self.len) }
    }
}

impl AsRef<[u8]> for SerializedData {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

impl Drop for SerializedData {
    fn drop(&mut self) {
        if self.len == 0 {
            return;
        }
        let slice = std::ptr::slice_from_raw_parts_mut(self.data.as_ptr(), self.len);
        // SAFETY: non-empty buffers come from Box<[u8]> or __pb_rust_alloc,
        // both of which allocate with Layout::array::<u8>(len)
        drop(unsafe { Box::from_raw(slice) });
    }
}

impl fmt::Debug for SerializedData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializedData")
            .field("len", &self.len)
            .finish()
    }
}

// SerializedData uniquely owns its buffer
unsafe impl Send for SerializedData {}
unsafe impl Sync for SerializedData {}

/// Allocate an uninitialized buffer that native code fills and returns as
/// [`SerializedData`]. A zero `len` yields a dangling, non-null pointer.
#[unsafe(no_mangle)]
pub extern "C" fn __pb_rust_alloc(len: usize) -> *mut u8 {
    if len == 0 {
        return NonNull::<u8>::dangling().as_ptr();
    }
    let Ok(layout) = Layout::array::<u8>(len) else {
        return std::ptr::null_mut();
    };
    // SAFETY: layout has a non-zero size
    let ptr = unsafe { alloc::alloc(layout) };
    if ptr.is_null() {
        alloc::handle_alloc_error(layout);
    }
    ptr
}

#[cfg(test)]
#[path = "heavy/heavy_tests.rs"]
mod heavy_tests;
