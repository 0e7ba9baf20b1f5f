//! Runtime support for the light backend
//!
//! Light messages, their submessages and their strings all live in the
//! [`Arena`] owned by the top-level message. Dropping the message drops the
//! arena; no per-message delete thunk exists.
//!
//! An unset submessage is reported by the native side as absent. Views read
//! it from [`ScratchSpace::zeroed_block`], a static all-zero block that every
//! light message type accepts as its default instance.

pub use crate::arena::Arena;

use crate::internal::{Private, RawArena, RawMessage};
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::ptr::NonNull;

/// Storage inside every owning light-backend message.
#[derive(Debug)]
pub struct MessageInner {
    pub msg: RawMessage,
    pub arena: Arena,
}

/// Exclusive borrow of a light message together with its arena.
#[derive(Debug)]
pub struct MutatorMessageRef<'msg> {
    msg: RawMessage,
    arena: &'msg Arena,
    _phantom: PhantomData<&'msg mut ()>,
}

impl<'msg> MutatorMessageRef<'msg> {
    #[doc(hidden)]
    pub fn from_parent(_private: Private, parent: &'msg mut MessageInner) -> Self {
        Self {
            msg: parent.msg,
            arena: &parent.arena,
            _phantom: PhantomData,
        }
    }

    pub fn msg(&self) -> RawMessage {
        self.msg
    }

    /// Arena that owns the message and receives copies of written strings.
    pub fn arena(&self, _private: Private) -> Option<&'msg Arena> {
        Some(self.arena)
    }

    /// Raw arena handle passed to thunks that allocate.
    pub fn raw_arena(&self, _private: Private) -> RawArena {
        self.arena.raw()
    }

    /// Shorter-lived cursor on the same message.
    pub fn reborrow(&mut self) -> MutatorMessageRef<'_> {
        MutatorMessageRef {
            msg: self.msg,
            arena: self.arena,
            _phantom: PhantomData,
        }
    }

    /// Cursor on a submessage allocated in the same arena.
    ///
    /// # Safety
    ///
    /// `msg` must be a submessage owned by the message this cursor borrows.
    #[doc(hidden)]
    pub unsafe fn child(&mut self, _private: Private, msg: RawMessage) -> MutatorMessageRef<'_> {
        MutatorMessageRef {
            msg,
            arena: self.arena,
            _phantom: PhantomData,
        }
    }
}

/// Serialized bytes produced by a light message.
///
/// The bytes live in a dedicated arena that this value owns.
pub struct SerializedData {
    data: NonNull<u8>,
    len: usize,
    _arena: Arena,
}

impl SerializedData {
    /// # Safety
    ///
    /// `data` must point to `len` initialized bytes allocated in `arena`
    /// (or be any non-null pointer when `len` is 0).
    pub unsafe fn from_raw_parts(arena: Arena, data: NonNull<u8>, len: usize) -> Self {
        Self {
            data,
            len,
            _arena: arena,
        }
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
        // SAFETY: the bytes live in the arena owned by self
        unsafe { std::slice::from_raw_parts(self.data.as_ptr(), self.len) }
    }
}

impl AsRef<[u8]> for SerializedData {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

impl fmt::Debug for SerializedData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializedData")
            .field("len", &self.len)
            .finish()
    }
}

/// Size of the shared zeroed block. Every generated light message type must
/// fit in it.
pub const SCRATCH_SPACE_SIZE: usize = 1024;

#[repr(C, align(16))]
struct ZeroedBlock([u8; SCRATCH_SPACE_SIZE]);

static ZEROED_BLOCK: ZeroedBlock = ZeroedBlock([0; SCRATCH_SPACE_SIZE]);

/// Read-only default instances for absent submessages.
#[derive(Debug)]
pub struct ScratchSpace;

impl ScratchSpace {
    /// Static all-zero block readable as any light message type.
    ///
    /// Must only ever be read through.
    pub fn zeroed_block(_private: Private) -> RawMessage {
        NonNull::from(&ZEROED_BLOCK).cast::<u8>()
    }
}
