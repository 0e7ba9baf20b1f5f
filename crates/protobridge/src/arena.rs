//! Bulk allocation region backing light-backend messages
//!
//! An [`Arena`] is a boxed [`bumpalo::Bump`] that hands out zeroed memory and
//! frees every chunk at once when dropped. Messages, strings and serialized
//! buffers created for a light-backend message all live in the arena owned by
//! that message, so releasing the message is a single drop.
//!
//! Native code allocates through [`__pb_rust_Arena_alloc`] with the raw
//! handle returned by [`Arena::raw`]. The handle is the address of the boxed
//! `Bump`, which stays put when the `Arena` itself moves.

use crate::internal::RawArena;
use bumpalo::Bump;
use std::alloc::Layout;
use std::fmt;
use std::ptr::{self, NonNull};

/// Bulk allocation region.
///
/// Memory handed out by an arena stays valid until the arena is dropped and
/// is never freed individually. The arena is `Send` but not `Sync`.
pub struct Arena {
    bump: Box<Bump>,
}

impl Arena {
    /// Create an empty arena. No memory is reserved until the first allocation.
    pub fn new() -> Self {
        Self {
            bump: Box::new(Bump::new()),
        }
    }

    /// Raw handle passed to native code.
    pub fn raw(&self) -> RawArena {
        NonNull::from(self.bump.as_ref()).cast()
    }

    /// Allocate zeroed memory for `layout`.
    pub fn alloc(&self, layout: Layout) -> NonNull<u8> {
        zeroed(&self.bump, layout)
    }

    /// Allocate zeroed memory in the arena behind a raw handle.
    ///
    /// # Safety
    ///
    /// `arena` must come from [`Arena::raw`] on an arena that is still alive,
    /// and must not be used concurrently from another thread.
    pub unsafe fn alloc_raw(arena: RawArena, layout: Layout) -> NonNull<u8> {
        // SAFETY: caller guarantees the handle points at a live Bump
        let bump = unsafe { arena.cast::<Bump>().as_ref() };
        zeroed(bump, layout)
    }

    /// Copy `bytes` into the arena, returning the arena-owned copy.
    pub fn copy_slice(&self, bytes: &[u8]) -> &[u8] {
        if bytes.is_empty() {
            return &[];
        }
        self.bump.alloc_slice_copy(bytes)
    }

    /// Total bytes reserved from the global allocator so far.
    pub fn capacity(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

/// Bump allocations are not zeroed; message layouts rely on all-zero defaults
fn zeroed(bump: &Bump, layout: Layout) -> NonNull<u8> {
    let ptr = bump.alloc_layout(layout);
    // SAFETY: ptr is a fresh allocation of layout.size() bytes
    unsafe { ptr::write_bytes(ptr.as_ptr(), 0, layout.size()) };
    ptr
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// Allocate `size` zeroed bytes aligned to `align` in a live arena.
///
/// Returns null if `size`/`align` do not form a valid layout.
///
/// # Safety
///
/// `arena` must be a raw handle of a live [`Arena`] not in use on another thread.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_rust_Arena_alloc(arena: RawArena, size: usize, align: usize) -> *mut u8 {
    match Layout::from_size_align(size, align) {
        // SAFETY: forwarded caller guarantee
        Ok(layout) => unsafe { Arena::alloc_raw(arena, layout) }.as_ptr(),
        Err(_) => ptr::null_mut(),
    }
}
