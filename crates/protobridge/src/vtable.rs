//! Static accessor tables binding generic mutators to per-field thunks
//!
//! Generated code emits one `static` table per mutable field holding the
//! field's getter and setter thunks. A [`RawVTableMutator`] pairs that table
//! with the message it edits, and the typed mutators in this crate
//! ([`PrimitiveMut`](crate::PrimitiveMut), [`ProtoStrMut`](crate::ProtoStrMut),
//! [`BytesMut`](crate::BytesMut)) wrap it.

use crate::arena::Arena;
use crate::internal::{Private, RawMessage};
use std::fmt;
use std::marker::PhantomData;

/// Getter/setter thunks for a scalar field of type `T`.
pub struct PrimitiveVTable<T> {
    pub(crate) getter: unsafe extern "C" fn(RawMessage) -> T,
    pub(crate) setter: unsafe extern "C" fn(RawMessage, T),
}

impl<T> PrimitiveVTable<T> {
    #[doc(hidden)]
    pub const fn new(
        _private: Private,
        getter: unsafe extern "C" fn(RawMessage) -> T,
        setter: unsafe extern "C" fn(RawMessage, T),
    ) -> Self {
        Self { getter, setter }
    }
}

impl<T> fmt::Debug for PrimitiveVTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveVTable")
            .field("type", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

/// A message pointer bound to the static accessor table of one of its fields.
///
/// Holds the exclusive borrow of the message for `'msg`.
pub struct RawVTableMutator<'msg, V: 'static> {
    msg: RawMessage,
    arena: Option<&'msg Arena>,
    vtable: &'static V,
    _phantom: PhantomData<&'msg mut ()>,
}

impl<'msg, V: 'static> RawVTableMutator<'msg, V> {
    /// # Safety
    ///
    /// `msg` must be a live message that is exclusively borrowed for `'msg`,
    /// and `vtable` must hold the thunks of a field belonging to that
    /// message's type. `arena` must be the arena owning `msg`, if any.
    #[doc(hidden)]
    pub unsafe fn new(
        _private: Private,
        msg: RawMessage,
        arena: Option<&'msg Arena>,
        vtable: &'static V,
    ) -> Self {
        Self {
            msg,
            arena,
            vtable,
            _phantom: PhantomData,
        }
    }

    pub(crate) fn msg(&self) -> RawMessage {
        self.msg
    }

    pub(crate) fn vtable(&self) -> &'static V {
        self.vtable
    }

    pub(crate) fn arena(&self) -> Option<&'msg Arena> {
        self.arena
    }
}

impl<V: 'static> fmt::Debug for RawVTableMutator<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawVTableMutator")
            .field("msg", &self.msg)
            .field("arena_backed", &self.arena.is_some())
            .finish()
    }
}
