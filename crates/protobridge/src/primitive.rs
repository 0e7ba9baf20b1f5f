//! Mutator for scalar fields

use crate::internal::Private;
use crate::vtable::{PrimitiveVTable, RawVTableMutator};
use std::fmt;

/// Exclusive handle to one scalar field of a message.
///
/// Reads and writes go straight to the native message through the field's
/// getter and setter thunks; nothing is cached on the Rust side.
pub struct PrimitiveMut<'msg, T: 'static> {
    inner: RawVTableMutator<'msg, PrimitiveVTable<T>>,
}

impl<'msg, T: Copy + 'static> PrimitiveMut<'msg, T> {
    #[doc(hidden)]
    pub fn from_inner(_private: Private, inner: RawVTableMutator<'msg, PrimitiveVTable<T>>) -> Self {
        Self { inner }
    }

    /// Current value of the field.
    pub fn get(&self) -> T {
        // SAFETY: the mutator holds an exclusive borrow of a live message
        // and its vtable belongs to that message's type
        unsafe { (self.inner.vtable().getter)(self.inner.msg()) }
    }

    /// Overwrite the field.
    pub fn set(&mut self, val: T) {
        // SAFETY: see get
        unsafe { (self.inner.vtable().setter)(self.inner.msg(), val) }
    }
}

impl<T: Copy + fmt::Debug + 'static> fmt::Debug for PrimitiveMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PrimitiveMut").field(&self.get()).finish()
    }
}
