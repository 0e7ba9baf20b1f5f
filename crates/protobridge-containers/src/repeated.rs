//! Sequence containers backing repeated scalar and text fields
//!
//! For every supported element type `T` this module exports
//! `__pb_rust_RepeatedField_<T>_{new,add,size,get,set,copy_from,free}`.

use crate::value::FfiValue;
use protobridge::ProtoStr;
use protobridge::__internal::RawRepeatedField;
use std::fmt;
use std::ptr::NonNull;

/// Growable sequence of `T` addressed from native code through a raw handle.
pub struct RepeatedField<T: FfiValue + ?Sized> {
    items: Vec<T::Stored>,
}

impl<T: FfiValue + ?Sized> RepeatedField<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// # Safety
    ///
    /// Text values must point to valid memory for the call.
    pub unsafe fn push(&mut self, value: T::Ffi) {
        // SAFETY: forwarded caller guarantee
        self.items.push(unsafe { T::from_ffi(value) });
    }

    /// Element at `index` in FFI form, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<T::Ffi> {
        self.items.get(index).map(T::to_ffi)
    }

    /// Overwrite the element at `index`. Returns false past the end.
    ///
    /// # Safety
    ///
    /// Text values must point to valid memory for the call.
    pub unsafe fn set(&mut self, index: usize, value: T::Ffi) -> bool {
        match self.items.get_mut(index) {
            Some(slot) => {
                // SAFETY: forwarded caller guarantee
                *slot = unsafe { T::from_ffi(value) };
                true
            }
            None => false,
        }
    }

    /// Replace the contents with a value-wise copy of `src`.
    pub fn copy_from(&mut self, src: &Self) {
        self.items.clone_from(&src.items);
    }

    pub fn into_raw(self) -> RawRepeatedField {
        NonNull::from(Box::leak(Box::new(self))).cast()
    }

    /// # Safety
    ///
    /// `raw` must come from [`RepeatedField::into_raw`] with the same `T`,
    /// must not be freed, and must not be aliased for `'a`.
    pub unsafe fn from_raw_mut<'a>(raw: RawRepeatedField) -> &'a mut Self {
        // SAFETY: forwarded caller guarantee
        unsafe { raw.cast::<Self>().as_mut() }
    }

    /// # Safety
    ///
    /// As [`RepeatedField::from_raw_mut`], but shared access only.
    pub unsafe fn from_raw<'a>(raw: RawRepeatedField) -> &'a Self {
        // SAFETY: forwarded caller guarantee
        unsafe { raw.cast::<Self>().as_ref() }
    }

    /// # Safety
    ///
    /// `raw` must come from [`RepeatedField::into_raw`] with the same `T` and
    /// must not be used afterwards.
    pub unsafe fn free_raw(raw: RawRepeatedField) {
        // SAFETY: forwarded caller guarantee
        drop(unsafe { Box::from_raw(raw.cast::<Self>().as_ptr()) });
    }
}

impl<T: FfiValue + ?Sized> Default for RepeatedField<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FfiValue + ?Sized> fmt::Debug for RepeatedField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepeatedField")
            .field("len", &self.items.len())
            .finish()
    }
}

#[cold]
fn index_out_of_bounds(index: usize, len: usize) -> ! {
    panic!("repeated field index {index} out of bounds (size {len})")
}

macro_rules! expose_repeated_field_methods {
    ($($t:ident),+ $(,)?) => {
        $(
            paste::paste! {
                #[allow(non_snake_case)]
                #[unsafe(no_mangle)]
                pub extern "C" fn [<__pb_rust_RepeatedField_ $t _new>]() -> RawRepeatedField {
                    RepeatedField::<$t>::new().into_raw()
                }

                /// # Safety
                ///
                /// `r` must be a live handle from the matching `new`.
                #[allow(non_snake_case)]
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<__pb_rust_RepeatedField_ $t _add>](
                    r: RawRepeatedField,
                    val: <$t as FfiValue>::Ffi,
                ) {
                    // SAFETY: forwarded caller guarantee
                    unsafe { RepeatedField::<$t>::from_raw_mut(r).push(val) }
                }

                /// # Safety
                ///
                /// `r` must be a live handle from the matching `new`.
                #[allow(non_snake_case)]
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<__pb_rust_RepeatedField_ $t _size>](r: RawRepeatedField) -> usize {
                    // SAFETY: forwarded caller guarantee
                    unsafe { RepeatedField::<$t>::from_raw(r) }.len()
                }

                /// Aborts if `index` is not below `size`.
                ///
                /// # Safety
                ///
                /// `r` must be a live handle from the matching `new`.
                #[allow(non_snake_case)]
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<__pb_rust_RepeatedField_ $t _get>](
                    r: RawRepeatedField,
                    index: usize,
                ) -> <$t as FfiValue>::Ffi {
                    // SAFETY: forwarded caller guarantee
                    let field = unsafe { RepeatedField::<$t>::from_raw(r) };
                    match field.get(index) {
                        Some(value) => value,
                        None => index_out_of_bounds(index, field.len()),
                    }
                }

                /// Aborts if `index` is not below `size`.
                ///
                /// # Safety
                ///
                /// `r` must be a live handle from the matching `new`.
                #[allow(non_snake_case)]
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<__pb_rust_RepeatedField_ $t _set>](
                    r: RawRepeatedField,
                    index: usize,
                    val: <$t as FfiValue>::Ffi,
                ) {
                    // SAFETY: forwarded caller guarantee
                    let field = unsafe { RepeatedField::<$t>::from_raw_mut(r) };
                    // SAFETY: forwarded caller guarantee
                    if !unsafe { field.set(index, val) } {
                        index_out_of_bounds(index, field.len());
                    }
                }

                /// # Safety
                ///
                /// Both handles must be live handles from the matching `new`.
                #[allow(non_snake_case)]
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<__pb_rust_RepeatedField_ $t _copy_from>](
                    src: RawRepeatedField,
                    dst: RawRepeatedField,
                ) {
                    if src == dst {
                        return;
                    }
                    // SAFETY: distinct live handles
                    unsafe {
                        RepeatedField::<$t>::from_raw_mut(dst)
                            .copy_from(RepeatedField::<$t>::from_raw(src));
                    }
                }

                /// # Safety
                ///
                /// `r` must be a live handle from the matching `new` and is
                /// invalid afterwards.
                #[allow(non_snake_case)]
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<__pb_rust_RepeatedField_ $t _free>](r: RawRepeatedField) {
                    // SAFETY: forwarded caller guarantee
                    unsafe { RepeatedField::<$t>::free_raw(r) }
                }
            }
        )+
    };
}

expose_repeated_field_methods!(i32, u32, f32, f64, bool, u64, i64, ProtoStr);
