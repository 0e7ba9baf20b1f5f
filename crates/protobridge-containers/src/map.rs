//! Key/value containers backing map fields
//!
//! For every supported key `K` and value `V` this module exports
//! `__pb_rust_Map_<K>_<V>_{new,clear,size,insert,get,remove,free}`.
//! Floating-point types are values only.

use crate::value::{FfiKey, FfiValue};
use protobridge::ProtoStr;
use protobridge::__internal::RawMap;
use std::collections::HashMap;
use std::fmt;
use std::ptr::NonNull;

/// Hash map from `K` to `V` addressed from native code through a raw handle.
pub struct Map<K: FfiKey + ?Sized, V: FfiValue + ?Sized> {
    entries: HashMap<K::Stored, V::Stored>,
}

impl<K: FfiKey + ?Sized, V: FfiValue + ?Sized> Map<K, V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Insert or overwrite. Returns true when the key was not present.
    ///
    /// # Safety
    ///
    /// Text keys and values must point to valid memory for the call.
    pub unsafe fn insert(&mut self, key: K::Ffi, value: V::Ffi) -> bool {
        // SAFETY: forwarded caller guarantee
        let (key, value) = unsafe { (K::from_ffi(key), V::from_ffi(value)) };
        self.entries.insert(key, value).is_none()
    }

    /// Value for `key` in FFI form. Text borrows map storage until the next
    /// mutation.
    ///
    /// # Safety
    ///
    /// Text keys must point to valid memory for the call.
    pub unsafe fn get(&self, key: K::Ffi) -> Option<V::Ffi> {
        // SAFETY: forwarded caller guarantee
        let key = unsafe { K::from_ffi(key) };
        self.entries.get(&key).map(V::to_ffi)
    }

    /// Remove `key`, reporting whether it was present.
    ///
    /// # Safety
    ///
    /// Text keys must point to valid memory for the call.
    pub unsafe fn remove(&mut self, key: K::Ffi) -> bool {
        // SAFETY: forwarded caller guarantee
        let key = unsafe { K::from_ffi(key) };
        self.entries.remove(&key).is_some()
    }

    pub fn into_raw(self) -> RawMap {
        NonNull::from(Box::leak(Box::new(self))).cast()
    }

    /// # Safety
    ///
    /// `raw` must come from [`Map::into_raw`] with the same `K` and `V`, must
    /// not be freed, and must not be aliased for `'a`.
    pub unsafe fn from_raw_mut<'a>(raw: RawMap) -> &'a mut Self {
        // SAFETY: forwarded caller guarantee
        unsafe { raw.cast::<Self>().as_mut() }
    }

    /// # Safety
    ///
    /// As [`Map::from_raw_mut`], but shared access only.
    pub unsafe fn from_raw<'a>(raw: RawMap) -> &'a Self {
        // SAFETY: forwarded caller guarantee
        unsafe { raw.cast::<Self>().as_ref() }
    }

    /// # Safety
    ///
    /// `raw` must come from [`Map::into_raw`] with the same `K` and `V` and
    /// must not be used afterwards.
    pub unsafe fn free_raw(raw: RawMap) {
        // SAFETY: forwarded caller guarantee
        drop(unsafe { Box::from_raw(raw.cast::<Self>().as_ptr()) });
    }
}

impl<K: FfiKey + ?Sized, V: FfiValue + ?Sized> Default for Map<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: FfiKey + ?Sized, V: FfiValue + ?Sized> fmt::Debug for Map<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map").field("len", &self.entries.len()).finish()
    }
}

macro_rules! expose_map_methods {
    (@one $k:ident, $v:ident) => {
        paste::paste! {
            #[allow(non_snake_case)]
            #[unsafe(no_mangle)]
            pub extern "C" fn [<__pb_rust_Map_ $k _ $v _new>]() -> RawMap {
                Map::<$k, $v>::new().into_raw()
            }

            /// # Safety
            ///
            /// `m` must be a live handle from the matching `new`.
            #[allow(non_snake_case)]
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<__pb_rust_Map_ $k _ $v _clear>](m: RawMap) {
                // SAFETY: forwarded caller guarantee
                unsafe { Map::<$k, $v>::from_raw_mut(m) }.clear()
            }

            /// # Safety
            ///
            /// `m` must be a live handle from the matching `new`.
            #[allow(non_snake_case)]
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<__pb_rust_Map_ $k _ $v _size>](m: RawMap) -> usize {
                // SAFETY: forwarded caller guarantee
                unsafe { Map::<$k, $v>::from_raw(m) }.len()
            }

            /// # Safety
            ///
            /// `m` must be a live handle from the matching `new`; text
            /// arguments must be valid for the call.
            #[allow(non_snake_case)]
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<__pb_rust_Map_ $k _ $v _insert>](
                m: RawMap,
                key: <$k as FfiValue>::Ffi,
                value: <$v as FfiValue>::Ffi,
            ) {
                // SAFETY: forwarded caller guarantee
                unsafe { Map::<$k, $v>::from_raw_mut(m).insert(key, value) };
            }

            /// Writes the value to `value` and returns true when `key` is
            /// present; leaves `value` untouched otherwise.
            ///
            /// # Safety
            ///
            /// `m` must be a live handle from the matching `new`, `value`
            /// must be writable, and text keys must be valid for the call.
            #[allow(non_snake_case)]
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<__pb_rust_Map_ $k _ $v _get>](
                m: RawMap,
                key: <$k as FfiValue>::Ffi,
                value: *mut <$v as FfiValue>::Ffi,
            ) -> bool {
                // SAFETY: forwarded caller guarantee
                match unsafe { Map::<$k, $v>::from_raw(m).get(key) } {
                    Some(found) => {
                        // SAFETY: caller guarantees value is writable
                        unsafe { value.write(found) };
                        true
                    }
                    None => false,
                }
            }

            /// # Safety
            ///
            /// `m` must be a live handle from the matching `new`; text keys
            /// must be valid for the call.
            #[allow(non_snake_case)]
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<__pb_rust_Map_ $k _ $v _remove>](
                m: RawMap,
                key: <$k as FfiValue>::Ffi,
            ) -> bool {
                // SAFETY: forwarded caller guarantee
                unsafe { Map::<$k, $v>::from_raw_mut(m).remove(key) }
            }

            /// # Safety
            ///
            /// `m` must be a live handle from the matching `new` and is
            /// invalid afterwards.
            #[allow(non_snake_case)]
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<__pb_rust_Map_ $k _ $v _free>](m: RawMap) {
                // SAFETY: forwarded caller guarantee
                unsafe { Map::<$k, $v>::free_raw(m) }
            }
        }
    };
    ($k:ident => $($v:ident),+ $(,)?) => {
        $( expose_map_methods!(@one $k, $v); )+
    };
}

macro_rules! expose_map_methods_for_keys {
    ($($k:ident),+ $(,)?) => {
        $( expose_map_methods!($k => i32, u32, f32, f64, bool, u64, i64, ProtoStr); )+
    };
}

expose_map_methods_for_keys!(i32, u32, bool, u64, i64, ProtoStr);
