//! Fake heavy-backend kernel
//!
//! Each message is a boxed Rust struct. The exported thunks carry exactly the
//! symbols and signatures the generated C++ would, so the generated Rust links
//! against this module unchanged. An unset submessage reads as a shared
//! static default instance, as in the native engine.

#![allow(non_snake_case)]

use crate::wire::{self, CHOICE_ALPHA, CHOICE_BETA, CHOICE_NOT_SET, ChoiceWire, InnerWire, OuterWire};
use protobridge::__internal::{PtrAndLen, RawMessage};
use protobridge::__runtime::heavy::SerializedData;
use std::ptr::NonNull;

#[derive(Debug, Default)]
pub struct Outer {
    count: i32,
    label: Vec<u8>,
    payload: Vec<u8>,
    ratio: f64,
    enabled: bool,
    weight: f32,
    flags: u32,
    inner: Option<Box<Inner>>,
    choice: Choice,
}

#[derive(Debug, Default)]
pub struct Inner {
    value: i64,
}

#[derive(Debug, Default)]
enum Choice {
    #[default]
    NotSet,
    Alpha(u64),
    Beta(Vec<u8>),
}

static DEFAULT_INNER: Inner = Inner { value: 0 };

impl Outer {
    fn to_wire(&self) -> OuterWire {
        OuterWire {
            count: self.count,
            label: self.label.clone(),
            payload: self.payload.clone(),
            ratio: self.ratio,
            enabled: self.enabled,
            weight: self.weight,
            flags: self.flags,
            inner: self.inner.as_deref().map(Inner::to_wire),
            choice: match &self.choice {
                Choice::NotSet => None,
                Choice::Alpha(v) => Some(ChoiceWire::Alpha(*v)),
                Choice::Beta(v) => Some(ChoiceWire::Beta(v.clone())),
            },
        }
    }

    fn from_wire(wire: OuterWire) -> Self {
        Self {
            count: wire.count,
            label: wire.label,
            payload: wire.payload,
            ratio: wire.ratio,
            enabled: wire.enabled,
            weight: wire.weight,
            flags: wire.flags,
            inner: wire.inner.map(|w| Box::new(Inner::from_wire(w))),
            choice: match wire.choice {
                None => Choice::NotSet,
                Some(ChoiceWire::Alpha(v)) => Choice::Alpha(v),
                Some(ChoiceWire::Beta(v)) => Choice::Beta(v),
            },
        }
    }
}

impl Inner {
    fn to_wire(&self) -> InnerWire {
        InnerWire { value: self.value }
    }

    fn from_wire(wire: InnerWire) -> Self {
        Self { value: wire.value }
    }
}

/// # Safety
///
/// `msg` must point to a live `T`, or to a static default instance of it.
unsafe fn view<'a, T>(msg: RawMessage) -> &'a T {
    unsafe { msg.cast::<T>().as_ref() }
}

/// # Safety
///
/// `msg` must point to a live, individually allocated `T` with no other
/// outstanding borrow.
unsafe fn edit<'a, T>(msg: RawMessage) -> &'a mut T {
    unsafe { msg.cast::<T>().as_mut() }
}

fn into_raw<T>(value: T) -> RawMessage {
    NonNull::from(Box::leak(Box::new(value))).cast()
}

macro_rules! message_thunks {
    ($msg:ty, $wire:ty, $new:ident, $delete:ident, $serialize:ident, $deserialize:ident) => {
        #[unsafe(no_mangle)]
        pub extern "C" fn $new() -> RawMessage {
            into_raw(<$msg>::default())
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $delete(msg: RawMessage) {
            drop(unsafe { Box::from_raw(msg.cast::<$msg>().as_ptr()) });
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $serialize(msg: RawMessage) -> SerializedData {
            let snapshot = unsafe { view::<$msg>(msg) }.to_wire();
            SerializedData::from_vec(wire::encode(&snapshot))
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $deserialize(msg: RawMessage, data: PtrAndLen) -> bool {
            match wire::decode::<$wire>(unsafe { data.as_ref() }) {
                Some(parsed) => {
                    *unsafe { edit::<$msg>(msg) } = <$msg>::from_wire(parsed);
                    true
                }
                None => false,
            }
        }
    };
}

macro_rules! scalar_thunks {
    ($msg:ty, $field:ident: $t:ty, $get:ident, $set:ident, $clear:ident) => {
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $get(msg: RawMessage) -> $t {
            let message = unsafe { view::<$msg>(msg) };
            message.$field
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $set(msg: RawMessage, val: $t) {
            let message = unsafe { edit::<$msg>(msg) };
            message.$field = val;
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $clear(msg: RawMessage) {
            let message = unsafe { edit::<$msg>(msg) };
            message.$field = <$t>::default();
        }
    };
}

macro_rules! text_thunks {
    ($msg:ty, $field:ident, $get:ident, $set:ident, $clear:ident) => {
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $get(msg: RawMessage) -> PtrAndLen {
            PtrAndLen::from_slice(&unsafe { view::<$msg>(msg) }.$field)
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $set(msg: RawMessage, val: PtrAndLen) {
            // The caller keeps ownership of the bytes
            let message = unsafe { edit::<$msg>(msg) };
            message.$field = unsafe { val.as_ref() }.to_vec();
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $clear(msg: RawMessage) {
            let message = unsafe { edit::<$msg>(msg) };
            message.$field.clear();
        }
    };
}

message_thunks!(
    Outer,
    OuterWire,
    __pb_thunk_3e2e5Outer_new,
    __pb_thunk_3e2e5Outer_delete,
    __pb_thunk_3e2e5Outer_serialize,
    __pb_thunk_3e2e5Outer_deserialize
);

message_thunks!(
    Inner,
    InnerWire,
    __pb_thunk_3e2e5Outer5Inner_new,
    __pb_thunk_3e2e5Outer5Inner_delete,
    __pb_thunk_3e2e5Outer5Inner_serialize,
    __pb_thunk_3e2e5Outer5Inner_deserialize
);

scalar_thunks!(
    Outer,
    count: i32,
    __pb_thunk_3e2e5Outer_5count_get,
    __pb_thunk_3e2e5Outer_5count_set,
    __pb_thunk_3e2e5Outer_5count_clear
);

scalar_thunks!(
    Outer,
    ratio: f64,
    __pb_thunk_3e2e5Outer_5ratio_get,
    __pb_thunk_3e2e5Outer_5ratio_set,
    __pb_thunk_3e2e5Outer_5ratio_clear
);

scalar_thunks!(
    Outer,
    enabled: bool,
    __pb_thunk_3e2e5Outer_7enabled_get,
    __pb_thunk_3e2e5Outer_7enabled_set,
    __pb_thunk_3e2e5Outer_7enabled_clear
);

scalar_thunks!(
    Outer,
    weight: f32,
    __pb_thunk_3e2e5Outer_6weight_get,
    __pb_thunk_3e2e5Outer_6weight_set,
    __pb_thunk_3e2e5Outer_6weight_clear
);

scalar_thunks!(
    Outer,
    flags: u32,
    __pb_thunk_3e2e5Outer_5flags_get,
    __pb_thunk_3e2e5Outer_5flags_set,
    __pb_thunk_3e2e5Outer_5flags_clear
);

scalar_thunks!(
    Inner,
    value: i64,
    __pb_thunk_3e2e5Outer5Inner_5value_get,
    __pb_thunk_3e2e5Outer5Inner_5value_set,
    __pb_thunk_3e2e5Outer5Inner_5value_clear
);

text_thunks!(
    Outer,
    label,
    __pb_thunk_3e2e5Outer_5label_get,
    __pb_thunk_3e2e5Outer_5label_set,
    __pb_thunk_3e2e5Outer_5label_clear
);

text_thunks!(
    Outer,
    payload,
    __pb_thunk_3e2e5Outer_7payload_get,
    __pb_thunk_3e2e5Outer_7payload_set,
    __pb_thunk_3e2e5Outer_7payload_clear
);

// inner

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_thunk_3e2e5Outer_5inner_get(msg: RawMessage) -> RawMessage {
    match &unsafe { view::<Outer>(msg) }.inner {
        Some(inner) => NonNull::from(inner.as_ref()).cast(),
        None => NonNull::from(&DEFAULT_INNER).cast(),
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_thunk_3e2e5Outer_5inner_get_mut(msg: RawMessage) -> RawMessage {
    let inner = unsafe { edit::<Outer>(msg) }.inner.get_or_insert_with(Box::default);
    NonNull::from(inner.as_mut()).cast()
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_thunk_3e2e5Outer_5inner_clear(msg: RawMessage) {
    let outer = unsafe { edit::<Outer>(msg) };
    outer.inner = None;
}

// oneof choice { alpha = 10, beta = 11 }

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_thunk_3e2e5Outer_6choice_case(msg: RawMessage) -> u32 {
    match unsafe { view::<Outer>(msg) }.choice {
        Choice::NotSet => CHOICE_NOT_SET,
        Choice::Alpha(_) => CHOICE_ALPHA,
        Choice::Beta(_) => CHOICE_BETA,
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_thunk_3e2e5Outer_5alpha_get(msg: RawMessage) -> u64 {
    match unsafe { view::<Outer>(msg) }.choice {
        Choice::Alpha(v) => v,
        _ => 0,
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_thunk_3e2e5Outer_5alpha_set(msg: RawMessage, val: u64) {
    let outer = unsafe { edit::<Outer>(msg) };
    outer.choice = Choice::Alpha(val);
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_thunk_3e2e5Outer_5alpha_clear(msg: RawMessage) {
    let outer = unsafe { edit::<Outer>(msg) };
    if matches!(outer.choice, Choice::Alpha(_)) {
        outer.choice = Choice::NotSet;
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_thunk_3e2e5Outer_4beta_get(msg: RawMessage) -> PtrAndLen {
    match &unsafe { view::<Outer>(msg) }.choice {
        Choice::Beta(v) => PtrAndLen::from_slice(v),
        _ => PtrAndLen::empty(),
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_thunk_3e2e5Outer_4beta_set(msg: RawMessage, val: PtrAndLen) {
    let outer = unsafe { edit::<Outer>(msg) };
    outer.choice = Choice::Beta(unsafe { val.as_ref() }.to_vec());
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_thunk_3e2e5Outer_4beta_clear(msg: RawMessage) {
    let outer = unsafe { edit::<Outer>(msg) };
    if matches!(outer.choice, Choice::Beta(_)) {
        outer.choice = Choice::NotSet;
    }
}
