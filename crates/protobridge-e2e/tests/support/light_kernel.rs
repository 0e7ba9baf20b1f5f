//! Fake light-backend kernel
//!
//! Messages are `#[repr(C)]` structs allocated in the caller's arena, and
//! strings are stored as views of arena-owned bytes. Every layout is valid
//! when all-zero, so the shared zeroed block reads as a default instance of
//! any of them. Nothing is freed individually.

#![allow(non_snake_case)]

use crate::wire::{self, CHOICE_ALPHA, CHOICE_BETA, CHOICE_NOT_SET, ChoiceWire, InnerWire, OuterWire};
use protobridge::Arena;
use protobridge::__internal::{PtrAndLen, RawArena, RawMessage};
use std::alloc::Layout;
use std::ptr::{self, NonNull};

#[repr(C)]
pub struct Outer {
    count: i32,
    enabled: bool,
    flags: u32,
    weight: f32,
    ratio: f64,
    label: PtrAndLen,
    payload: PtrAndLen,
    inner: Option<RawMessage>,
    choice_case: u32,
    alpha: u64,
    beta: PtrAndLen,
}

#[repr(C)]
pub struct Inner {
    value: i64,
}

/// Owned copy of a stored string
fn bytes(text: PtrAndLen) -> Vec<u8> {
    // SAFETY: stored strings are empty or live in the message's arena
    unsafe { text.as_ref() }.to_vec()
}

/// Copy `bytes` into `arena`
unsafe fn copy_in(arena: RawArena, bytes: &[u8]) -> PtrAndLen {
    if bytes.is_empty() {
        return PtrAndLen::empty();
    }
    let dst = unsafe { Arena::alloc_raw(arena, Layout::for_value(bytes)) };
    unsafe { ptr::copy_nonoverlapping(bytes.as_ptr(), dst.as_ptr(), bytes.len()) };
    PtrAndLen {
        ptr: dst.as_ptr(),
        len: bytes.len(),
    }
}

/// Zeroed, and therefore default, `T` in `arena`
unsafe fn alloc<T>(arena: RawArena) -> RawMessage {
    unsafe { Arena::alloc_raw(arena, Layout::new::<T>()) }
}

unsafe fn view<'a, T>(msg: RawMessage) -> &'a T {
    unsafe { msg.cast::<T>().as_ref() }
}

unsafe fn edit<'a, T>(msg: RawMessage) -> &'a mut T {
    unsafe { msg.cast::<T>().as_mut() }
}

impl Outer {
    fn to_wire(&self) -> OuterWire {
        OuterWire {
            count: self.count,
            label: bytes(self.label),
            payload: bytes(self.payload),
            ratio: self.ratio,
            enabled: self.enabled,
            weight: self.weight,
            flags: self.flags,
            inner: self
                .inner
                .map(|inner| unsafe { view::<Inner>(inner) }.to_wire()),
            choice: match self.choice_case {
                CHOICE_ALPHA => Some(ChoiceWire::Alpha(self.alpha)),
                CHOICE_BETA => Some(ChoiceWire::Beta(bytes(self.beta))),
                _ => None,
            },
        }
    }

    /// Fill a zeroed message from `wire`, copying strings into `arena`
    unsafe fn fill(&mut self, wire: &OuterWire, arena: RawArena) {
        self.count = wire.count;
        self.label = unsafe { copy_in(arena, &wire.label) };
        self.payload = unsafe { copy_in(arena, &wire.payload) };
        self.ratio = wire.ratio;
        self.enabled = wire.enabled;
        self.weight = wire.weight;
        self.flags = wire.flags;
        if let Some(inner) = &wire.inner {
            let msg = unsafe { alloc::<Inner>(arena) };
            unsafe { edit::<Inner>(msg).fill(inner, arena) };
            self.inner = Some(msg);
        }
        match &wire.choice {
            None => self.choice_case = CHOICE_NOT_SET,
            Some(ChoiceWire::Alpha(v)) => {
                self.choice_case = CHOICE_ALPHA;
                self.alpha = *v;
            }
            Some(ChoiceWire::Beta(v)) => {
                self.choice_case = CHOICE_BETA;
                self.beta = unsafe { copy_in(arena, v) };
            }
        }
    }
}

impl Inner {
    fn to_wire(&self) -> InnerWire {
        InnerWire { value: self.value }
    }

    unsafe fn fill(&mut self, wire: &InnerWire, _arena: RawArena) {
        self.value = wire.value;
    }
}

macro_rules! message_thunks {
    ($msg:ty, $wire:ty, $new:ident, $serialize:ident, $deserialize:ident) => {
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $new(arena: RawArena) -> RawMessage {
            unsafe { alloc::<$msg>(arena) }
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $serialize(
            msg: RawMessage,
            arena: RawArena,
            len: &mut usize,
        ) -> NonNull<u8> {
            let snapshot = unsafe { view::<$msg>(msg) }.to_wire();
            let encoded = unsafe { copy_in(arena, &wire::encode(&snapshot)) };
            *len = encoded.len;
            NonNull::new(encoded.ptr.cast_mut()).unwrap_or(NonNull::dangling())
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $deserialize(
            data: *const u8,
            size: usize,
            arena: RawArena,
        ) -> Option<RawMessage> {
            let input = unsafe { PtrAndLen { ptr: data, len: size }.as_ref() };
            let parsed = wire::decode::<$wire>(input)?;
            let msg = unsafe { alloc::<$msg>(arena) };
            unsafe { edit::<$msg>(msg).fill(&parsed, arena) };
            Some(msg)
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
            let message = unsafe { view::<$msg>(msg) };
            message.$field
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $set(msg: RawMessage, val: PtrAndLen) {
            // Already copied into the message's arena by the caller
            let message = unsafe { edit::<$msg>(msg) };
            message.$field = val;
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $clear(msg: RawMessage) {
            let message = unsafe { edit::<$msg>(msg) };
            message.$field = PtrAndLen::empty();
        }
    };
}

message_thunks!(
    Outer,
    OuterWire,
    __pb_thunk_3e2e5Outer_new,
    __pb_thunk_3e2e5Outer_serialize,
    __pb_thunk_3e2e5Outer_deserialize
);

message_thunks!(
    Inner,
    InnerWire,
    __pb_thunk_3e2e5Outer5Inner_new,
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

// inner: absent until first mutable access

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_thunk_3e2e5Outer_5inner_get(msg: RawMessage) -> Option<RawMessage> {
    let outer = unsafe { view::<Outer>(msg) };
    outer.inner
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_thunk_3e2e5Outer_5inner_get_mut(
    msg: RawMessage,
    arena: RawArena,
) -> RawMessage {
    let outer = unsafe { edit::<Outer>(msg) };
    *outer
        .inner
        .get_or_insert_with(|| unsafe { alloc::<Inner>(arena) })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_thunk_3e2e5Outer_5inner_clear(msg: RawMessage) {
    let outer = unsafe { edit::<Outer>(msg) };
    outer.inner = None;
}

// oneof choice { alpha = 10, beta = 11 }

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_thunk_3e2e5Outer_6choice_case(msg: RawMessage) -> u32 {
    let outer = unsafe { view::<Outer>(msg) };
    outer.choice_case
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_thunk_3e2e5Outer_5alpha_get(msg: RawMessage) -> u64 {
    let outer = unsafe { view::<Outer>(msg) };
    if outer.choice_case == CHOICE_ALPHA { outer.alpha } else { 0 }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_thunk_3e2e5Outer_5alpha_set(msg: RawMessage, val: u64) {
    let outer = unsafe { edit::<Outer>(msg) };
    outer.choice_case = CHOICE_ALPHA;
    outer.alpha = val;
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_thunk_3e2e5Outer_5alpha_clear(msg: RawMessage) {
    let outer = unsafe { edit::<Outer>(msg) };
    if outer.choice_case == CHOICE_ALPHA {
        outer.choice_case = CHOICE_NOT_SET;
        outer.alpha = 0;
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_thunk_3e2e5Outer_4beta_get(msg: RawMessage) -> PtrAndLen {
    let outer = unsafe { view::<Outer>(msg) };
    if outer.choice_case == CHOICE_BETA {
        outer.beta
    } else {
        PtrAndLen::empty()
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_thunk_3e2e5Outer_4beta_set(msg: RawMessage, val: PtrAndLen) {
    let outer = unsafe { edit::<Outer>(msg) };
    outer.choice_case = CHOICE_BETA;
    outer.beta = val;
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __pb_thunk_3e2e5Outer_4beta_clear(msg: RawMessage) {
    let outer = unsafe { edit::<Outer>(msg) };
    if outer.choice_case == CHOICE_BETA {
        outer.choice_case = CHOICE_NOT_SET;
        outer.beta = PtrAndLen::empty();
    }
}
