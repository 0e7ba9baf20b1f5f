//! protobridge - Runtime support for generated message wrappers
//!
//! Generated code wraps a native message engine behind three types per
//! message:
//! - `Msg`: the owning handle (constructs, serializes, deserializes, releases)
//! - `MsgView<'msg>`: a borrowed, copyable, read-only view
//! - `MsgMut<'msg>`: an exclusive mutable cursor
//!
//! Two native backends are supported and the generator picks one per run:
//!
//! - **heavy** ([`__runtime::heavy`]): every message is individually
//!   allocated by the native side and freed with an explicit delete call.
//! - **light** ([`__runtime::light`]): messages live in an [`Arena`] and are
//!   released in bulk when the arena drops.
//!
//! Scalar and string mutation goes through one generic mutator per value
//! kind ([`PrimitiveMut`], [`ProtoStrMut`], [`BytesMut`]) bound to a static
//! getter/setter vtable emitted once per field.
//!
//! Items under `__internal` and `__runtime` exist for generated code only and
//! carry no stability guarantees.

mod arena;
mod error;
mod internal;
mod primitive;
mod proxied;
mod string;
mod vtable;

pub mod heavy;
pub mod light;

pub use arena::Arena;
pub use error::ParseError;
pub use primitive::PrimitiveMut;
pub use proxied::{Mut, Proxied, View};
pub use string::{BytesMut, ProtoStr, ProtoStrMut};

/// Items used by generated code. Not part of the public API.
#[doc(hidden)]
pub mod __internal {
    pub use crate::internal::{
        Private, PtrAndLen, RawArena, RawMap, RawMessage, RawRepeatedField,
    };
    pub use crate::string::BytesMutVTable;
    pub use crate::vtable::{PrimitiveVTable, RawVTableMutator};
}

/// Backend-specific runtime modules selected by the generator.
#[doc(hidden)]
pub mod __runtime {
    pub use crate::heavy;
    pub use crate::light;
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Arena, BytesMut, Mut, ParseError, PrimitiveMut, ProtoStr, ProtoStrMut, Proxied, View,
    };
}
