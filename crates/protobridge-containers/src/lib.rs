//! protobridge-containers - Native-callable container primitives
//!
//! Generic sequence and key/value containers exported over the C ABI so the
//! native side of a collection field can build and edit them without knowing
//! anything about Rust. Every export follows one naming scheme:
//!
//! - `__pb_rust_RepeatedField_<T>_<op>` for `T` in
//!   `i32 u32 f32 f64 bool u64 i64 ProtoStr`
//! - `__pb_rust_Map_<K>_<V>_<op>` for `K` in `i32 u32 bool u64 i64 ProtoStr`
//!   and `V` in the sequence element set
//!
//! Text crosses the boundary as a borrowed pointer/length pair and is copied
//! into container storage on the way in. Text handed back out borrows that
//! storage until the next mutation of the container.
//!
//! The containers keep no global state; each handle is independent and must
//! be released with the matching `free`.

pub mod map;
pub mod repeated;
mod value;

pub use map::Map;
pub use repeated::RepeatedField;
pub use value::{FfiKey, FfiValue};
