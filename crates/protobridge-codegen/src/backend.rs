//! Backend selection
//!
//! Everything that differs between the two native backends lives behind
//! [`BackendStrategy`]: which message thunks exist, their foreign
//! signatures, and the bodies of the lifecycle and submessage accessors that
//! call them. The rest of the generator is backend-agnostic and asks the
//! strategy for these pieces.
//!
//! Strategy templates use these variables besides `$pb$`, `$pbi$` and `$pbr$`:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `$new_thunk$`, `$delete_thunk$`, `$serialize_thunk$`, `$deserialize_thunk$` | message thunks |
//! | `$getter_thunk$`, `$getter_mut_thunk$`, `$clear_thunk$` | submessage field thunks |
//! | `$self$` | raw message expression in the current accessor context |
//! | `$SubView$`, `$SubMut$` | view and cursor types of the submessage |

use crate::error::CodegenError;
use crate::naming::ThunkOp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Native message backend the generated code links against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Individually allocated messages freed by a delete thunk
    #[default]
    Heavy,
    /// Arena-allocated messages freed in bulk
    Light,
}

impl Backend {
    pub fn strategy(self) -> &'static dyn BackendStrategy {
        match self {
            Backend::Heavy => &HeavyBackend,
            Backend::Light => &LightBackend,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Heavy => "heavy",
            Backend::Light => "light",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "heavy" => Ok(Backend::Heavy),
            "light" => Ok(Backend::Light),
            other => Err(CodegenError::Config(format!(
                "unknown backend `{other}`, expected `heavy` or `light`"
            ))),
        }
    }
}

/// Backend-specific pieces of generated code
pub trait BackendStrategy: Sync {
    fn backend(&self) -> Backend;

    /// Module under `__runtime` holding the backend's runtime types
    fn runtime_module(&self) -> &'static str;

    /// Message-level thunks this backend declares
    fn message_ops(&self) -> &'static [ThunkOp];

    /// Body of `Msg::new`
    fn new_body(&self) -> &'static str;

    /// Body of `Msg::serialize`
    fn serialize_body(&self) -> &'static str;

    /// Body of `Msg::deserialize`, which receives `data: &[u8]`
    fn deserialize_body(&self) -> &'static str;

    /// Body of `Drop::drop` for the owning type
    fn drop_body(&self) -> &'static str;

    /// Foreign declarations of the message thunks
    fn message_externs(&self) -> &'static str;

    /// Body of a submessage getter returning `$SubView$`
    fn submessage_view_body(&self) -> &'static str;

    /// Body of a cursor's `x_mut` returning `$SubMut$`
    fn submessage_mut_body(&self) -> &'static str;

    /// Foreign declarations of a submessage field's thunks
    fn submessage_externs(&self) -> &'static str;

    /// Extra owner methods for handing messages to and from native code
    fn raw_access(&self) -> Option<&'static str>;

    /// Whether native thunk source is emitted alongside the Rust code
    fn emits_cc_thunks(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeavyBackend;

#[derive(Debug, Clone, Copy, Default)]
pub struct LightBackend;

impl BackendStrategy for HeavyBackend {
    fn backend(&self) -> Backend {
        Backend::Heavy
    }

    fn runtime_module(&self) -> &'static str {
        "heavy"
    }

    fn message_ops(&self) -> &'static [ThunkOp] {
        &[
            ThunkOp::New,
            ThunkOp::Delete,
            ThunkOp::Serialize,
            ThunkOp::Deserialize,
        ]
    }

    fn new_body(&self) -> &'static str {
        r#"
            Self {
                inner: $pbr$::MessageInner {
                    msg: unsafe { $new_thunk$() },
                },
            }
        "#
    }

    fn serialize_body(&self) -> &'static str {
        r#"
            unsafe { $serialize_thunk$(self.inner.msg) }
        "#
    }

    fn deserialize_body(&self) -> &'static str {
        r#"
            let data = $pbi$::PtrAndLen::from_slice(data);
            if unsafe { $deserialize_thunk$(self.inner.msg, data) } {
                Ok(())
            } else {
                Err($pb$::ParseError)
            }
        "#
    }

    fn drop_body(&self) -> &'static str {
        r#"
            unsafe { $delete_thunk$(self.inner.msg) };
        "#
    }

    fn message_externs(&self) -> &'static str {
        r#"
            fn $new_thunk$() -> $pbi$::RawMessage;
            fn $delete_thunk$(raw_msg: $pbi$::RawMessage);
            fn $serialize_thunk$(raw_msg: $pbi$::RawMessage) -> $pbr$::SerializedData;
            fn $deserialize_thunk$(raw_msg: $pbi$::RawMessage, data: $pbi$::PtrAndLen) -> bool;
        "#
    }

    fn submessage_view_body(&self) -> &'static str {
        r#"
            let submsg = unsafe { $getter_thunk$($self$) };
            $SubView$::new($pbi$::Private, submsg)
        "#
    }

    fn submessage_mut_body(&self) -> &'static str {
        r#"
            let submsg = unsafe { $getter_mut_thunk$(self.inner.msg()) };
            $SubMut$::from_ref($pbi$::Private, unsafe { self.inner.child($pbi$::Private, submsg) })
        "#
    }

    fn submessage_externs(&self) -> &'static str {
        r#"
            fn $getter_thunk$(raw_msg: $pbi$::RawMessage) -> $pbi$::RawMessage;
            fn $getter_mut_thunk$(raw_msg: $pbi$::RawMessage) -> $pbi$::RawMessage;
            fn $clear_thunk$(raw_msg: $pbi$::RawMessage);
        "#
    }

    fn raw_access(&self) -> Option<&'static str> {
        Some(
            r#"
            /// Take ownership of a native message.
            ///
            /// # Safety
            ///
            /// `msg` must be an individually allocated native message of this
            /// type that nothing else owns. It is deleted when the returned
            /// value drops.
            pub unsafe fn __unstable_wrap_raw_message(msg: $pbi$::RawMessage) -> Self {
                Self {
                    inner: $pbr$::MessageInner { msg },
                }
            }

            /// Native message behind this value. Ownership stays with `self`.
            pub fn __unstable_raw_message(&mut self) -> $pbi$::RawMessage {
                self.inner.msg
            }
        "#,
        )
    }

    fn emits_cc_thunks(&self) -> bool {
        true
    }
}

impl BackendStrategy for LightBackend {
    fn backend(&self) -> Backend {
        Backend::Light
    }

    fn runtime_module(&self) -> &'static str {
        "light"
    }

    fn message_ops(&self) -> &'static [ThunkOp] {
        &[ThunkOp::New, ThunkOp::Serialize, ThunkOp::Deserialize]
    }

    fn new_body(&self) -> &'static str {
        r#"
            let arena = $pbr$::Arena::new();
            Self {
                inner: $pbr$::MessageInner {
                    msg: unsafe { $new_thunk$(arena.raw()) },
                    arena,
                },
            }
        "#
    }

    fn serialize_body(&self) -> &'static str {
        r#"
            let arena = $pbr$::Arena::new();
            let mut len = 0;
            unsafe {
                let data = $serialize_thunk$(self.inner.msg, arena.raw(), &mut len);
                $pbr$::SerializedData::from_raw_parts(arena, data, len)
            }
        "#
    }

    fn deserialize_body(&self) -> &'static str {
        r#"
            let arena = $pbr$::Arena::new();
            let msg = unsafe { $deserialize_thunk$(data.as_ptr(), data.len(), arena.raw()) };
            match msg {
                None => Err($pb$::ParseError),
                Some(msg) => {
                    // The old arena, and everything in it, is freed here.
                    self.inner = $pbr$::MessageInner { msg, arena };
                    Ok(())
                }
            }
        "#
    }

    fn drop_body(&self) -> &'static str {
        ""
    }

    fn message_externs(&self) -> &'static str {
        r#"
            fn $new_thunk$(arena: $pbi$::RawArena) -> $pbi$::RawMessage;
            fn $serialize_thunk$(raw_msg: $pbi$::RawMessage, arena: $pbi$::RawArena, len: &mut usize) -> ::std::ptr::NonNull<u8>;
            fn $deserialize_thunk$(data: *const u8, size: usize, arena: $pbi$::RawArena) -> ::std::option::Option<$pbi$::RawMessage>;
        "#
    }

    fn submessage_view_body(&self) -> &'static str {
        r#"
            let submsg = unsafe { $getter_thunk$($self$) };
            match submsg {
                None => $SubView$::new($pbi$::Private, $pbr$::ScratchSpace::zeroed_block($pbi$::Private)),
                Some(field) => $SubView$::new($pbi$::Private, field),
            }
        "#
    }

    fn submessage_mut_body(&self) -> &'static str {
        r#"
            let submsg = unsafe { $getter_mut_thunk$(self.inner.msg(), self.inner.raw_arena($pbi$::Private)) };
            $SubMut$::from_ref($pbi$::Private, unsafe { self.inner.child($pbi$::Private, submsg) })
        "#
    }

    fn submessage_externs(&self) -> &'static str {
        r#"
            fn $getter_thunk$(raw_msg: $pbi$::RawMessage) -> ::std::option::Option<$pbi$::RawMessage>;
            fn $getter_mut_thunk$(raw_msg: $pbi$::RawMessage, arena: $pbi$::RawArena) -> $pbi$::RawMessage;
            fn $clear_thunk$(raw_msg: $pbi$::RawMessage);
        "#
    }

    fn raw_access(&self) -> Option<&'static str> {
        None
    }

    fn emits_cc_thunks(&self) -> bool {
        false
    }
}
