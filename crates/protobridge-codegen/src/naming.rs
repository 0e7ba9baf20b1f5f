//! Entry-point naming and identifier utilities
//!
//! Every foreign symbol the generated code links against gets its name from
//! this module, so the Rust declaration and the native definition of a thunk
//! always agree.
//!
//! # Message thunks
//!
//! `__pb_thunk_` + length-prefixed name segments + `_` + optional
//! length-prefixed member + `_` + operation:
//!
//! | Entry point | Symbol |
//! |-------------|--------|
//! | `e2e.Outer`, `new` | `__pb_thunk_3e2e5Outer_new` |
//! | `e2e.Outer`, `count`, `get` | `__pb_thunk_3e2e5Outer_5count_get` |
//! | `e2e.Outer.Inner`, `value`, `set` | `__pb_thunk_3e2e5Outer5Inner_5value_set` |
//!
//! Length prefixes keep the scheme injective: `a.b_c` and `a_b.c` can never
//! produce the same symbol.
//!
//! # Container bridge
//!
//! `__pb_rust_RepeatedField_<elem>_<op>` and `__pb_rust_Map_<key>_<value>_<op>`.

use crate::error::{CodegenError, CodegenResult};
use std::collections::BTreeMap;
use std::fmt;

/// Operation performed by a message thunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ThunkOp {
    New,
    Delete,
    Serialize,
    Deserialize,
    Get,
    GetMut,
    Set,
    Clear,
    Case,
}

impl ThunkOp {
    pub fn as_str(self) -> &'static str {
        match self {
            ThunkOp::New => "new",
            ThunkOp::Delete => "delete",
            ThunkOp::Serialize => "serialize",
            ThunkOp::Deserialize => "deserialize",
            ThunkOp::Get => "get",
            ThunkOp::GetMut => "get_mut",
            ThunkOp::Set => "set",
            ThunkOp::Clear => "clear",
            ThunkOp::Case => "case",
        }
    }
}

impl fmt::Display for ThunkOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message-level or member-level thunk
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryPoint {
    /// Fully-qualified message name
    pub message: String,
    /// Field or oneof name
    pub member: Option<String>,
    pub op: ThunkOp,
}

impl EntryPoint {
    pub fn message(message: &str, op: ThunkOp) -> Self {
        Self {
            message: message.to_string(),
            member: None,
            op,
        }
    }

    pub fn member(message: &str, member: &str, op: ThunkOp) -> Self {
        Self {
            message: message.to_string(),
            member: Some(member.to_string()),
            op,
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.member {
            Some(member) => write!(f, "{}.{}:{}", self.message, member, self.op),
            None => write!(f, "{}:{}", self.message, self.op),
        }
    }
}

/// Symbol name of a message thunk
pub fn thunk_name(entry: &EntryPoint) -> String {
    let mut name = String::from("__pb_thunk_");
    for segment in entry.message.split('.').filter(|s| !s.is_empty()) {
        push_length_prefixed(&mut name, segment);
    }
    name.push('_');
    if let Some(member) = &entry.member {
        push_length_prefixed(&mut name, member);
        name.push('_');
    }
    name.push_str(entry.op.as_str());
    name
}

fn push_length_prefixed(out: &mut String, segment: &str) {
    out.push_str(&segment.len().to_string());
    out.push_str(segment);
}

/// Element, key or value type of a bridged container
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BridgeType {
    I32,
    U32,
    F32,
    F64,
    Bool,
    U64,
    I64,
    ProtoStr,
}

impl BridgeType {
    /// Sequence element and map value types
    pub const ELEMENTS: [BridgeType; 8] = [
        BridgeType::I32,
        BridgeType::U32,
        BridgeType::F32,
        BridgeType::F64,
        BridgeType::Bool,
        BridgeType::U64,
        BridgeType::I64,
        BridgeType::ProtoStr,
    ];

    /// Map key types
    pub const MAP_KEYS: [BridgeType; 6] = [
        BridgeType::I32,
        BridgeType::U32,
        BridgeType::Bool,
        BridgeType::U64,
        BridgeType::I64,
        BridgeType::ProtoStr,
    ];

    /// Name segment used in bridge symbols
    pub fn as_str(self) -> &'static str {
        match self {
            BridgeType::I32 => "i32",
            BridgeType::U32 => "u32",
            BridgeType::F32 => "f32",
            BridgeType::F64 => "f64",
            BridgeType::Bool => "bool",
            BridgeType::U64 => "u64",
            BridgeType::I64 => "i64",
            BridgeType::ProtoStr => "ProtoStr",
        }
    }

    /// Rust type crossing the boundary, given the `__internal` module path
    pub fn ffi_type(self, internal: &str) -> String {
        match self {
            BridgeType::ProtoStr => format!("{internal}::PtrAndLen"),
            scalar => scalar.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RepeatedOp {
    New,
    Add,
    Size,
    Get,
    Set,
    CopyFrom,
    Free,
}

impl RepeatedOp {
    pub const ALL: [RepeatedOp; 7] = [
        RepeatedOp::New,
        RepeatedOp::Add,
        RepeatedOp::Size,
        RepeatedOp::Get,
        RepeatedOp::Set,
        RepeatedOp::CopyFrom,
        RepeatedOp::Free,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RepeatedOp::New => "new",
            RepeatedOp::Add => "add",
            RepeatedOp::Size => "size",
            RepeatedOp::Get => "get",
            RepeatedOp::Set => "set",
            RepeatedOp::CopyFrom => "copy_from",
            RepeatedOp::Free => "free",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapOp {
    New,
    Clear,
    Size,
    Insert,
    Get,
    Remove,
    Free,
}

impl MapOp {
    pub const ALL: [MapOp; 7] = [
        MapOp::New,
        MapOp::Clear,
        MapOp::Size,
        MapOp::Insert,
        MapOp::Get,
        MapOp::Remove,
        MapOp::Free,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MapOp::New => "new",
            MapOp::Clear => "clear",
            MapOp::Size => "size",
            MapOp::Insert => "insert",
            MapOp::Get => "get",
            MapOp::Remove => "remove",
            MapOp::Free => "free",
        }
    }
}

/// An entry point of the container bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BridgeEntryPoint {
    Repeated {
        elem: BridgeType,
        op: RepeatedOp,
    },
    Map {
        key: BridgeType,
        value: BridgeType,
        op: MapOp,
    },
}

impl BridgeEntryPoint {
    pub fn name(&self) -> String {
        match self {
            BridgeEntryPoint::Repeated { elem, op } => {
                format!("__pb_rust_RepeatedField_{}_{}", elem.as_str(), op.as_str())
            }
            BridgeEntryPoint::Map { key, value, op } => format!(
                "__pb_rust_Map_{}_{}_{}",
                key.as_str(),
                value.as_str(),
                op.as_str()
            ),
        }
    }

    /// Every bridge entry point: sequences first, then maps, each grouped by
    /// type and listed in operation order
    pub fn all() -> Vec<BridgeEntryPoint> {
        let repeated = BridgeType::ELEMENTS.into_iter().flat_map(|elem| {
            RepeatedOp::ALL
                .into_iter()
                .map(move |op| BridgeEntryPoint::Repeated { elem, op })
        });
        let maps = BridgeType::MAP_KEYS.into_iter().flat_map(|key| {
            BridgeType::ELEMENTS.into_iter().flat_map(move |value| {
                MapOp::ALL
                    .into_iter()
                    .map(move |op| BridgeEntryPoint::Map { key, value, op })
            })
        });
        repeated.chain(maps).collect()
    }
}

impl fmt::Display for BridgeEntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeEntryPoint::Repeated { elem, op } => {
                write!(f, "RepeatedField<{}>:{}", elem.as_str(), op.as_str())
            }
            BridgeEntryPoint::Map { key, value, op } => {
                write!(f, "Map<{}, {}>:{}", key.as_str(), value.as_str(), op.as_str())
            }
        }
    }
}

/// What a registered symbol stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameOwner {
    Thunk(EntryPoint),
    Bridge(BridgeEntryPoint),
}

impl fmt::Display for NameOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameOwner::Thunk(entry) => write!(f, "thunk {entry}"),
            NameOwner::Bridge(entry) => write!(f, "bridge {entry}"),
        }
    }
}

/// Every symbol handed out during one generator run
#[derive(Debug, Default)]
pub struct NameRegistry {
    names: BTreeMap<String, NameOwner>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `name` belongs to `owner`.
    ///
    /// Registering the same pair again is a no-op. A name already owned by a
    /// different entry point is a [`CodegenError::NameCollision`].
    pub fn register(&mut self, name: &str, owner: NameOwner) -> CodegenResult<()> {
        match self.names.get(name) {
            Some(existing) if *existing == owner => Ok(()),
            Some(existing) => Err(CodegenError::NameCollision {
                name: name.to_string(),
                first: existing.to_string(),
                second: owner.to_string(),
            }),
            None => {
                self.names.insert(name.to_string(), owner);
                Ok(())
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Whether `s` is a plain ASCII identifier (letters, digits, underscores, not
/// starting with a digit).
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Convert snake_case or kebab-case to PascalCase.
///
/// # Examples
///
/// ```
/// use protobridge_codegen::naming::to_pascal_case;
///
/// assert_eq!(to_pascal_case("hello_world"), "HelloWorld");
/// assert_eq!(to_pascal_case("choice"), "Choice");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    s.split(['-', '_']).map(capitalize).collect()
}

/// Capitalize the first letter of a string.
///
/// # Examples
///
/// ```
/// use protobridge_codegen::naming::capitalize;
///
/// assert_eq!(capitalize("hello"), "Hello");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Keywords that cannot be written as raw identifiers
const NON_RAW_KEYWORDS: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Raw Rust identifier for a schema name: `count` becomes `r#count`.
///
/// Names that Rust cannot express even as raw identifiers get a trailing
/// underscore (`self` becomes `r#self_`).
pub fn rs_ident(name: &str) -> String {
    if NON_RAW_KEYWORDS.contains(&name) {
        format!("r#{name}_")
    } else {
        format!("r#{name}")
    }
}

const CC_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "class", "compl", "const", "constexpr", "const_cast", "continue",
    "decltype", "default", "delete", "do", "double", "dynamic_cast", "else", "enum", "explicit",
    "export", "extern", "false", "float", "for", "friend", "goto", "if", "inline", "int", "long",
    "mutable", "namespace", "new", "noexcept", "not", "not_eq", "nullptr", "operator", "or",
    "or_eq", "private", "protected", "public", "register", "reinterpret_cast", "return", "short",
    "signed", "sizeof", "static", "static_assert", "static_cast", "struct", "switch", "template",
    "this", "thread_local", "throw", "true", "try", "typedef", "typeid", "typename", "union",
    "unsigned", "using", "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// Native accessor base name for a field: lowercased, with a trailing
/// underscore when it collides with a C++ keyword.
pub fn cc_ident(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    if CC_KEYWORDS.contains(&lower.as_str()) {
        format!("{lower}_")
    } else {
        lower
    }
}
