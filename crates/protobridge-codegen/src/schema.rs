//! Schema input model
//!
//! A [`SchemaSet`] is one generation unit: a package and its message types,
//! already produced by whatever reads the schema language. The generator
//! only reads it.
//!
//! [`SchemaTable`] indexes every message of a unit (nested ones included) by
//! fully-qualified name. Message-typed fields refer to their target by that
//! name, so self and mutual references need no ownership between schema
//! nodes.
//!
//! # JSON form
//!
//! ```json
//! {
//!   "package": "e2e",
//!   "messages": [{
//!     "name": "Outer",
//!     "fields": [
//!       { "name": "count", "number": 1, "kind": "int32" },
//!       { "name": "inner", "number": 2, "kind": { "message": "e2e.Outer.Inner" } }
//!     ],
//!     "nested": [{ "name": "Inner", "fields": [{ "name": "value", "number": 1, "kind": "int64" }] }]
//!   }]
//! }
//! ```

use crate::error::{CodegenError, CodegenResult};
use crate::naming::is_identifier;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

/// One generation unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSet {
    /// Dot-separated package, possibly empty
    #[serde(default)]
    pub package: String,

    /// Top-level messages in declaration order
    #[serde(default)]
    pub messages: Vec<MessageSchema>,
}

/// A message type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSchema {
    pub name: String,

    /// Fields in declaration order; accessors are emitted in this order
    #[serde(default)]
    pub fields: Vec<FieldSchema>,

    #[serde(default)]
    pub oneofs: Vec<OneofSchema>,

    /// Message types declared inside this one
    #[serde(default)]
    pub nested: Vec<MessageSchema>,

    /// Synthetic key/value entry type of a map field
    #[serde(default)]
    pub map_entry: bool,
}

/// A field of a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub number: u32,
    pub kind: FieldKind,

    #[serde(default)]
    pub repetition: Repetition,

    /// Field requests a non-default string representation (cord, string piece)
    #[serde(default)]
    pub alternate_storage: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repetition {
    #[default]
    Singular,
    Repeated,
}

/// Value type of a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float,
    Double,
    Bool,
    String,
    Bytes,
    /// Fully-qualified name of the submessage type
    Message(String),
    /// Fully-qualified name of the enum type
    Enum(String),
    Group,
}

impl FieldKind {
    /// Scalar type for the seven scalar kinds
    pub fn scalar(&self) -> Option<ScalarType> {
        match self {
            FieldKind::Int32 => Some(ScalarType::I32),
            FieldKind::Uint32 => Some(ScalarType::U32),
            FieldKind::Int64 => Some(ScalarType::I64),
            FieldKind::Uint64 => Some(ScalarType::U64),
            FieldKind::Float => Some(ScalarType::F32),
            FieldKind::Double => Some(ScalarType::F64),
            FieldKind::Bool => Some(ScalarType::Bool),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Int32 => f.write_str("int32"),
            FieldKind::Uint32 => f.write_str("uint32"),
            FieldKind::Int64 => f.write_str("int64"),
            FieldKind::Uint64 => f.write_str("uint64"),
            FieldKind::Float => f.write_str("float"),
            FieldKind::Double => f.write_str("double"),
            FieldKind::Bool => f.write_str("bool"),
            FieldKind::String => f.write_str("string"),
            FieldKind::Bytes => f.write_str("bytes"),
            FieldKind::Message(name) | FieldKind::Enum(name) => f.write_str(name),
            FieldKind::Group => f.write_str("group"),
        }
    }
}

/// Closed set of scalar types with a direct Rust and C++ counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Bool,
}

impl ScalarType {
    pub fn rs_type(self) -> &'static str {
        match self {
            ScalarType::I32 => "i32",
            ScalarType::U32 => "u32",
            ScalarType::I64 => "i64",
            ScalarType::U64 => "u64",
            ScalarType::F32 => "f32",
            ScalarType::F64 => "f64",
            ScalarType::Bool => "bool",
        }
    }

    pub fn cc_type(self) -> &'static str {
        match self {
            ScalarType::I32 => "int32_t",
            ScalarType::U32 => "uint32_t",
            ScalarType::I64 => "int64_t",
            ScalarType::U64 => "uint64_t",
            ScalarType::F32 => "float",
            ScalarType::F64 => "double",
            ScalarType::Bool => "bool",
        }
    }
}

/// A tagged union over some of a message's fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneofSchema {
    pub name: String,

    /// Names of member fields, in declaration order
    pub fields: Vec<String>,
}

impl SchemaSet {
    /// Parse a unit from JSON text
    pub fn from_json(text: &str) -> CodegenResult<Self> {
        serde_json::from_str(text).map_err(|e| CodegenError::InvalidSchema(e.to_string()))
    }

    /// Load a unit from a JSON file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {path:?}"))?;
        Self::from_json(&text).with_context(|| format!("Failed to parse schema {path:?}"))
    }
}

/// Resolved information about one message of the unit
#[derive(Debug)]
pub struct MessageInfo<'s> {
    pub schema: &'s MessageSchema,

    /// e.g. `e2e.Outer.Inner`
    pub full_name: String,

    /// Path from the crate root, e.g. `Outer_::Inner`
    pub rust_path: String,

    /// Qualified native class, e.g. `::e2e::Outer_Inner`
    pub cc_name: String,

    /// Full names of directly nested messages, in declaration order
    pub nested: Vec<String>,

    /// Declared, at any depth, inside a map entry message
    pub in_map_entry: bool,
}

impl MessageInfo<'_> {
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn is_map_entry(&self) -> bool {
        self.schema.map_entry
    }

    /// Whether this message, or a message enclosing it, is a map entry.
    /// No wrapper type is generated for any of these.
    pub fn is_skipped_map_entry(&self) -> bool {
        self.is_map_entry() || self.in_map_entry
    }
}

/// Every message of a unit indexed by fully-qualified name
#[derive(Debug)]
pub struct SchemaTable<'s> {
    package: String,
    messages: BTreeMap<String, MessageInfo<'s>>,
    roots: Vec<String>,
}

impl<'s> SchemaTable<'s> {
    /// Validate `schema` and index its messages
    pub fn build(schema: &'s SchemaSet) -> CodegenResult<Self> {
        if !schema.package.is_empty() && !schema.package.split('.').all(is_identifier) {
            return Err(CodegenError::InvalidSchema(format!(
                "package `{}` is not a dotted identifier",
                schema.package
            )));
        }

        let mut table = Self {
            package: schema.package.clone(),
            messages: BTreeMap::new(),
            roots: Vec::new(),
        };

        let cc_namespace = if schema.package.is_empty() {
            String::new()
        } else {
            format!("::{}", schema.package.replace('.', "::"))
        };

        for message in &schema.messages {
            let full_name = table.insert(message, None, false, &cc_namespace)?;
            table.roots.push(full_name);
        }

        Ok(table)
    }

    fn insert(
        &mut self,
        message: &'s MessageSchema,
        parent: Option<(&str, &str, &str)>,
        in_map_entry: bool,
        cc_namespace: &str,
    ) -> CodegenResult<String> {
        validate_message(message)?;

        let (full_name, rust_path, cc_name) = match parent {
            Some((parent_full, parent_rust, parent_cc)) => (
                format!("{parent_full}.{}", message.name),
                format!("{parent_rust}_::{}", message.name),
                format!("{parent_cc}_{}", message.name),
            ),
            None if self.package.is_empty() => (
                message.name.clone(),
                message.name.clone(),
                format!("::{}", message.name),
            ),
            None => (
                format!("{}.{}", self.package, message.name),
                message.name.clone(),
                format!("{cc_namespace}::{}", message.name),
            ),
        };

        if self.messages.contains_key(&full_name) {
            return Err(CodegenError::DuplicateName {
                kind: "message",
                name: full_name,
            });
        }

        let mut nested = Vec::with_capacity(message.nested.len());
        for child in &message.nested {
            let child_name = self.insert(
                child,
                Some((full_name.as_str(), rust_path.as_str(), cc_name.as_str())),
                in_map_entry || message.map_entry,
                cc_namespace,
            )?;
            nested.push(child_name);
        }

        self.messages.insert(
            full_name.clone(),
            MessageInfo {
                schema: message,
                full_name: full_name.clone(),
                rust_path,
                cc_name,
                nested,
                in_map_entry,
            },
        );

        Ok(full_name)
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Look up a message by fully-qualified name
    pub fn get(&self, full_name: &str) -> Option<&MessageInfo<'s>> {
        self.messages.get(full_name)
    }

    /// Top-level messages in declaration order
    pub fn roots(&self) -> impl Iterator<Item = &MessageInfo<'s>> {
        self.roots.iter().filter_map(|name| self.messages.get(name))
    }

    /// Number of messages, nested ones included
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn validate_message(message: &MessageSchema) -> CodegenResult<()> {
    if !is_identifier(&message.name) {
        return Err(CodegenError::InvalidSchema(format!(
            "message name `{}` is not an identifier",
            message.name
        )));
    }

    let mut names = BTreeSet::new();
    let mut numbers = BTreeSet::new();
    for field in &message.fields {
        if !is_identifier(&field.name) {
            return Err(CodegenError::InvalidSchema(format!(
                "field name `{}` in `{}` is not an identifier",
                field.name, message.name
            )));
        }
        if field.number == 0 {
            return Err(CodegenError::InvalidSchema(format!(
                "field `{}.{}` has number 0",
                message.name, field.name
            )));
        }
        if !names.insert(field.name.as_str()) {
            return Err(CodegenError::DuplicateName {
                kind: "field",
                name: format!("{}.{}", message.name, field.name),
            });
        }
        if !numbers.insert(field.number) {
            return Err(CodegenError::InvalidSchema(format!(
                "field number {} is used twice in `{}`",
                field.number, message.name
            )));
        }
    }

    let mut oneof_names = BTreeSet::new();
    let mut members = BTreeSet::new();
    for oneof in &message.oneofs {
        if !is_identifier(&oneof.name) {
            return Err(CodegenError::InvalidSchema(format!(
                "oneof name `{}` in `{}` is not an identifier",
                oneof.name, message.name
            )));
        }
        if !oneof_names.insert(oneof.name.as_str()) {
            return Err(CodegenError::DuplicateName {
                kind: "oneof",
                name: format!("{}.{}", message.name, oneof.name),
            });
        }
        if oneof.fields.is_empty() {
            return Err(CodegenError::InvalidSchema(format!(
                "oneof `{}.{}` has no members",
                message.name, oneof.name
            )));
        }
        for member in &oneof.fields {
            let Some(field) = message.fields.iter().find(|f| &f.name == member) else {
                return Err(CodegenError::InvalidSchema(format!(
                    "oneof `{}.{}` names unknown field `{member}`",
                    message.name, oneof.name
                )));
            };
            if field.repetition == Repetition::Repeated {
                return Err(CodegenError::InvalidSchema(format!(
                    "oneof member `{}.{member}` is repeated",
                    message.name
                )));
            }
            if !members.insert(member.as_str()) {
                return Err(CodegenError::InvalidSchema(format!(
                    "field `{}.{member}` belongs to more than one oneof",
                    message.name
                )));
            }
        }
    }

    Ok(())
}
