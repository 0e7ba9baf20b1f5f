//! Wire format shared by the fake kernels
//!
//! Serialized messages are JSON snapshots of the field values. Both kernels
//! convert their in-memory layout to and from these types, so bytes written
//! by one backend parse with the other.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OuterWire {
    pub count: i32,
    pub label: Vec<u8>,
    pub payload: Vec<u8>,
    pub ratio: f64,
    pub enabled: bool,
    pub weight: f32,
    pub flags: u32,
    pub inner: Option<InnerWire>,
    pub choice: Option<ChoiceWire>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InnerWire {
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceWire {
    Alpha(u64),
    Beta(Vec<u8>),
}

/// Case numbers reported by the `choice` case thunk
pub const CHOICE_NOT_SET: u32 = 0;
pub const CHOICE_ALPHA: u32 = 10;
pub const CHOICE_BETA: u32 = 11;

pub fn encode<T: Serialize>(value: &T) -> Vec<u8> {
    // Struct and enum data with string keys never fails to serialize
    serde_json::to_vec(value).unwrap_or_default()
}

pub fn decode<T: for<'de> Deserialize<'de>>(bytes: &[u8]) -> Option<T> {
    serde_json::from_slice(bytes).ok()
}
