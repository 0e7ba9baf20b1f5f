#![allow(non_snake_case)]

use super::*;

fn fake_message(slot: &mut u64) -> RawMessage {
    NonNull::from(slot).cast::<u8>()
}

#[test]
fn SerializedData___from_vec___derefs_to_bytes() {
    let data = SerializedData::from_vec(vec![8, 150, 1]);

    assert_eq!(&*data, &[8, 150, 1]);
    assert_eq!(data.len(), 3);
    assert!(!data.is_empty());
}

#[test]
fn SerializedData___from_empty_vec___is_empty() {
    let data = SerializedData::from_vec(Vec::new());

    assert!(data.is_empty());
    assert_eq!(&*data, &[] as &[u8]);
}

#[test]
fn SerializedData___from_native_allocation___frees_on_drop() {
    let len = 5;
    let ptr = __pb_rust_alloc(len);
    unsafe { std::ptr::copy_nonoverlapping(b"bytes".as_ptr(), ptr, len) };

    let data = unsafe { SerializedData::from_raw_parts(NonNull::new(ptr).unwrap(), len) };

    assert_eq!(&*data, b"bytes");
}

#[test]
fn __pb_rust_alloc___zero_len___returns_non_null() {
    let ptr = __pb_rust_alloc(0);

    assert!(!ptr.is_null());
    drop(unsafe { SerializedData::from_raw_parts(NonNull::new(ptr).unwrap(), 0) });
}

#[test]
fn __pb_rust_alloc___len_beyond_any_layout___returns_null() {
    let ptr = __pb_rust_alloc(usize::MAX);

    assert!(ptr.is_null());
}

const CPP_API: &str = include_str!("../../include/protobridge/cpp_api.h");

#[test]
fn cpp_api___serialize_helper___never_hands_null_to_rust() {
    let serialize = CPP_API.split("SerializeMsg(").nth(1).unwrap();
    let check = serialize.find("if (bytes == nullptr)").unwrap();
    let write = serialize.find("SerializeWithCachedSizesToArray").unwrap();

    assert!(check < write);
}

#[test]
fn cpp_api___deserialize_helper___rejects_lengths_beyond_int() {
    let deserialize = CPP_API.split("DeserializeMsg(").nth(1).unwrap();
    let guard = deserialize
        .find("if (data.len > static_cast<std::size_t>(INT_MAX)) {\n    return false;")
        .unwrap();
    let parse = deserialize.find("ParseFromArray").unwrap();

    assert!(guard < parse);
}

#[test]
fn SerializedData___debug___shows_len() {
    let data = SerializedData::from_vec(vec![1, 2]);

    assert_eq!(format!("{:?}", data), "SerializedData { len: 2 }");
}

#[test]
fn MutatorMessageRef___from_parent___points_at_parent_message() {
    let mut slot = 0u64;
    let mut inner = MessageInner {
        msg: fake_message(&mut slot),
    };
    let expected = inner.msg;

    let cursor = MutatorMessageRef::from_parent(Private, &mut inner);

    assert_eq!(cursor.msg(), expected);
    assert!(cursor.arena(Private).is_none());
}

#[test]
fn MutatorMessageRef___reborrow___keeps_message() {
    let mut slot = 0u64;
    let mut inner = MessageInner {
        msg: fake_message(&mut slot),
    };
    let expected = inner.msg;
    let mut cursor = MutatorMessageRef::from_parent(Private, &mut inner);

    let reborrowed = cursor.reborrow();

    assert_eq!(reborrowed.msg(), expected);
}

#[test]
fn MutatorMessageRef___child___points_at_submessage() {
    let mut parent_slot = 0u64;
    let mut child_slot = 0u64;
    let mut inner = MessageInner {
        msg: fake_message(&mut parent_slot),
    };
    let child_msg = fake_message(&mut child_slot);
    let mut cursor = MutatorMessageRef::from_parent(Private, &mut inner);

    let child = unsafe { cursor.child(Private, child_msg) };

    assert_eq!(child.msg(), child_msg);
}
