use std::collections::HashMap;

use protonic::{Message, OpenEnum};
use protonic_tests::{
    oneof_message, Envelope, MapMessage, Mood, OneofMessage, PackedMessage, Profile,
    ScalarMessage, TreeNode,
};

#[test]
fn scalar_fields_encode_to_known_bytes() {
    let message = ScalarMessage {
        a: 150,
        b: "testing".to_string(),
        ..Default::default()
    };

    let encoded = message.encode_to_vec();
    assert_eq!(
        encoded,
        [0x08, 0x96, 0x01, 0x12, 0x07, 0x74, 0x65, 0x73, 0x74, 0x69, 0x6E, 0x67],
    );
    assert_eq!(message.encoded_len(), encoded.len());
    assert_eq!(ScalarMessage::decode(&encoded[..]).unwrap(), message);
}

#[test]
fn default_values_are_omitted() {
    let message = ScalarMessage::default();
    assert_eq!(message.encode_to_vec(), Vec::<u8>::new());
    assert_eq!(message.encoded_len(), 0);
    assert_eq!(ScalarMessage::decode(&[][..]).unwrap(), message);
}

#[test]
fn packed_repeated_encodes_as_one_record() {
    let message = PackedMessage {
        xs: vec![1, 2, 3],
        ..Default::default()
    };
    let encoded = message.encode_to_vec();
    assert_eq!(encoded, [0x1A, 0x03, 0x01, 0x02, 0x03]);
    assert_eq!(message.encoded_len(), encoded.len());
}

#[test]
fn unpacked_records_decode_into_packed_fields() {
    let unpacked = [0x18, 0x01, 0x18, 0x02, 0x18, 0x03];
    let message = PackedMessage::decode(&unpacked[..]).unwrap();
    assert_eq!(message.xs, vec![1, 2, 3]);

    // Re-encoding normalizes to the packed form, which is never longer.
    let reencoded = message.encode_to_vec();
    assert!(reencoded.len() <= unpacked.len());
    assert_eq!(PackedMessage::decode(&reencoded[..]).unwrap(), message);
}

#[test]
fn maps_roundtrip_in_any_order() {
    let message = MapMessage {
        m: HashMap::from([("a".to_string(), 1), ("b".to_string(), 2)]),
        ..Default::default()
    };

    let encoded = message.encode_to_vec();
    assert_eq!(message.encoded_len(), encoded.len());
    assert_eq!(MapMessage::decode(&encoded[..]).unwrap(), message);

    // One entry has a fixed byte shape: tag, entry length, key record,
    // value record.
    let single = MapMessage {
        m: HashMap::from([("a".to_string(), 1)]),
        ..Default::default()
    };
    assert_eq!(
        single.encode_to_vec(),
        [0x0A, 0x05, 0x0A, 0x01, 0x61, 0x10, 0x01],
    );
}

#[test]
fn map_entries_decode_with_last_wins_duplicates() {
    // Two entries for key "k": value 1 then value 9.
    let bytes = [
        0x0A, 0x05, 0x0A, 0x01, 0x6B, 0x10, 0x01, // {"k": 1}
        0x0A, 0x05, 0x0A, 0x01, 0x6B, 0x10, 0x09, // {"k": 9}
    ];
    let message = MapMessage::decode(&bytes[..]).unwrap();
    assert_eq!(message.m, HashMap::from([("k".to_string(), 9)]));
}

#[test]
fn oneof_selection_is_last_wins_across_variants() {
    let message = OneofMessage {
        which: Some(oneof_message::Which::S("hi".to_string())),
        ..Default::default()
    };
    let mut encoded = message.encode_to_vec();
    assert_eq!(message.encoded_len(), encoded.len());

    // A stray record for the other variant replaces the selection.
    encoded.extend_from_slice(&[0x08, 0x07]);
    let decoded = OneofMessage::decode(&encoded[..]).unwrap();
    assert_eq!(decoded.which, Some(oneof_message::Which::I(7)));
}

#[test]
fn unknown_fields_roundtrip_verbatim() {
    let mut bytes = ScalarMessage {
        a: 1,
        ..Default::default()
    }
    .encode_to_vec();
    // Tag 99 varint and tag 100 length-delimited records the schema does
    // not declare.
    let unknown = [0x98, 0x06, 0x2A, 0xA2, 0x06, 0x03, 0x78, 0x79, 0x7A];
    bytes.extend_from_slice(&unknown);

    let decoded = ScalarMessage::decode(&bytes[..]).unwrap();
    assert_eq!(decoded.a, 1);
    assert!(!decoded.unknown_fields.is_empty());

    let reencoded = decoded.encode_to_vec();
    assert_eq!(decoded.encoded_len(), reencoded.len());
    // Known fields first, unknown records verbatim after them.
    assert!(reencoded.ends_with(&unknown));
    assert_eq!(ScalarMessage::decode(&reencoded[..]).unwrap(), decoded);
}

#[test]
fn wire_type_mismatches_are_preserved_as_unknown_fields() {
    // Tag 2 is declared as a string but arrives as a varint; the record
    // lands in the unknown-field set and survives a round trip.
    let bytes = [0x10, 0x01];
    let decoded = ScalarMessage::decode(&bytes[..]).unwrap();
    assert_eq!(decoded.b, "");
    assert!(!decoded.unknown_fields.is_empty());
    assert_eq!(decoded.encode_to_vec(), bytes);
}

#[test]
fn nested_messages_roundtrip_and_size_exactly() {
    let message = TreeNode {
        value: 5,
        child: Some(Box::new(TreeNode {
            value: -3,
            child: Some(Box::new(TreeNode::default())),
            ..Default::default()
        })),
        ..Default::default()
    };

    let encoded = message.encode_to_vec();
    assert_eq!(message.encoded_len(), encoded.len());
    assert_eq!(TreeNode::decode(&encoded[..]).unwrap(), message);
}

#[test]
fn recursion_depth_is_limited() {
    let mut node = TreeNode {
        value: 1,
        ..Default::default()
    };
    for _ in 0..150 {
        node = TreeNode {
            value: 1,
            child: Some(Box::new(node)),
            ..Default::default()
        };
    }
    let encoded = node.encode_to_vec();
    let error = TreeNode::decode(&encoded[..]).expect_err("decoded past the recursion limit");
    assert!(error.to_string().contains("recursion limit reached"));

    // A comfortably shallow tree decodes fine.
    let mut node = TreeNode::default();
    for _ in 0..50 {
        node = TreeNode {
            value: 1,
            child: Some(Box::new(node)),
            ..Default::default()
        };
    }
    let encoded = node.encode_to_vec();
    assert_eq!(TreeNode::decode(&encoded[..]).unwrap(), node);
}

#[test]
fn strict_decode_requires_required_fields() {
    // Only the optional `note` field on the wire.
    let bytes = [0x12, 0x02, 0x68, 0x69];

    let relaxed = Envelope::decode(&bytes[..]).unwrap();
    assert_eq!(relaxed.id, 0);
    assert_eq!(relaxed.note.as_deref(), Some("hi"));

    let error = Envelope::decode_strict(&bytes[..]).expect_err("missing required field decoded");
    assert!(error.to_string().contains("missing required field"));

    let complete = Envelope {
        id: 7,
        note: Some("hi".to_string()),
        ..Default::default()
    };
    let encoded = complete.encode_to_vec();
    assert_eq!(Envelope::decode_strict(&encoded[..]).unwrap(), complete);
}

#[test]
fn open_enums_preserve_unrecognized_values() {
    // mood = 9, which the schema does not know.
    let bytes = [0x08, 0x09];
    let profile = Profile::decode(&bytes[..]).unwrap();
    assert_eq!(profile.mood, OpenEnum::Unknown(9));

    let reencoded = profile.encode_to_vec();
    assert_eq!(reencoded, bytes);

    let known = Profile {
        mood: OpenEnum::Known(Mood::Happy),
        history: vec![
            OpenEnum::Known(Mood::Sad),
            OpenEnum::Unknown(42),
            OpenEnum::Known(Mood::Happy),
        ],
        ..Default::default()
    };
    let encoded = known.encode_to_vec();
    assert_eq!(known.encoded_len(), encoded.len());
    assert_eq!(Profile::decode(&encoded[..]).unwrap(), known);
}

#[test]
fn adversarial_inputs_fail_cleanly() {
    // Ten continuation bytes: a varint that never terminates.
    let bytes = [0x08, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
    ScalarMessage::decode(&bytes[..]).expect_err("overlong varint decoded");

    // A key with tag zero.
    let bytes = [0x00];
    ScalarMessage::decode(&bytes[..]).expect_err("tag zero decoded");

    // A length delimiter pointing past the end of the buffer.
    let bytes = [0x12, 0x7F, 0x68];
    ScalarMessage::decode(&bytes[..]).expect_err("truncated record decoded");

    // A string field holding invalid UTF-8.
    let bytes = [0x12, 0x02, 0xC0, 0xAF];
    ScalarMessage::decode(&bytes[..]).expect_err("invalid UTF-8 decoded");
}

#[test]
fn clear_resets_to_defaults() {
    let mut message = ScalarMessage {
        a: 9,
        b: "x".to_string(),
        ..Default::default()
    };
    message.clear();
    assert_eq!(message, ScalarMessage::default());
}

#[test]
fn length_delimited_roundtrip() {
    let message = ScalarMessage {
        a: 3,
        b: "abc".to_string(),
        ..Default::default()
    };
    let encoded = message.encode_length_delimited_to_vec();
    assert_eq!(
        ScalarMessage::decode_length_delimited(&encoded[..]).unwrap(),
        message,
    );
}
