// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tagged encoding through payload types and containers.

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic

mod common;

use cadence::serialization::{
    Deserializer, FieldTag, Payload, SerError, SerializationFactory, Serializer, WireKind,
};
use cadence::{Container, TimeStamp};
use common::{sample_pose, Pose, StatusV1, StatusV2, Vec2};

#[test]
fn test_pose_roundtrip_through_container() {
    let pose = sample_pose();
    let container = Container::new(&pose)
        .expect("container")
        .with_sender_stamp(42)
        .with_sample_time_stamp(TimeStamp::new(10, 5));

    let bytes = container.encode().expect("encode");
    assert_eq!(bytes.len(), container.encoded_len());

    let decoded = Container::decode(&bytes).expect("decode");
    assert_eq!(decoded, container);
    assert_eq!(decoded.data_type(), Pose::ID);
    assert_eq!(decoded.sender_stamp(), 42);
    assert_eq!(decoded.sample_time_stamp(), TimeStamp::new(10, 5));
    assert_eq!(decoded.data::<Pose>().expect("pose"), pose);
}

#[test]
fn test_wrong_payload_type_is_rejected() {
    let container = Container::new(&Vec2 { x: 1.0, y: 2.0 }).expect("container");
    match container.data::<Pose>() {
        Err(SerError::PayloadTypeMismatch { expected, found }) => {
            assert_eq!(expected, Pose::ID);
            assert_eq!(found, Vec2::ID);
        }
        other => panic!("expected PayloadTypeMismatch, got {:?}", other),
    }
}

#[test]
fn test_newer_producer_older_consumer() {
    let v2 = StatusV2 {
        id: 7,
        note: Some("calibrated".to_string()),
    };
    let bytes = Serializer::serialize(&v2).expect("encode");
    let de = Deserializer::new(&bytes).expect("index");
    assert_eq!(de.len(), 2);

    let v1: StatusV1 = cadence::serialization::Deserializable::deserialize(&de).expect("v1");
    assert_eq!(v1, StatusV1 { id: 7 });
}

#[test]
fn test_older_producer_newer_consumer() {
    let bytes = Serializer::serialize(&StatusV1 { id: 9 }).expect("encode");
    let factory = SerializationFactory::default();
    let v2: StatusV2 = factory
        .decode(factory.format() as u8, &bytes)
        .expect("v2");
    assert_eq!(v2, StatusV2 { id: 9, note: None });
}

#[test]
fn test_missing_required_field() {
    // Only "x" present.
    let mut ser = Serializer::new();
    ser.write(FieldTag::of("x"), 1.0f64.into());
    let bytes = ser.into_bytes().expect("encode");
    let de = Deserializer::new(&bytes).expect("index");
    match <Vec2 as cadence::serialization::Deserializable>::deserialize(&de) {
        Err(SerError::MissingField { tag }) => assert_eq!(tag, FieldTag::of("y").value()),
        other => panic!("expected MissingField, got {:?}", other),
    }
}

#[test]
fn test_kind_mismatch_is_reported() {
    let mut ser = Serializer::new();
    ser.write(FieldTag::of("x"), "not a number".into());
    ser.write(FieldTag::of("y"), 2.0f64.into());
    let bytes = ser.into_bytes().expect("encode");
    let de = Deserializer::new(&bytes).expect("index");
    match <Vec2 as cadence::serialization::Deserializable>::deserialize(&de) {
        Err(SerError::TypeMismatch {
            expected, found, ..
        }) => {
            assert_eq!(expected, WireKind::F64);
            assert_eq!(found, WireKind::String);
        }
        other => panic!("expected TypeMismatch, got {:?}", other),
    }
}

#[test]
fn test_truncated_container_fails() {
    let bytes = Container::new(&sample_pose())
        .expect("container")
        .encode()
        .expect("encode");
    for cut in [0, 1, 10, bytes.len() / 2, bytes.len() - 1] {
        assert!(
            Container::decode(&bytes[..cut]).is_err(),
            "decode succeeded on {} of {} bytes",
            cut,
            bytes.len()
        );
    }
}

#[test]
fn test_bad_magic() {
    let mut bytes = Container::new(&Vec2::default())
        .expect("container")
        .encode()
        .expect("encode");
    bytes[0] ^= 0xFF;
    assert!(matches!(
        Container::decode(&bytes),
        Err(SerError::BadMagic { .. })
    ));
}

#[test]
fn test_stream_of_containers() {
    let mut stream = Vec::new();
    for i in 0..3 {
        Container::new(&Vec2 {
            x: f64::from(i),
            y: 0.0,
        })
        .expect("container")
        .write_to(&mut stream)
        .expect("write");
    }

    let mut reader = std::io::Cursor::new(stream);
    let mut xs = Vec::new();
    while let Some(container) = Container::read_from(&mut reader).expect("read") {
        xs.push(container.data::<Vec2>().expect("vec2").x);
    }
    assert_eq!(xs, vec![0.0, 1.0, 2.0]);
}

#[test]
fn test_random_values_roundtrip() {
    let mut rng = fastrand::Rng::with_seed(0x5EED);
    for _ in 0..200 {
        let mut pose = sample_pose();
        pose.label = (0..rng.usize(0..32)).map(|_| rng.alphanumeric()).collect();
        pose.valid = rng.bool();
        pose.quality = rng.u8(..);
        pose.offset = rng.i8(..);
        pose.sequence = rng.u16(..);
        pose.delta = rng.i16(..);
        pose.frame = rng.u32(..);
        pose.level = rng.i32(..);
        pose.stamp_ns = rng.u64(..);
        pose.drift = rng.i64(..);
        pose.heading = rng.f32();
        pose.grade = rng.char(..);
        pose.blob = (0..rng.usize(0..64)).map(|_| rng.u8(..)).collect();
        pose.position = Vec2 {
            x: rng.f64() * 1e6,
            y: -rng.f64(),
        };
        pose.waypoints = (0..rng.usize(0..5))
            .map(|_| Vec2 {
                x: rng.f64(),
                y: rng.f64(),
            })
            .collect();
        pose.taken = TimeStamp::from_micros(rng.i64(0..i64::from(i32::MAX) * 1_000_000));

        let bytes = Serializer::serialize(&pose).expect("encode");
        assert_eq!(Pose::from_bytes(&bytes).expect("decode"), pose);
    }
}

#[test]
fn test_empty_repeated_field_decodes_empty() {
    let mut pose = sample_pose();
    pose.waypoints.clear();
    let bytes = Serializer::serialize(&pose).expect("encode");
    let decoded = Pose::from_bytes(&bytes).expect("decode");
    assert!(decoded.waypoints.is_empty());
}
