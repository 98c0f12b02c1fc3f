// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::semicolon_if_nothing_returned)] // Benchmark code formatting

use cadence::reflection::{FieldInfo, FieldRef, MessageCollector, Visitable, Visitor};
use cadence::serialization::{Deserializable, Deserializer, Payload, SerError, Serializer};
use cadence::{Container, TimeStamp, TypeRegistry};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

#[derive(Debug, Clone, PartialEq)]
struct Sample {
    name: String,
    sequence: u64,
    readings: Vec<TimeStamp>,
    level: f64,
    raw: Vec<u8>,
}

impl Sample {
    const NAME: FieldInfo = FieldInfo::new("name");
    const SEQUENCE: FieldInfo = FieldInfo::new("sequence");
    const READINGS: FieldInfo = FieldInfo::new("readings");
    const LEVEL: FieldInfo = FieldInfo::new("level");
    const RAW: FieldInfo = FieldInfo::new("raw");

    fn new() -> Self {
        Self {
            name: "bench.sample".to_string(),
            sequence: 123_456_789,
            readings: (0..8).map(|i| TimeStamp::new(1_700_000_000 + i, i * 10)).collect(),
            level: 0.75,
            raw: vec![0xAB; 256],
        }
    }
}

impl Visitable for Sample {
    fn long_name(&self) -> &'static str {
        Self::LONG_NAME
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit(&Self::NAME, (&self.name).into());
        visitor.visit(&Self::SEQUENCE, self.sequence.into());
        for reading in &self.readings {
            visitor.visit(&Self::READINGS, FieldRef::nested(reading));
        }
        visitor.visit(&Self::LEVEL, self.level.into());
        visitor.visit(&Self::RAW, self.raw.as_slice().into());
    }
}

impl Deserializable for Sample {
    fn deserialize(de: &Deserializer<'_>) -> Result<Self, SerError> {
        Ok(Self {
            name: de.read_field(&Self::NAME)?,
            sequence: de.read_field(&Self::SEQUENCE)?,
            readings: de.read_repeated_nested(Self::READINGS.tag)?,
            level: de.read_field(&Self::LEVEL)?,
            raw: de.read_field(&Self::RAW)?,
        })
    }
}

impl Payload for Sample {
    const ID: u32 = 9001;
    const LONG_NAME: &'static str = "bench.Sample";
    const FIELDS: &'static [FieldInfo] = &[
        Self::NAME,
        Self::SEQUENCE,
        Self::READINGS,
        Self::LEVEL,
        Self::RAW,
    ];
}

fn bench_payload(c: &mut Criterion) {
    let sample = Sample::new();
    let bytes = Serializer::serialize(&sample).unwrap();

    c.bench_function("payload_encode", |b| {
        b.iter(|| Serializer::serialize(black_box(&sample)).unwrap())
    });
    c.bench_function("payload_index", |b| {
        b.iter(|| Deserializer::new(black_box(&bytes)).unwrap().len())
    });
    c.bench_function("payload_decode", |b| {
        b.iter(|| Sample::from_bytes(black_box(&bytes)).unwrap())
    });
}

fn bench_container(c: &mut Criterion) {
    let container = Container::new(&Sample::new()).unwrap();
    let encoded = container.encode().unwrap();

    c.bench_function("container_encode", |b| {
        b.iter(|| black_box(&container).encode().unwrap())
    });
    c.bench_function("container_decode", |b| {
        b.iter(|| Container::decode(black_box(&encoded)).unwrap())
    });
}

fn bench_resolve(c: &mut Criterion) {
    let registry = TypeRegistry::new();
    registry.register::<Sample>().unwrap();
    let container = Container::new(&Sample::new()).unwrap();

    c.bench_function("registry_resolve", |b| {
        b.iter(|| registry.resolve(black_box(&container)))
    });
    c.bench_function("collect_message", |b| {
        let sample = Sample::new();
        b.iter(|| MessageCollector::collect(black_box(&sample)))
    });
}

criterion_group!(benches, bench_payload, bench_container, bench_resolve);
criterion_main!(benches);
