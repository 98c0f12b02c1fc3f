// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Payload types shared by the integration tests.

#![allow(dead_code)]

use cadence::reflection::{FieldInfo, FieldRef, Visitable, Visitor};
use cadence::serialization::{Deserializable, Deserializer, Payload, SerError};
use cadence::TimeStamp;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    const X: FieldInfo = FieldInfo::new("x");
    const Y: FieldInfo = FieldInfo::new("y");
}

impl Visitable for Vec2 {
    fn long_name(&self) -> &'static str {
        Self::LONG_NAME
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit(&Self::X, self.x.into());
        visitor.visit(&Self::Y, self.y.into());
    }
}

impl Deserializable for Vec2 {
    fn deserialize(de: &Deserializer<'_>) -> Result<Self, SerError> {
        Ok(Self {
            x: de.read_field(&Self::X)?,
            y: de.read_field(&Self::Y)?,
        })
    }
}

impl Payload for Vec2 {
    const ID: u32 = 1001;
    const LONG_NAME: &'static str = "test.geometry.Vec2";
    const FIELDS: &'static [FieldInfo] = &[Self::X, Self::Y];
}

/// Pose with every wire kind represented.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pose {
    pub label: String,
    pub valid: bool,
    pub quality: u8,
    pub offset: i8,
    pub sequence: u16,
    pub delta: i16,
    pub frame: u32,
    pub level: i32,
    pub stamp_ns: u64,
    pub drift: i64,
    pub heading: f32,
    pub grade: char,
    pub blob: Vec<u8>,
    pub position: Vec2,
    pub waypoints: Vec<Vec2>,
    pub taken: TimeStamp,
}

impl Pose {
    const LABEL: FieldInfo = FieldInfo::new("label");
    const VALID: FieldInfo = FieldInfo::new("valid");
    const QUALITY: FieldInfo = FieldInfo::new("quality");
    const OFFSET: FieldInfo = FieldInfo::new("offset");
    const SEQUENCE: FieldInfo = FieldInfo::new("sequence");
    const DELTA: FieldInfo = FieldInfo::new("delta");
    const FRAME: FieldInfo = FieldInfo::new("frame");
    const LEVEL: FieldInfo = FieldInfo::new("level");
    const STAMP_NS: FieldInfo = FieldInfo::new("stamp_ns");
    const DRIFT: FieldInfo = FieldInfo::new("drift");
    const HEADING: FieldInfo = FieldInfo::new("heading");
    const GRADE: FieldInfo = FieldInfo::new("grade");
    const BLOB: FieldInfo = FieldInfo::new("blob");
    const POSITION: FieldInfo = FieldInfo::new("position");
    const WAYPOINTS: FieldInfo = FieldInfo::new("waypoints");
    const TAKEN: FieldInfo = FieldInfo::new("taken");
}

impl Visitable for Pose {
    fn long_name(&self) -> &'static str {
        Self::LONG_NAME
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit(&Self::LABEL, (&self.label).into());
        visitor.visit(&Self::VALID, self.valid.into());
        visitor.visit(&Self::QUALITY, self.quality.into());
        visitor.visit(&Self::OFFSET, self.offset.into());
        visitor.visit(&Self::SEQUENCE, self.sequence.into());
        visitor.visit(&Self::DELTA, self.delta.into());
        visitor.visit(&Self::FRAME, self.frame.into());
        visitor.visit(&Self::LEVEL, self.level.into());
        visitor.visit(&Self::STAMP_NS, self.stamp_ns.into());
        visitor.visit(&Self::DRIFT, self.drift.into());
        visitor.visit(&Self::HEADING, self.heading.into());
        visitor.visit(&Self::GRADE, self.grade.into());
        visitor.visit(&Self::BLOB, self.blob.as_slice().into());
        visitor.visit(&Self::POSITION, FieldRef::nested(&self.position));
        for waypoint in &self.waypoints {
            visitor.visit(&Self::WAYPOINTS, FieldRef::nested(waypoint));
        }
        visitor.visit(&Self::TAKEN, FieldRef::nested(&self.taken));
    }
}

impl Deserializable for Pose {
    fn deserialize(de: &Deserializer<'_>) -> Result<Self, SerError> {
        Ok(Self {
            label: de.read_field(&Self::LABEL)?,
            valid: de.read_field(&Self::VALID)?,
            quality: de.read_field(&Self::QUALITY)?,
            offset: de.read_field(&Self::OFFSET)?,
            sequence: de.read_field(&Self::SEQUENCE)?,
            delta: de.read_field(&Self::DELTA)?,
            frame: de.read_field(&Self::FRAME)?,
            level: de.read_field(&Self::LEVEL)?,
            stamp_ns: de.read_field(&Self::STAMP_NS)?,
            drift: de.read_field(&Self::DRIFT)?,
            heading: de.read_field(&Self::HEADING)?,
            grade: de.read_field(&Self::GRADE)?,
            blob: de.read_field(&Self::BLOB)?,
            position: de.read_nested(Self::POSITION.tag)?,
            waypoints: de.read_repeated_nested(Self::WAYPOINTS.tag)?,
            taken: de.read_nested(Self::TAKEN.tag)?,
        })
    }
}

impl Payload for Pose {
    const ID: u32 = 1002;
    const LONG_NAME: &'static str = "test.geometry.Pose";
    const FIELDS: &'static [FieldInfo] = &[
        Self::LABEL,
        Self::VALID,
        Self::QUALITY,
        Self::OFFSET,
        Self::SEQUENCE,
        Self::DELTA,
        Self::FRAME,
        Self::LEVEL,
        Self::STAMP_NS,
        Self::DRIFT,
        Self::HEADING,
        Self::GRADE,
        Self::BLOB,
        Self::POSITION,
        Self::WAYPOINTS,
        Self::TAKEN,
    ];
}

/// Older revision of a message: only `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusV1 {
    pub id: u32,
}

/// Newer revision: adds `note` (optional for old producers).
#[derive(Debug, Clone, PartialEq)]
pub struct StatusV2 {
    pub id: u32,
    pub note: Option<String>,
}

const STATUS_ID: FieldInfo = FieldInfo::new("id");
const STATUS_NOTE: FieldInfo = FieldInfo::new("note");

impl Visitable for StatusV1 {
    fn long_name(&self) -> &'static str {
        "test.Status"
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit(&STATUS_ID, self.id.into());
    }
}

impl Deserializable for StatusV1 {
    fn deserialize(de: &Deserializer<'_>) -> Result<Self, SerError> {
        Ok(Self {
            id: de.read_field(&STATUS_ID)?,
        })
    }
}

impl Visitable for StatusV2 {
    fn long_name(&self) -> &'static str {
        "test.Status"
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit(&STATUS_ID, self.id.into());
        if let Some(note) = &self.note {
            visitor.visit(&STATUS_NOTE, note.into());
        }
    }
}

impl Deserializable for StatusV2 {
    fn deserialize(de: &Deserializer<'_>) -> Result<Self, SerError> {
        Ok(Self {
            id: de.read_field(&STATUS_ID)?,
            note: de.read_optional(STATUS_NOTE.tag)?,
        })
    }
}

pub fn sample_pose() -> Pose {
    Pose {
        label: "rover-ü".to_string(),
        valid: true,
        quality: 200,
        offset: -3,
        sequence: 65_000,
        delta: -1234,
        frame: 0xDEAD_BEEF,
        level: -70_000,
        stamp_ns: u64::MAX - 1,
        drift: i64::MIN + 5,
        heading: 1.25,
        grade: 'Ω',
        blob: vec![0, 1, 2, 255],
        position: Vec2 { x: 1.5, y: -2.25 },
        waypoints: vec![Vec2 { x: 0.0, y: 0.0 }, Vec2 { x: 10.0, y: 5.0 }],
        taken: TimeStamp::new(1_700_000_000, 250_000),
    }
}
