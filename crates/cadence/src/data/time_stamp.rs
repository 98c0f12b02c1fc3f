// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::fmt;
use std::ops::Add;
use std::time::Duration;

use crate::reflection::{FieldInfo, Visitable, Visitor};
use crate::serialization::{Deserializable, Deserializer, Payload, SerError};

const MICROS_PER_SECOND: i64 = 1_000_000;

const SECONDS: FieldInfo = FieldInfo::new("seconds");
const MICROSECONDS: FieldInfo = FieldInfo::new("microseconds");

/// Wall-clock instant with microsecond resolution.
///
/// Always normalized: `0 <= microseconds < 1_000_000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeStamp {
    seconds: i32,
    microseconds: i32,
}

impl TimeStamp {
    pub fn new(seconds: i32, microseconds: i32) -> Self {
        Self::from_micros(i64::from(seconds) * MICROS_PER_SECOND + i64::from(microseconds))
    }

    pub fn now() -> Self {
        let now = chrono::Utc::now();
        Self::from_micros(now.timestamp_micros())
    }

    /// Saturates at the `i32` seconds range.
    pub fn from_micros(micros: i64) -> Self {
        let seconds = micros.div_euclid(MICROS_PER_SECOND);
        let microseconds = micros.rem_euclid(MICROS_PER_SECOND) as i32;
        let seconds = seconds.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        Self {
            seconds,
            microseconds,
        }
    }

    pub fn to_micros(&self) -> i64 {
        i64::from(self.seconds) * MICROS_PER_SECOND + i64::from(self.microseconds)
    }

    pub fn seconds(&self) -> i32 {
        self.seconds
    }

    pub fn microseconds(&self) -> i32 {
        self.microseconds
    }

    /// Elapsed time from `earlier` to `self`, zero if `earlier` is later.
    pub fn duration_since(&self, earlier: &TimeStamp) -> Duration {
        let delta = self.to_micros() - earlier.to_micros();
        Duration::from_micros(u64::try_from(delta).unwrap_or(0))
    }

    /// `YYYY-MM-DD HH:MM:SS.mmm` in UTC.
    pub fn format_yyyymmdd_hhmmss_ms(&self) -> String {
        match chrono::DateTime::from_timestamp(
            i64::from(self.seconds),
            (self.microseconds as u32) * 1_000,
        ) {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            None => self.to_string(),
        }
    }
}

impl Add<Duration> for TimeStamp {
    type Output = TimeStamp;

    fn add(self, rhs: Duration) -> TimeStamp {
        let micros = i64::try_from(rhs.as_micros()).unwrap_or(i64::MAX);
        TimeStamp::from_micros(self.to_micros().saturating_add(micros))
    }
}

impl fmt::Display for TimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.seconds, self.microseconds)
    }
}

impl Visitable for TimeStamp {
    fn long_name(&self) -> &'static str {
        Self::LONG_NAME
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit(&SECONDS, self.seconds.into());
        visitor.visit(&MICROSECONDS, self.microseconds.into());
    }
}

impl Deserializable for TimeStamp {
    fn deserialize(de: &Deserializer<'_>) -> Result<Self, SerError> {
        Ok(Self::new(
            de.read_field(&SECONDS)?,
            de.read_field(&MICROSECONDS)?,
        ))
    }
}

impl Payload for TimeStamp {
    const ID: u32 = 12;
    const LONG_NAME: &'static str = "cadence.data.TimeStamp";
    const FIELDS: &'static [FieldInfo] = &[SECONDS, MICROSECONDS];
}
