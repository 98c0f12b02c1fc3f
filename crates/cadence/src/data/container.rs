// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Container envelope.
//!
//! # Wire Format
//!
//! ```text
//! +----------------------------------------------------------------+
//! | magic (2) = 0xABCF | format (1) | data_type (4) | sender (4)   |
//! | sent (4+4) | received (4+4) | sample (4+4) | payload_len (4)   |
//! | payload (payload_len)                                          |
//! +----------------------------------------------------------------+
//! ```
//!
//! All integers little-endian; timestamps are `(seconds i32, microseconds i32)`.

use std::fmt;
use std::io::{self, Read, Write};
use std::sync::Arc;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::TimeStamp;
use crate::serialization::{Deserializer, Payload, SerError, SerializationFactory, WireFormat};

/// Envelope magic.
pub const CONTAINER_MAGIC: u16 = 0xABCF;

/// Envelope size without payload.
pub const HEADER_SIZE: usize = 2 + 1 + 4 + 4 + 3 * 8 + 4;

/// Upper bound accepted for `payload_len` when reading.
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;

/// Immutable envelope around one serialized payload.
///
/// Stamping (sender, timestamps) returns a new value; the payload bytes are
/// shared between copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    format: u8,
    data_type: u32,
    sender_stamp: u32,
    sent: TimeStamp,
    received: TimeStamp,
    sample: TimeStamp,
    payload: Arc<[u8]>,
}

impl Container {
    /// Serialize `value` with the default wire format.
    pub fn new<T: Payload>(value: &T) -> Result<Self, SerError> {
        Self::with_factory(&SerializationFactory::default(), value)
    }

    pub fn with_factory<T: Payload>(
        factory: &SerializationFactory,
        value: &T,
    ) -> Result<Self, SerError> {
        let payload = factory.encode(value)?;
        Ok(Self {
            format: factory.format() as u8,
            data_type: T::ID,
            sample: TimeStamp::now(),
            ..Self::from_raw(T::ID, payload)
        })
    }

    /// Envelope around an already encoded payload.
    pub fn from_raw(data_type: u32, payload: impl Into<Arc<[u8]>>) -> Self {
        Self {
            format: WireFormat::TaggedV1 as u8,
            data_type,
            sender_stamp: 0,
            sent: TimeStamp::default(),
            received: TimeStamp::default(),
            sample: TimeStamp::default(),
            payload: payload.into(),
        }
    }

    #[must_use]
    pub fn with_sender_stamp(self, sender_stamp: u32) -> Self {
        Self {
            sender_stamp,
            ..self
        }
    }

    #[must_use]
    pub fn with_sent_time_stamp(self, sent: TimeStamp) -> Self {
        Self { sent, ..self }
    }

    #[must_use]
    pub fn with_received_time_stamp(self, received: TimeStamp) -> Self {
        Self { received, ..self }
    }

    #[must_use]
    pub fn with_sample_time_stamp(self, sample: TimeStamp) -> Self {
        Self { sample, ..self }
    }

    pub fn format(&self) -> u8 {
        self.format
    }

    pub fn data_type(&self) -> u32 {
        self.data_type
    }

    pub fn sender_stamp(&self) -> u32 {
        self.sender_stamp
    }

    pub fn sent_time_stamp(&self) -> TimeStamp {
        self.sent
    }

    pub fn received_time_stamp(&self) -> TimeStamp {
        self.received
    }

    pub fn sample_time_stamp(&self) -> TimeStamp {
        self.sample
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Index the payload's record stream.
    pub fn deserializer(&self) -> Result<Deserializer<'_>, SerError> {
        SerializationFactory::default().deserializer(self.format, &self.payload)
    }

    /// Decode the payload as `T`, rejecting a different data type id.
    pub fn data<T: Payload>(&self) -> Result<T, SerError> {
        if self.data_type != T::ID {
            return Err(SerError::PayloadTypeMismatch {
                expected: T::ID,
                found: self.data_type,
            });
        }
        T::deserialize(&self.deserializer()?)
    }

    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    pub fn encode(&self) -> Result<Vec<u8>, SerError> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Decode one envelope from the front of `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Self, SerError> {
        let mut reader = bytes;
        Self::read_from(&mut reader)?.ok_or(SerError::Truncated {
            offset: 0,
            needed: HEADER_SIZE,
            available: 0,
        })
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), SerError> {
        let payload_len = u32::try_from(self.payload.len()).map_err(|_| {
            SerError::LengthOverflow {
                length: self.payload.len(),
            }
        })?;
        w.write_u16::<LittleEndian>(CONTAINER_MAGIC)?;
        w.write_u8(self.format)?;
        w.write_u32::<LittleEndian>(self.data_type)?;
        w.write_u32::<LittleEndian>(self.sender_stamp)?;
        for ts in [self.sent, self.received, self.sample] {
            w.write_i32::<LittleEndian>(ts.seconds())?;
            w.write_i32::<LittleEndian>(ts.microseconds())?;
        }
        w.write_u32::<LittleEndian>(payload_len)?;
        w.write_all(&self.payload)?;
        Ok(())
    }

    /// Read the next envelope; `Ok(None)` on a clean end of stream.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Option<Self>, SerError> {
        let mut first = [0u8; 1];
        loop {
            match r.read(&mut first) {
                Ok(0) => return Ok(None),
                Ok(_) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        let magic = u16::from_le_bytes([first[0], r.read_u8()?]);
        if magic != CONTAINER_MAGIC {
            return Err(SerError::BadMagic { found: magic });
        }
        let format = r.read_u8()?;
        let data_type = r.read_u32::<LittleEndian>()?;
        let sender_stamp = r.read_u32::<LittleEndian>()?;
        let mut stamps = [TimeStamp::default(); 3];
        for ts in &mut stamps {
            let seconds = r.read_i32::<LittleEndian>()?;
            let microseconds = r.read_i32::<LittleEndian>()?;
            *ts = TimeStamp::new(seconds, microseconds);
        }
        let payload_len = r.read_u32::<LittleEndian>()? as usize;
        if payload_len > MAX_PAYLOAD_SIZE {
            return Err(SerError::LengthOverflow {
                length: payload_len,
            });
        }
        let mut payload = vec![0u8; payload_len];
        r.read_exact(&mut payload)?;

        let [sent, received, sample] = stamps;
        Ok(Some(Self {
            format,
            data_type,
            sender_stamp,
            sent,
            received,
            sample,
            payload: payload.into(),
        }))
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Container(type={}, sender={}, sent={}, {} bytes)",
            self.data_type,
            self.sender_stamp,
            self.sent,
            self.payload.len()
        )
    }
}
