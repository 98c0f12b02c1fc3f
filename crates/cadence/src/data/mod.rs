// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Container envelope and timestamps.

mod container;
mod time_stamp;

pub use container::{Container, CONTAINER_MAGIC, HEADER_SIZE, MAX_PAYLOAD_SIZE};
pub use time_stamp::TimeStamp;
