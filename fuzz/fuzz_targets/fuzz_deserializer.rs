// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use cadence::serialization::Deserializer;
use cadence::TimeStamp;
use cadence::serialization::Payload;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Index the record stream
    if let Ok(de) = Deserializer::new(data) {
        let _ = de.raw_fields();
    }

    // Typed decode must fail cleanly, never panic
    let _ = TimeStamp::from_bytes(data);
});
