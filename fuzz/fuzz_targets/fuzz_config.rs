// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use cadence::KeyValueConfiguration;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let config = KeyValueConfiguration::parse(text);
        let _ = config.for_module("m", Some(1));
        let _ = KeyValueConfiguration::try_parse(text);
    }
});
