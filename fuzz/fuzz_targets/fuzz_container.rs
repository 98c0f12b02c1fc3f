// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use cadence::{Container, TypeRegistry, TimeStamp};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let registry = TypeRegistry::new();
    let _ = registry.register::<TimeStamp>();

    // Walk a recording-style stream until the first error
    let mut reader = data;
    while let Ok(Some(container)) = Container::read_from(&mut reader) {
        let _ = registry.resolve(&container);
    }
});
