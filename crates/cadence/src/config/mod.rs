// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Key/value configuration.
//!
//! ```text
//! # comment
//! global.logfile = run.log
//! counter.limit = 10            # every "counter" module
//! counter:241280.limit = 20     # only the instance with --id=241280
//! counter.color = #ff0000        # '#' starts a comment only at line start or after whitespace
//! ```

mod key_value;

pub use key_value::{KeyValueConfiguration, GLOBAL_NAMESPACE};

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no value for key '{0}'")]
    KeyNotFound(String),

    #[error("value '{value}' for key '{key}' is not a valid {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("line {line}: expected 'key = value', got '{text}'")]
    MalformedLine { line: usize, text: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
