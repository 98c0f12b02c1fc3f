// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Crate-level error type.
//!
//! Each concern keeps its own error enum ([`SerError`], [`ConfigError`]);
//! [`Error`] wraps them for callers that mix several concerns.

use crate::config::ConfigError;
use crate::serialization::SerError;
use thiserror::Error;

/// Result alias used across the public API.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the cadence public API.
#[derive(Debug, Error)]
pub enum Error {
    /// Wire encoding/decoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] SerError),

    /// Configuration lookup or parsing failed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Module argument list could not be parsed.
    #[error("invalid module arguments: {0}")]
    InvalidArguments(String),

    /// A type id is already registered under a different name.
    #[error("type id {id} already registered as '{existing}', refusing '{requested}'")]
    DuplicateTypeId {
        id: u32,
        existing: &'static str,
        requested: &'static str,
    },

    /// I/O error with underlying cause.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
