// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::ffi::OsString;

use clap::Parser;

use crate::error::{Error, Result};

/// Standard module command line.
#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct ModuleArgs {
    /// Conference id the module joins
    #[arg(long)]
    cid: u32,

    /// Instance identifier, used as sender stamp
    #[arg(long)]
    id: Option<u32>,

    /// Cycle frequency in Hz
    #[arg(long, default_value_t = 1.0)]
    freq: f32,

    /// Verbosity level
    #[arg(long, default_value_t = 0)]
    verbose: u8,
}

/// Who a module is and how often it runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleIdentity {
    name: String,
    cid: u32,
    identifier: Option<u32>,
    frequency: f32,
    verbosity: u8,
}

impl ModuleIdentity {
    pub fn new(name: impl Into<String>, cid: u32) -> Self {
        Self {
            name: name.into(),
            cid,
            identifier: None,
            frequency: 1.0,
            verbosity: 0,
        }
    }

    /// Parse `--cid`, `--id`, `--freq` and `--verbose` from `argv`.
    ///
    /// `argv[0]` is the program name, as in `std::env::args_os()`.
    pub fn from_args<I, T>(name: &str, argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args =
            ModuleArgs::try_parse_from(argv).map_err(|e| Error::InvalidArguments(e.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            cid: args.cid,
            identifier: args.id,
            frequency: args.freq,
            verbosity: args.verbose,
        })
    }

    #[must_use]
    pub fn with_identifier(mut self, identifier: u32) -> Self {
        self.identifier = Some(identifier);
        self
    }

    #[must_use]
    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cid(&self) -> u32 {
        self.cid
    }

    pub fn identifier(&self) -> Option<u32> {
        self.identifier
    }

    /// Stamp put on containers this module sends.
    pub fn sender_stamp(&self) -> u32 {
        self.identifier.unwrap_or(0)
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }
}
