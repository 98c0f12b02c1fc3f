// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::ConfigError;

/// Namespace of keys visible to every module.
pub const GLOBAL_NAMESPACE: &str = "global";

/// Parsed `key = value` configuration.
///
/// Keys are stored lowercase; values are trimmed. The first dot-separated
/// segment of a key is its namespace: `global`, a module name, or
/// `module:identifier` for a key that applies to one module instance only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValueConfiguration {
    entries: BTreeMap<String, String>,
}

/// Byte offset of a `#` that starts a comment: at line start or after
/// whitespace. `#` inside a value (`#ff0000`, `host/#frag`) is kept.
fn comment_start(line: &str) -> Option<usize> {
    let mut previous: Option<char> = None;
    for (pos, c) in line.char_indices() {
        if c == '#' && previous.map_or(true, char::is_whitespace) {
            return Some(pos);
        }
        previous = Some(c);
    }
    None
}

fn parse_line(line: &str) -> Option<Result<(String, String), ()>> {
    let content = match comment_start(line) {
        Some(pos) => &line[..pos],
        None => line,
    };
    let content = content.trim();
    if content.is_empty() {
        return None;
    }
    let Some((key, value)) = content.split_once('=') else {
        return Some(Err(()));
    };
    let key = key.trim();
    if key.is_empty() {
        return Some(Err(()));
    }
    Some(Ok((key.to_lowercase(), value.trim().to_string())))
}

impl KeyValueConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration text, skipping (and logging) malformed lines.
    pub fn parse(text: &str) -> Self {
        let mut config = Self::new();
        for (index, line) in text.lines().enumerate() {
            match parse_line(line) {
                Some(Ok((key, value))) => {
                    config.entries.insert(key, value);
                }
                Some(Err(())) => {
                    log::warn!(
                        "[KeyValueConfiguration::parse] line {}: ignoring '{}'",
                        index + 1,
                        line.trim()
                    );
                }
                None => {}
            }
        }
        config
    }

    /// Parse configuration text, failing on the first malformed line.
    pub fn try_parse(text: &str) -> Result<Self, ConfigError> {
        let mut config = Self::new();
        for (index, line) in text.lines().enumerate() {
            match parse_line(line) {
                Some(Ok((key, value))) => {
                    config.entries.insert(key, value);
                }
                Some(Err(())) => {
                    return Err(ConfigError::MalformedLine {
                        line: index + 1,
                        text: line.trim().to_string(),
                    })
                }
                None => {}
            }
        }
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!(
            "[KeyValueConfiguration::from_file] loaded {}",
            path.as_ref().display()
        );
        Ok(Self::parse(&text))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Value for `key`, or `T::default()` when absent or unparsable.
    pub fn get_value<T: FromStr + Default>(&self, key: &str) -> T {
        self.get_value_or(key, T::default())
    }

    pub fn get_value_or<T: FromStr>(&self, key: &str, default: T) -> T {
        match self.get(key) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!(
                    "[KeyValueConfiguration::get_value] '{}' = '{}' does not parse, using default",
                    key,
                    raw
                );
                default
            }),
            None => default,
        }
    }

    /// Value for `key`; absence and parse failures are errors.
    pub fn require<T: FromStr>(&self, key: &str) -> Result<T, ConfigError> {
        let raw = self
            .get(key)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_lowercase()))?;
        raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_lowercase(),
            value: raw.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.entries
            .insert(key.trim().to_lowercase(), value.into().trim().to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries whose namespace is exactly `prefix`.
    pub fn sub_configuration(&self, prefix: &str) -> Self {
        let prefix = format!("{}.", prefix.to_lowercase());
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| k.starts_with(&prefix))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Snapshot seen by module `name` running as instance `identifier`.
    ///
    /// Keeps global keys (no namespace, or `global.*`) and `name.*`. Keys
    /// scoped to `name:identifier.*` are rewritten to `name.*` and override
    /// the unscoped value; keys scoped to other instances are dropped.
    pub fn for_module(&self, name: &str, identifier: Option<u32>) -> Self {
        let name = name.to_lowercase();
        let scoped = identifier.map(|id| format!("{}:{}", name, id));
        let mut entries = BTreeMap::new();
        let mut overrides = Vec::new();

        for (key, value) in &self.entries {
            let Some((namespace, rest)) = key.split_once('.') else {
                entries.insert(key.clone(), value.clone());
                continue;
            };
            if namespace == GLOBAL_NAMESPACE || namespace == name {
                entries.insert(key.clone(), value.clone());
            } else if scoped.as_deref() == Some(namespace) {
                overrides.push((format!("{}.{}", name, rest), value.clone()));
            }
        }
        entries.extend(overrides);
        Self { entries }
    }
}

impl fmt::Display for KeyValueConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            writeln!(f, "{} = {}", key, value)?;
        }
        Ok(())
    }
}

impl FromStr for KeyValueConfiguration {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s)
    }
}
