//! Habit identifiers
//!
//! Fresh IDs have the format `h-{7-char-hash}` (e.g., `h-7f2b4c1`), where the
//! hash is derived from the habit name and its creation timestamp.
//!
//! Persisted data may carry IDs minted elsewhere (`h_sabah`, `h_1704067200000`),
//! so parsing accepts any non-empty string and treats it as opaque.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Habit ID must not be empty")]
    Empty,

    #[error("Habit ID must not contain whitespace: '{0}'")]
    Whitespace(String),
}

/// Generates a 7-character hash from name and timestamp
fn generate_hash(name: &str, timestamp: DateTime<Utc>) -> String {
    let input = format!("{}{}", name, timestamp.timestamp_nanos_opt().unwrap_or(0));
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

/// Opaque, immutable habit identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HabitId(String);

impl HabitId {
    /// Mints a new ID from the habit name and creation timestamp
    pub fn generate(name: &str, timestamp: DateTime<Utc>) -> Self {
        Self(format!("h-{}", generate_hash(name, timestamp)))
    }

    /// Wraps a known-valid literal
    pub(crate) fn from_static(s: &'static str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl FromStr for HabitId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        if s.chars().any(char::is_whitespace) {
            return Err(IdError::Whitespace(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for HabitId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HabitId> for String {
    fn from(id: HabitId) -> Self {
        id.0
    }
}

impl Borrow<str> for HabitId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
