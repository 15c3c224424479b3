//! Program grouping keys.
//!
//! Every routine created from one generated program carries the same key,
//! `ai|<sanitized name>|<unix millis>`, so the routines can be listed and
//! deleted together.

use chrono::{DateTime, TimeZone, Utc};
use std::fmt;

const PREFIX: &str = "ai";
const DELIMITER: char = '|';
/// Stand-in for delimiter characters found in program names
const DELIMITER_SUBSTITUTE: char = '¦';

/// Opaque identifier shared by all routines of one generated program
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProgramGroupingKey(String);

impl ProgramGroupingKey {
    /// Compose a key for a program created at `created_at`
    pub fn new(program_name: &str, created_at: DateTime<Utc>) -> Self {
        Self(format!(
            "{prefix}{d}{name}{d}{ts}",
            prefix = PREFIX,
            d = DELIMITER,
            name = sanitize_name(program_name),
            ts = created_at.timestamp_millis()
        ))
    }

    /// Parse a stored key; returns None for strings not produced by [`ProgramGroupingKey::new`]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.splitn(3, DELIMITER);
        let prefix = parts.next()?;
        parts.next()?;
        let ts = parts.next()?;
        if prefix != PREFIX || ts.parse::<i64>().is_err() {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Program name segment (sanitized)
    pub fn program_name(&self) -> &str {
        self.0.split(DELIMITER).nth(1).unwrap_or_default()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let millis = self.0.rsplit(DELIMITER).next()?.parse::<i64>().ok()?;
        Utc.timestamp_millis_opt(millis).single()
    }
}

impl fmt::Display for ProgramGroupingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Replace delimiter characters so the name cannot split the key
pub fn sanitize_name(name: &str) -> String {
    name.replace(DELIMITER, &DELIMITER_SUBSTITUTE.to_string())
}
