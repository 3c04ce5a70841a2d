//! Service timestamps
//!
//! The service writes `datetime` values either naive (`2024-03-01T10:15:30.123456`)
//! or with an offset (`2024-03-01T10:15:30Z`, `...+08:00`). Both parse, and the
//! text is written back exactly as it was read.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A parsed timestamp, with or without a UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeValue {
    Naive(NaiveDateTime),
    Offset(DateTime<FixedOffset>),
}

/// Timestamp as the service sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp {
    raw: String,
    value: TimeValue,
}

impl Timestamp {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> TimeValue {
        self.value
    }

    /// Wall-clock time as written, ignoring any offset.
    pub fn naive_local(&self) -> NaiveDateTime {
        match self.value {
            TimeValue::Naive(dt) => dt,
            TimeValue::Offset(dt) => dt.naive_local(),
        }
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        match self.value {
            TimeValue::Naive(_) => None,
            TimeValue::Offset(dt) => Some(*dt.offset()),
        }
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(dt: NaiveDateTime) -> Self {
        Self {
            raw: dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            value: TimeValue::Naive(dt),
        }
    }
}

impl FromStr for Timestamp {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let value = match DateTime::parse_from_rfc3339(s) {
            Ok(dt) => TimeValue::Offset(dt),
            Err(_) => s
                .parse::<NaiveDateTime>()
                .map(TimeValue::Naive)
                .map_err(|e| format!("invalid timestamp {:?}: {}", s, e))?,
        };
        Ok(Self {
            raw: s.to_string(),
            value,
        })
    }
}

impl TryFrom<String> for Timestamp {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> Self {
        ts.raw
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
