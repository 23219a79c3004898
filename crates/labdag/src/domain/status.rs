//! Product status and its text/integer encodings.

use crate::error::{Error, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Progress state of a product.
///
/// The discriminants are the stable integer encoding used on disk and for
/// display ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    /// Not started
    #[default]
    ToDo = 0,

    /// Being worked on
    InProgress = 1,

    /// Completed
    Done = 2,
}

impl Status {
    /// Every status, in encoding order.
    pub const ALL: [Status; 3] = [Status::ToDo, Status::InProgress, Status::Done];

    /// Integer encoding (0, 1, 2).
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decode the integer encoding.
    #[must_use]
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::ToDo),
            1 => Some(Self::InProgress),
            2 => Some(Self::Done),
            _ => None,
        }
    }

    /// The snake_case token (`to_do`, `in_progress`, `done`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "to_do",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Parse user text into a status.
    ///
    /// Accepts, case-insensitively: the integer code (`0`, `1`, `2`), the
    /// snake_case token (`in_progress`), the space-separated human token
    /// (`in progress`), the hyphenated form (`in-progress`) and the compact
    /// `todo`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStatus`] for anything else.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if let Some(status) = trimmed.parse::<u64>().ok().and_then(Self::from_code) {
            return Ok(status);
        }

        let normalized = trimmed
            .to_ascii_lowercase()
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");

        match normalized.as_str() {
            "to_do" | "todo" => Ok(Self::ToDo),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(Error::InvalidStatus(input.to_string())),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToDo => write!(f, "to do"),
            Self::InProgress => write!(f, "in progress"),
            Self::Done => write!(f, "done"),
        }
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct StatusVisitor;

        impl Visitor<'_> for StatusVisitor {
            type Value = Status;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a status code 0-2 or a status name")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Status, E> {
                Status::from_code(v)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Status, E> {
                u64::try_from(v)
                    .ok()
                    .and_then(Status::from_code)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Status, E> {
                Status::parse(v).map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(StatusVisitor)
    }
}
