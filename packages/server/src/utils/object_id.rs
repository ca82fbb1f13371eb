use std::fmt;

use bson::oid;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Length of the textual form: 12 bytes as lowercase hex.
pub const OBJECT_ID_LEN: usize = 24;

/// Opaque 12-byte identifier shared by every entity.
///
/// Generation and parsing are BSON object ids. On the wire and in the
/// database the id is always the bare 24-character hex string, never the
/// extended-JSON `{"$oid": ..}` form.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(oid::ObjectId);

impl ObjectId {
    pub fn new() -> Self {
        Self(oid::ObjectId::new())
    }

    /// Parse the 24-character hex form. Upper-case input is accepted and
    /// normalized.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != OBJECT_ID_LEN {
            return None;
        }
        oid::ObjectId::parse_str(s).ok().map(Self)
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| serde::de::Error::custom("invalid object id"))
    }
}

/// Validate a raw path segment, failing with `Invalid {what} id`.
///
/// Every handler calls this before touching the database.
pub fn parse_id(raw: &str, what: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse(raw.trim()).ok_or_else(|| AppError::Validation(format!("Invalid {what} id")))
}
