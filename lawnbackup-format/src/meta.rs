//! The archive's self-describing metadata record.

use chrono::Local;
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::Contents;

/// Current version of the metadata encoding. Written as the first element
/// of the serialized form.
pub const META_VERSION: u64 = 1;

/// Fixed creation-time pattern (`dd-MM-yyyy hh:mm:ss`, 12-hour clock).
pub(crate) const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %I:%M:%S";

const VERSION_INDEX: usize = 0;
const NAME_INDEX: usize = 1;
const CONTENTS_INDEX: usize = 2;
const TIMESTAMP_INDEX: usize = 3;

/// The reserved first entry of an archive: its display label, the content
/// categories selected when it was authored, and its creation time.
///
/// Serialized as a compact positional array, `[version, name, contents,
/// timestamp]`, so the wire form carries no key names to stay coupled to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Meta {
    name: String,
    contents: Contents,
    timestamp: String,
}

impl Meta {
    pub fn new(name: String, contents: Contents, timestamp: String) -> Meta {
        Meta {
            name,
            contents,
            timestamp,
        }
    }

    /// Record for an archive authored right now.
    pub fn now(name: &str, contents: Contents) -> Meta {
        Meta {
            name: name.to_string(),
            contents,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Display label chosen by the user at backup time. Free-form; never
    /// used for lookup.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Categories that were selected when the archive was authored.
    pub fn contents(&self) -> Contents {
        self.contents
    }

    /// Creation time in the fixed [`TIMESTAMP_FORMAT`] pattern.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Encode as the positional array form.
    pub fn to_json(&self) -> String {
        json!([META_VERSION, self.name, self.contents.bits(), self.timestamp]).to_string()
    }

    /// Decode a record, reading the version element first and dispatching
    /// to the decoder for that version. Unknown versions are refused
    /// rather than read positionally.
    pub fn from_json(text: &str) -> Result<Meta> {
        let value: Value = serde_json::from_str(text)?;
        let fields = value.as_array().ok_or(Error::MetaNotArray)?;
        let version = fields
            .get(VERSION_INDEX)
            .and_then(Value::as_u64)
            .ok_or(Error::MetaField {
                index: VERSION_INDEX,
            })?;

        match version {
            1 => Meta::from_v1(fields),
            other => Err(Error::UnsupportedMetaVersion(other)),
        }
    }

    fn from_v1(fields: &[Value]) -> Result<Meta> {
        let name = fields
            .get(NAME_INDEX)
            .and_then(Value::as_str)
            .ok_or(Error::MetaField { index: NAME_INDEX })?;
        let contents = fields
            .get(CONTENTS_INDEX)
            .and_then(Value::as_u64)
            .ok_or(Error::MetaField {
                index: CONTENTS_INDEX,
            })?;
        let timestamp = fields
            .get(TIMESTAMP_INDEX)
            .and_then(Value::as_str)
            .ok_or(Error::MetaField {
                index: TIMESTAMP_INDEX,
            })?;

        Ok(Meta {
            name: name.to_string(),
            contents: Contents::from_bits(contents as u32),
            timestamp: timestamp.to_string(),
        })
    }
}
