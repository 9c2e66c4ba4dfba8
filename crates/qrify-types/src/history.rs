//! History record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which action produced a history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryAction {
    /// A QR code was generated from a URL.
    Generate,
    /// A QR code was decoded from an uploaded image.
    Decode,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Generate => "Generate",
            HistoryAction::Decode => "Decode",
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown history action: {0}")]
pub struct ParseActionError(pub String);

impl FromStr for HistoryAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Generate" => Ok(HistoryAction::Generate),
            "Decode" => Ok(HistoryAction::Decode),
            other => Err(ParseActionError(other.to_string())),
        }
    }
}

/// A record to append to the history store.
///
/// The store assigns `id` and `created_at` on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryRecord {
    pub session_id: String,
    pub action: HistoryAction,
    pub input_text: String,
    pub output_text: String,
    pub color: Option<String>,
    pub size: Option<u32>,
}

impl NewHistoryRecord {
    /// Record for a generated QR code. Generation has no textual output.
    pub fn generate(session_id: impl Into<String>, url: impl Into<String>, color: String, size: u32) -> Self {
        Self {
            session_id: session_id.into(),
            action: HistoryAction::Generate,
            input_text: url.into(),
            output_text: String::new(),
            color: Some(color),
            size: Some(size),
        }
    }

    /// Record for a decoded upload.
    pub fn decode(
        session_id: impl Into<String>,
        file_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            action: HistoryAction::Decode,
            input_text: file_name.into(),
            output_text: text.into(),
            color: None,
            size: None,
        }
    }
}

/// A persisted history record. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Store-assigned, monotonically increasing.
    pub id: i64,
    /// Opaque session token the record belongs to.
    pub session_id: String,
    pub action: HistoryAction,
    /// URL for `Generate`, uploaded file name for `Decode`.
    pub input_text: String,
    /// Empty for `Generate`, decoded text for `Decode`.
    pub output_text: String,
    pub color: Option<String>,
    pub size: Option<u32>,
    pub created_at: DateTime<Utc>,
}

/// History record as returned by `GET /api/history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub action: HistoryAction,
    pub input_text: String,
    pub output_text: String,
    pub color: Option<String>,
    pub size: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl From<HistoryRecord> for HistoryEntry {
    fn from(r: HistoryRecord) -> Self {
        Self {
            action: r.action,
            input_text: r.input_text,
            output_text: r.output_text,
            color: r.color,
            size: r.size,
            created_at: r.created_at,
        }
    }
}
