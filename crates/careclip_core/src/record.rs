use crate::error::Result;
use crate::types::{Chapter, Seconds};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TrimData
// ---------------------------------------------------------------------------

/// Committed trim bounds as stored by the metadata service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrimData {
    pub trim_start: Seconds,
    pub trim_end: Seconds,
    pub trimmed_duration: Seconds,
}

// ---------------------------------------------------------------------------
// EditRecord
// ---------------------------------------------------------------------------

/// The persisted editing payload for one video. Field names follow the
/// metadata service's document schema, so the JSON is exchanged verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trim_data: Option<TrimData>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    pub final_duration: Seconds,
    #[serde(default)]
    pub original_duration: Seconds,
    #[serde(default)]
    pub was_trimmed: bool,
}

impl EditRecord {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
