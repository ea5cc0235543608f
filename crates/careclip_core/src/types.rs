use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Seconds
// ---------------------------------------------------------------------------

/// All model times are float seconds, the unit of the persisted interchange.
pub type Seconds = f64;

// Tolerance when checking persisted boundaries for consistency.
pub(crate) const BOUNDARY_EPS: Seconds = 1e-6;

// ---------------------------------------------------------------------------
// EditMode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Idle,
    Trimming,
    Chapters,
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditMode::Idle => write!(f, "idle"),
            EditMode::Trimming => write!(f, "trimming"),
            EditMode::Chapters => write!(f, "chapters"),
        }
    }
}

// ---------------------------------------------------------------------------
// EditOutcome
// ---------------------------------------------------------------------------

/// How a model mutator handled its input. Mutators are total: bad input is
/// clamped or ignored, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Taken verbatim.
    Applied,
    /// Adjusted to keep the model's invariant.
    Clamped,
    /// Not applicable; nothing changed.
    Rejected,
}

// ---------------------------------------------------------------------------
// TrimHandle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimHandle {
    Start,
    End,
}

// ---------------------------------------------------------------------------
// Chapter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: Uuid,
    pub title: String,
    pub start_time: Seconds,
    pub end_time: Seconds,
}

impl Chapter {
    pub fn new(title: impl Into<String>, start_time: Seconds, end_time: Seconds) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            start_time,
            end_time,
        }
    }

    pub fn duration(&self) -> Seconds {
        self.end_time - self.start_time
    }

    /// Half-open containment: `[start_time, end_time)`.
    pub fn contains(&self, time: Seconds) -> bool {
        time >= self.start_time && time < self.end_time
    }
}

// ---------------------------------------------------------------------------
// format_timestamp
// ---------------------------------------------------------------------------

/// "M:SS" readout used for time displays and chapter rows.
pub fn format_timestamp(time: Seconds) -> String {
    let total = if time.is_finite() && time > 0.0 {
        time.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
