use crate::types::{EditOutcome, Seconds, BOUNDARY_EPS};
use serde::{Deserialize, Serialize};

/// Minimum distance between the trim handles, in seconds.
pub const MIN_TRIM_SPAN: Seconds = 1.0;

// ---------------------------------------------------------------------------
// TrimRange
// ---------------------------------------------------------------------------

/// The visible window over the source: a `[start, end)` sub-interval that
/// handles are dragged over while editing, then frozen by `commit`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrimRange {
    start: Seconds,
    end: Seconds,
    source_duration: Seconds,
    committed: bool,
}

impl TrimRange {
    /// Full-span working range over a source of `duration` seconds.
    pub fn new(duration: Seconds) -> Self {
        Self {
            start: 0.0,
            end: duration,
            source_duration: duration,
            committed: false,
        }
    }

    /// Rebuild a committed range from persisted bounds. Returns None when
    /// the bounds do not describe a valid window over this source.
    pub fn from_saved(source_duration: Seconds, start: Seconds, end: Seconds) -> Option<Self> {
        let valid = start.is_finite()
            && end.is_finite()
            && start >= 0.0
            && start < end
            && end <= source_duration + BOUNDARY_EPS;
        if !valid {
            return None;
        }
        Some(Self {
            start,
            end: end.min(source_duration),
            source_duration,
            committed: true,
        })
    }

    pub fn start(&self) -> Seconds {
        self.start
    }

    pub fn end(&self) -> Seconds {
        self.end
    }

    pub fn source_duration(&self) -> Seconds {
        self.source_duration
    }

    pub fn span(&self) -> Seconds {
        self.end - self.start
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn is_full_span(&self) -> bool {
        self.start == 0.0 && self.end == self.source_duration
    }

    pub fn contains(&self, time: Seconds) -> bool {
        time >= self.start && time < self.end
    }

    // Sources shorter than the floor are effectively untrimmable.
    fn min_span(&self) -> Seconds {
        MIN_TRIM_SPAN.min(self.source_duration)
    }

    /// Move the start handle, clamped to `[0, end - min_span]`.
    pub fn set_start(&mut self, candidate: Seconds) -> EditOutcome {
        if self.committed || !candidate.is_finite() {
            return EditOutcome::Rejected;
        }
        let clamped = candidate.min(self.end - self.min_span()).max(0.0);
        self.start = clamped;
        if clamped == candidate {
            EditOutcome::Applied
        } else {
            EditOutcome::Clamped
        }
    }

    /// Move the end handle, clamped to `[start + min_span, source_duration]`.
    pub fn set_end(&mut self, candidate: Seconds) -> EditOutcome {
        if self.committed || !candidate.is_finite() {
            return EditOutcome::Rejected;
        }
        let clamped = candidate
            .max(self.start + self.min_span())
            .min(self.source_duration);
        self.end = clamped;
        if clamped == candidate {
            EditOutcome::Applied
        } else {
            EditOutcome::Clamped
        }
    }

    /// Freeze the range. Later setters report `Rejected`.
    pub fn commit(&mut self) {
        self.committed = true;
    }

    /// Make a committed range editable again, keeping its bounds.
    pub fn reopen(&mut self) {
        self.committed = false;
    }

    /// Back to the full source span, uncommitted.
    pub fn reset(&mut self) {
        self.start = 0.0;
        self.end = self.source_duration;
        self.committed = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
