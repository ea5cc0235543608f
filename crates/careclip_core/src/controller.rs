use crate::session::EditSession;
use crate::types::{EditMode, EditOutcome, Seconds, TrimHandle};

// ---------------------------------------------------------------------------
// ClickAction
// ---------------------------------------------------------------------------

/// What a timeline click resolved to, for the embedding player to act on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickAction {
    /// Seek the media source to this absolute time.
    Seek(Seconds),
    /// A trim handle was moved (possibly clamped to keep the range valid).
    TrimAdjusted {
        handle: TrimHandle,
        outcome: EditOutcome,
    },
    /// A chapter boundary was inserted at the playhead, or refused.
    ChapterMark(EditOutcome),
    /// The click carried no meaning (metadata missing or malformed input).
    Ignored,
}

// ---------------------------------------------------------------------------
// Timeline interaction
// ---------------------------------------------------------------------------

impl EditSession {
    /// Interpret a click at normalized position `fraction` along the
    /// timeline. While idle the click is a seek; while trimming it moves
    /// whichever handle is numerically closer (ties go to the end handle);
    /// while editing chapters it marks a boundary at `playhead`, the
    /// current relative playback time, not at the click position.
    pub fn timeline_click(&mut self, fraction: f64, playhead: Seconds) -> ClickAction {
        if !fraction.is_finite() {
            return ClickAction::Ignored;
        }
        let Some(active) = self.active_duration() else {
            return ClickAction::Ignored;
        };
        let t = fraction.clamp(0.0, 1.0) * active;

        match self.mode() {
            EditMode::Idle => {
                let absolute = match self.playback_guard() {
                    Ok(guard) => guard.absolute(t),
                    Err(_) => return ClickAction::Ignored,
                };
                ClickAction::Seek(absolute)
            }
            EditMode::Trimming => {
                let (start, end) = match self.trim() {
                    Some(trim) => (trim.start(), trim.end()),
                    None => return ClickAction::Ignored,
                };
                let handle = if (t - start).abs() < (t - end).abs() {
                    TrimHandle::Start
                } else {
                    TrimHandle::End
                };
                let outcome = match handle {
                    TrimHandle::Start => self.set_trim_start(t),
                    TrimHandle::End => self.set_trim_end(t),
                };
                ClickAction::TrimAdjusted { handle, outcome }
            }
            EditMode::Chapters => ClickAction::ChapterMark(self.add_chapter_at(playhead)),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
