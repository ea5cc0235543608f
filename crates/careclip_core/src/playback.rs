use crate::types::Seconds;

/// Display seeks stop this far before the window's end so the playback
/// device does not immediately trip the end-of-window rule.
pub const SEEK_END_MARGIN: Seconds = 0.1;

// ---------------------------------------------------------------------------
// PlaybackDirective
// ---------------------------------------------------------------------------

/// What the playback device should do after a position check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackDirective {
    Continue,
    /// Seek to the carried native position.
    Snap(Seconds),
    /// Seek to the carried native position, then pause. Reaching the end of
    /// the window loops back to its start rather than holding the last frame.
    SnapAndPause(Seconds),
}

// ---------------------------------------------------------------------------
// PlaybackCursor
// ---------------------------------------------------------------------------

/// A playback position in both time domains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackCursor {
    /// Native media position.
    pub absolute: Seconds,
    /// Position relative to the committed window's start; what every UI
    /// readout and chapter lookup consumes.
    pub relative: Seconds,
}

// ---------------------------------------------------------------------------
// PlaybackGuard
// ---------------------------------------------------------------------------

/// Enforces the committed trim window during playback and remaps between
/// native and display time. Without a committed window it passes positions
/// through untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackGuard {
    source_duration: Seconds,
    window: Option<(Seconds, Seconds)>,
}

impl PlaybackGuard {
    /// Guard over an untrimmed source.
    pub fn unrestricted(source_duration: Seconds) -> Self {
        Self {
            source_duration,
            window: None,
        }
    }

    /// Guard enforcing a committed `[start, end)` window.
    pub fn with_window(source_duration: Seconds, start: Seconds, end: Seconds) -> Self {
        Self {
            source_duration,
            window: Some((start, end)),
        }
    }

    pub fn window(&self) -> Option<(Seconds, Seconds)> {
        self.window
    }

    /// The visible span: the window's length, else the full source.
    pub fn active_duration(&self) -> Seconds {
        match self.window {
            Some((start, end)) => end - start,
            None => self.source_duration,
        }
    }

    /// Check a native position against the window.
    pub fn check(&self, absolute: Seconds) -> PlaybackDirective {
        let Some((start, end)) = self.window else {
            return PlaybackDirective::Continue;
        };
        if absolute < start {
            PlaybackDirective::Snap(start)
        } else if absolute >= end {
            PlaybackDirective::SnapAndPause(start)
        } else {
            PlaybackDirective::Continue
        }
    }

    /// Display time for a native position.
    pub fn relative(&self, absolute: Seconds) -> Seconds {
        match self.window {
            Some((start, _)) => (absolute - start).max(0.0),
            None => absolute,
        }
    }

    /// Native position for a display-time seek, kept inside the window.
    pub fn absolute(&self, relative: Seconds) -> Seconds {
        match self.window {
            Some((start, end)) => (start + relative).min(end - SEEK_END_MARGIN).max(start),
            None => relative.min(self.source_duration).max(0.0),
        }
    }

    pub fn cursor(&self, absolute: Seconds) -> PlaybackCursor {
        PlaybackCursor {
            absolute,
            relative: self.relative(absolute),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
