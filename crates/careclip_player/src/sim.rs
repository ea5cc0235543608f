use crate::source::MediaSource;
use careclip_core::types::Seconds;

// ---------------------------------------------------------------------------
// SimulatedSource
// ---------------------------------------------------------------------------

/// Deterministic in-memory source for tests and headless runs. The clock
/// only moves when `advance` is called, so scenarios are fully scripted.
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    duration: Option<Seconds>,
    position: Seconds,
    playing: bool,
}

impl SimulatedSource {
    /// A source whose metadata has not arrived yet.
    pub fn new() -> Self {
        Self {
            duration: None,
            position: 0.0,
            playing: false,
        }
    }

    /// A source with metadata already loaded.
    pub fn load(duration: Seconds) -> Self {
        Self {
            duration: Some(duration),
            position: 0.0,
            playing: false,
        }
    }

    /// Move the clock forward by `dt` seconds of wall time. Only effective
    /// while playing; reaching the end of the media pauses.
    pub fn advance(&mut self, dt: Seconds) {
        if !self.playing {
            return;
        }
        let Some(duration) = self.duration else {
            return;
        };
        self.position = (self.position + dt).min(duration).max(0.0);
        if self.position >= duration {
            self.playing = false;
        }
    }
}

impl MediaSource for SimulatedSource {
    fn duration(&self) -> Option<Seconds> {
        self.duration
    }

    fn position(&self) -> Seconds {
        self.position
    }

    fn seek(&mut self, time: Seconds) {
        let limit = self.duration.unwrap_or(0.0);
        self.position = time.min(limit).max(0.0);
    }

    fn play(&mut self) {
        if self.duration.is_some() {
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
