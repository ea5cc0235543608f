use crate::source::MediaSource;
use careclip_core::chapters::ChapterList;
use careclip_core::error::{CoreError, Result};
use careclip_core::playback::{PlaybackCursor, PlaybackDirective, PlaybackGuard};
use careclip_core::session::EditSession;
use careclip_core::types::{format_timestamp, Seconds};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

// ---------------------------------------------------------------------------
// PlayerStatus
// ---------------------------------------------------------------------------

/// Snapshot emitted after every driver tick, shaped for UI consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatus {
    pub absolute: Seconds,
    pub relative: Seconds,
    pub playing: bool,
    pub chapter_index: Option<usize>,
    pub chapter_title: Option<String>,
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Drives a media source under a committed-window guard: enforces trim
/// boundaries on every position notification, tracks the current chapter,
/// and remaps all user-facing positions to relative time.
pub struct Player<S: MediaSource> {
    source: S,
    guard: PlaybackGuard,
    chapters: ChapterList,
    current_chapter: Option<usize>,
}

impl<S: MediaSource> Player<S> {
    pub fn new(source: S, guard: PlaybackGuard, chapters: ChapterList) -> Self {
        Self {
            source,
            guard,
            chapters,
            current_chapter: None,
        }
    }

    /// Build a player from a session's committed state.
    pub fn from_session(session: &EditSession, source: S) -> Result<Self> {
        let guard = session.playback_guard()?;
        let chapters = session
            .chapters()
            .cloned()
            .ok_or(CoreError::MediaNotReady)?;
        Ok(Self::new(source, guard, chapters))
    }

    pub fn chapters(&self) -> &ChapterList {
        &self.chapters
    }

    pub fn is_playing(&self) -> bool {
        self.source.is_playing()
    }

    pub fn play(&mut self) {
        self.source.play();
    }

    pub fn pause(&mut self) {
        self.source.pause();
    }

    pub fn toggle_playback(&mut self) {
        if self.source.is_playing() {
            self.source.pause();
        } else {
            self.source.play();
        }
    }

    /// Current position in both absolute and relative coordinates.
    pub fn cursor(&self) -> PlaybackCursor {
        self.guard.cursor(self.source.position())
    }

    /// Seek to a relative display time, remapped into the committed window.
    pub fn seek_display(&mut self, relative: Seconds) {
        let absolute = self.guard.absolute(relative);
        self.source.seek(absolute);
    }

    /// Skip forward or back by `delta` seconds of display time, clamped to
    /// the active timeline.
    pub fn skip(&mut self, delta: Seconds) {
        let target = (self.cursor().relative + delta)
            .min(self.guard.active_duration())
            .max(0.0);
        self.seek_display(target);
    }

    /// Jump to the start of the next chapter. Returns the relative target,
    /// or None when already in the last chapter.
    pub fn next_chapter(&mut self) -> Option<Seconds> {
        let current = self
            .current_chapter
            .or_else(|| self.chapters.index_at(self.cursor().relative))?;
        let target = self.chapters.next_start_after(current)?;
        self.current_chapter = Some(current + 1);
        self.seek_display(target);
        Some(target)
    }

    /// Jump to the start of the previous chapter. Returns the relative
    /// target, or None when already in the first chapter.
    pub fn previous_chapter(&mut self) -> Option<Seconds> {
        let current = self
            .current_chapter
            .or_else(|| self.chapters.index_at(self.cursor().relative))?;
        let target = self.chapters.previous_start_before(current)?;
        self.current_chapter = Some(current - 1);
        self.seek_display(target);
        Some(target)
    }

    /// Process one position notification: enforce the committed window,
    /// refresh chapter tracking, and report the resulting state.
    pub fn tick(&mut self) -> PlayerStatus {
        let absolute = self.source.position();
        match self.guard.check(absolute) {
            PlaybackDirective::Continue => {}
            PlaybackDirective::Snap(to) => {
                tracing::debug!("position {} is outside the window, snapping to {}", absolute, to);
                self.source.seek(to);
            }
            PlaybackDirective::SnapAndPause(to) => {
                tracing::debug!("window end reached at {}, looping to {}", absolute, to);
                self.source.seek(to);
                self.source.pause();
            }
        }

        let cursor = self.guard.cursor(self.source.position());
        let index = self.chapters.index_at(cursor.relative).or(self.current_chapter);
        if index != self.current_chapter {
            self.current_chapter = index;
            if let Some(chapter) = index.and_then(|i| self.chapters.get(i)) {
                tracing::info!(
                    "entering chapter {} at {}",
                    chapter.title,
                    format_timestamp(cursor.relative)
                );
            }
        }

        let chapter_title = self
            .current_chapter
            .and_then(|i| self.chapters.get(i))
            .map(|c| c.title.clone());
        PlayerStatus {
            absolute: cursor.absolute,
            relative: cursor.relative,
            playing: self.source.is_playing(),
            chapter_index: self.current_chapter,
            chapter_title,
        }
    }

    /// Tick on a fixed cadence, emitting a status after each pass, until
    /// the receiving side goes away.
    pub async fn run(mut self, tx: UnboundedSender<PlayerStatus>, period: Duration) {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let status = self.tick();
            if tx.send(status).is_err() {
                break;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
