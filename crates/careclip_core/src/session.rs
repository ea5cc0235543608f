use crate::chapters::ChapterList;
use crate::error::{CoreError, Result};
use crate::mode::ModeMachine;
use crate::playback::PlaybackGuard;
use crate::record::{EditRecord, TrimData};
use crate::trim::TrimRange;
use crate::types::{Chapter, EditMode, EditOutcome, Seconds};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// TrimCommitPolicy
// ---------------------------------------------------------------------------

/// Whether a committed trim can be reopened for another editing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimCommitPolicy {
    /// Once applied, trim editing stays unavailable for the session.
    LockAfterCommit,
    /// Re-entering trim mode reopens the committed range with its bounds.
    Reeditable,
}

// ---------------------------------------------------------------------------
// AppliedEdit
// ---------------------------------------------------------------------------

/// What an `apply_edit` call committed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppliedEdit {
    /// Trim frozen; the chapter partition was re-derived against the new
    /// active duration.
    Trim { start: Seconds, end: Seconds },
    /// Chapter edits are live as they happen; leaving the mode is all that
    /// remained.
    Chapters,
}

// ---------------------------------------------------------------------------
// EditSession
// ---------------------------------------------------------------------------

/// One caregiver editing one video: owns the edit mode, the working trim,
/// and the chapter partition. Models are deferred until the media source
/// reports a usable duration.
#[derive(Debug, Clone)]
pub struct EditSession {
    mode: ModeMachine,
    policy: TrimCommitPolicy,
    media: Option<MediaState>,
}

#[derive(Debug, Clone)]
struct MediaState {
    source_duration: Seconds,
    trim: TrimRange,
    chapters: ChapterList,
    /// Committed range saved while a re-editing pass is open, restored on
    /// cancel.
    trim_backup: Option<TrimRange>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::with_policy(TrimCommitPolicy::LockAfterCommit)
    }

    pub fn with_policy(policy: TrimCommitPolicy) -> Self {
        Self {
            mode: ModeMachine::new(),
            policy,
            media: None,
        }
    }

    /// Rehydrate a session from a persisted record. Trim bounds that do not
    /// describe a valid window are dropped (the session behaves untrimmed);
    /// an inconsistent chapter list falls back to the single-chapter default.
    pub fn resume(record: &EditRecord, source_duration: Seconds) -> Result<Self> {
        if !source_duration.is_finite() || source_duration <= 0.0 {
            return Err(CoreError::MediaNotReady);
        }
        let trim = record
            .trim_data
            .as_ref()
            .and_then(|t| TrimRange::from_saved(source_duration, t.trim_start, t.trim_end));
        let active = trim
            .as_ref()
            .map(|t| t.span())
            .unwrap_or(source_duration);
        let chapters = ChapterList::from_saved(active, record.chapters.clone());

        let mut session = Self::new();
        session.media = Some(MediaState {
            source_duration,
            trim: trim.unwrap_or_else(|| TrimRange::new(source_duration)),
            chapters,
            trim_backup: None,
        });
        Ok(session)
    }

    /// Install the models once source metadata arrives. Returns false when
    /// the reported duration is unusable (treated as "not yet initialized")
    /// or the session already loaded.
    pub fn on_media_loaded(&mut self, duration: Seconds) -> bool {
        if self.media.is_some() || !duration.is_finite() || duration <= 0.0 {
            return false;
        }
        self.media = Some(MediaState {
            source_duration: duration,
            trim: TrimRange::new(duration),
            chapters: ChapterList::new(duration),
            trim_backup: None,
        });
        true
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn is_ready(&self) -> bool {
        self.media.is_some()
    }

    pub fn mode(&self) -> EditMode {
        self.mode.current()
    }

    pub fn policy(&self) -> TrimCommitPolicy {
        self.policy
    }

    /// Governs future `begin_trim` calls on an already committed trim.
    pub fn set_policy(&mut self, policy: TrimCommitPolicy) {
        self.policy = policy;
    }

    pub fn source_duration(&self) -> Option<Seconds> {
        self.media.as_ref().map(|m| m.source_duration)
    }

    /// The post-trim span once committed, else the full source duration.
    pub fn active_duration(&self) -> Option<Seconds> {
        self.media.as_ref().map(|m| {
            if m.trim.is_committed() {
                m.trim.span()
            } else {
                m.source_duration
            }
        })
    }

    /// The working trim range.
    pub fn trim(&self) -> Option<&TrimRange> {
        self.media.as_ref().map(|m| &m.trim)
    }

    /// The committed window, if any.
    pub fn committed_trim(&self) -> Option<&TrimRange> {
        self.trim().filter(|t| t.is_committed())
    }

    pub fn chapters(&self) -> Option<&ChapterList> {
        self.media.as_ref().map(|m| &m.chapters)
    }

    /// Chapter containing `relative_time`, for "now playing" displays.
    pub fn chapter_at(&self, relative_time: Seconds) -> Option<&Chapter> {
        self.chapters().and_then(|c| c.chapter_at(relative_time))
    }

    // -----------------------------------------------------------------------
    // Mode commands
    // -----------------------------------------------------------------------

    /// Enter trim mode. An uncommitted range resets to the full span; a
    /// committed trim blocks re-entry under the locking policy, and under
    /// `Reeditable` reopens with its bounds instead of resetting.
    pub fn begin_trim(&mut self) -> Result<()> {
        let Some(media) = self.media.as_mut() else {
            return Err(CoreError::MediaNotReady);
        };
        if media.trim.is_committed() && self.policy == TrimCommitPolicy::LockAfterCommit {
            return Err(CoreError::TrimLocked);
        }
        self.mode.try_enter(EditMode::Trimming)?;
        if media.trim.is_committed() {
            media.trim_backup = Some(media.trim.clone());
            media.trim.reopen();
        } else {
            media.trim.reset();
        }
        Ok(())
    }

    /// Enter chapter mode. The partition is never reset on entry; edits
    /// accumulate across visits.
    pub fn begin_chapters(&mut self) -> Result<()> {
        if self.media.is_none() {
            return Err(CoreError::MediaNotReady);
        }
        self.mode.try_enter(EditMode::Chapters)
    }

    /// Leave the current mode without applying. Uncommitted trim changes
    /// are discarded (a reopened range returns to its committed bounds);
    /// chapter edits are never rolled back. Returns the mode left.
    pub fn cancel_edit(&mut self) -> EditMode {
        let left = self.mode.to_idle();
        if left == EditMode::Trimming {
            if let Some(media) = self.media.as_mut() {
                match media.trim_backup.take() {
                    Some(backup) => media.trim = backup,
                    None => media.trim.reset(),
                }
            }
        }
        left
    }

    /// Commit the active edit and return to idle. Committing a trim freezes
    /// the window and re-derives the chapter partition against the trimmed
    /// duration.
    pub fn apply_edit(&mut self) -> Result<AppliedEdit> {
        match self.mode.current() {
            EditMode::Idle => Err(CoreError::NothingToApply),
            EditMode::Trimming => {
                let media = self.media.as_mut().ok_or(CoreError::MediaNotReady)?;
                media.trim.commit();
                media.trim_backup = None;
                let span = media.trim.span();
                media.chapters.rescale_to(span);
                self.mode.to_idle();
                Ok(AppliedEdit::Trim {
                    start: media.trim.start(),
                    end: media.trim.end(),
                })
            }
            EditMode::Chapters => {
                self.mode.to_idle();
                Ok(AppliedEdit::Chapters)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Model passthroughs, gated on the active mode
    // -----------------------------------------------------------------------

    /// Move the trim start handle. Only effective while trimming.
    pub fn set_trim_start(&mut self, candidate: Seconds) -> EditOutcome {
        if self.mode.current() != EditMode::Trimming {
            return EditOutcome::Rejected;
        }
        match self.media.as_mut() {
            Some(media) => media.trim.set_start(candidate),
            None => EditOutcome::Rejected,
        }
    }

    /// Move the trim end handle. Only effective while trimming.
    pub fn set_trim_end(&mut self, candidate: Seconds) -> EditOutcome {
        if self.mode.current() != EditMode::Trimming {
            return EditOutcome::Rejected;
        }
        match self.media.as_mut() {
            Some(media) => media.trim.set_end(candidate),
            None => EditOutcome::Rejected,
        }
    }

    /// Split the chapter containing `time` (relative seconds). Only
    /// effective while editing chapters.
    pub fn add_chapter_at(&mut self, time: Seconds) -> EditOutcome {
        if self.mode.current() != EditMode::Chapters {
            return EditOutcome::Rejected;
        }
        match self.media.as_mut() {
            Some(media) => media.chapters.split_at(time),
            None => EditOutcome::Rejected,
        }
    }

    /// Remove a chapter, merging its span into the next. Only effective
    /// while editing chapters.
    pub fn remove_chapter(&mut self, id: Uuid) -> EditOutcome {
        if self.mode.current() != EditMode::Chapters {
            return EditOutcome::Rejected;
        }
        match self.media.as_mut() {
            Some(media) => media.chapters.remove(id),
            None => EditOutcome::Rejected,
        }
    }

    /// Retitle a chapter. Titles carry no boundary meaning, so renaming is
    /// allowed in any mode.
    pub fn rename_chapter(&mut self, id: Uuid, title: impl Into<String>) -> EditOutcome {
        match self.media.as_mut() {
            Some(media) => media.chapters.rename(id, title),
            None => EditOutcome::Rejected,
        }
    }

    // -----------------------------------------------------------------------
    // Exports
    // -----------------------------------------------------------------------

    /// Serializable payload for the metadata-persistence collaborator.
    pub fn to_record(&self) -> Result<EditRecord> {
        let media = self.media.as_ref().ok_or(CoreError::MediaNotReady)?;
        let committed = media.trim.is_committed();
        let trim_data = committed.then(|| TrimData {
            trim_start: media.trim.start(),
            trim_end: media.trim.end(),
            trimmed_duration: media.trim.span(),
        });
        let final_duration = if committed {
            media.trim.span()
        } else {
            media.source_duration
        };
        Ok(EditRecord {
            trim_data,
            chapters: media.chapters.chapters().to_vec(),
            final_duration,
            original_duration: media.source_duration,
            was_trimmed: committed,
        })
    }

    /// Enforcer for the committed window; unrestricted when nothing has
    /// been committed.
    pub fn playback_guard(&self) -> Result<PlaybackGuard> {
        let media = self.media.as_ref().ok_or(CoreError::MediaNotReady)?;
        if media.trim.is_committed() {
            Ok(PlaybackGuard::with_window(
                media.source_duration,
                media.trim.start(),
                media.trim.end(),
            ))
        } else {
            Ok(PlaybackGuard::unrestricted(media.source_duration))
        }
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_session() -> EditSession {
        let mut session = EditSession::new();
        assert!(session.on_media_loaded(100.0));
        session
    }

    fn make_trimmed_session() -> EditSession {
        let mut session = make_session();
        session.begin_trim().unwrap();
        session.set_trim_start(10.0);
        session.set_trim_end(40.0);
        session.apply_edit().unwrap();
        session
    }

    // -----------------------------------------------------------------------
    // deferred initialization
    // -----------------------------------------------------------------------

    #[test]
    fn session_defers_until_metadata_arrives() {
        let mut session = EditSession::new();
        assert!(!session.is_ready());
        assert!(session.active_duration().is_none());
        assert!(matches!(
            session.begin_trim(),
            Err(CoreError::MediaNotReady)
        ));
        assert_eq!(session.set_trim_start(5.0), EditOutcome::Rejected);
        assert!(matches!(session.to_record(), Err(CoreError::MediaNotReady)));
    }

    #[test]
    fn unusable_duration_keeps_session_pending() {
        let mut session = EditSession::new();
        assert!(!session.on_media_loaded(0.0));
        assert!(!session.on_media_loaded(-3.0));
        assert!(!session.on_media_loaded(f64::NAN));
        assert!(!session.is_ready());

        assert!(session.on_media_loaded(100.0));
        assert!(session.is_ready());
        assert_eq!(session.active_duration(), Some(100.0));
    }

    #[test]
    fn second_metadata_load_is_ignored() {
        let mut session = make_session();
        assert!(!session.on_media_loaded(50.0));
        assert_eq!(session.source_duration(), Some(100.0));
    }

    // -----------------------------------------------------------------------
    // trim flow
    // -----------------------------------------------------------------------

    #[test]
    fn trim_commit_freezes_window_and_rescales_chapters() {
        let mut session = make_session();
        session.begin_trim().unwrap();
        assert_eq!(session.set_trim_start(10.0), EditOutcome::Applied);
        assert_eq!(session.set_trim_end(40.0), EditOutcome::Applied);

        let applied = session.apply_edit().unwrap();
        assert_eq!(
            applied,
            AppliedEdit::Trim {
                start: 10.0,
                end: 40.0
            }
        );
        assert_eq!(session.mode(), EditMode::Idle);
        assert_eq!(session.active_duration(), Some(30.0));

        let chapters = session.chapters().unwrap();
        assert_eq!(chapters.chapter_count(), 1);
        assert_eq!(chapters.chapters()[0].end_time, 30.0);
    }

    #[test]
    fn trim_setters_are_rejected_outside_trim_mode() {
        let mut session = make_session();
        assert_eq!(session.set_trim_start(10.0), EditOutcome::Rejected);
        session.begin_chapters().unwrap();
        assert_eq!(session.set_trim_end(40.0), EditOutcome::Rejected);
        assert!(session.trim().unwrap().is_full_span());
    }

    #[test]
    fn entering_trim_resets_stale_working_values() {
        let mut session = make_session();
        session.begin_trim().unwrap();
        session.set_trim_start(20.0);
        session.cancel_edit();

        session.begin_trim().unwrap();
        assert!(session.trim().unwrap().is_full_span());
    }

    #[test]
    fn cancel_discards_uncommitted_trim() {
        let mut session = make_session();
        session.begin_trim().unwrap();
        session.set_trim_start(20.0);
        assert_eq!(session.cancel_edit(), EditMode::Trimming);
        assert!(session.trim().unwrap().is_full_span());
        assert!(session.committed_trim().is_none());
    }

    #[test]
    fn committed_trim_locks_reentry_by_default() {
        let mut session = make_trimmed_session();
        assert!(matches!(session.begin_trim(), Err(CoreError::TrimLocked)));
        // Chapter editing stays available against the trimmed timeline.
        assert!(session.begin_chapters().is_ok());
    }

    #[test]
    fn reeditable_policy_reopens_committed_bounds() {
        let mut session = EditSession::with_policy(TrimCommitPolicy::Reeditable);
        assert_eq!(session.policy(), TrimCommitPolicy::Reeditable);
        session.on_media_loaded(100.0);
        session.begin_trim().unwrap();
        session.set_trim_start(10.0);
        session.set_trim_end(40.0);
        session.apply_edit().unwrap();

        session.begin_trim().unwrap();
        let trim = session.trim().unwrap();
        assert!(!trim.is_committed());
        assert_eq!(trim.start(), 10.0);
        assert_eq!(trim.end(), 40.0);

        assert_eq!(session.set_trim_end(60.0), EditOutcome::Applied);
        let applied = session.apply_edit().unwrap();
        assert_eq!(
            applied,
            AppliedEdit::Trim {
                start: 10.0,
                end: 60.0
            }
        );
        assert_eq!(session.active_duration(), Some(50.0));
    }

    #[test]
    fn cancelling_a_reedit_restores_the_committed_window() {
        let mut session = EditSession::with_policy(TrimCommitPolicy::Reeditable);
        session.on_media_loaded(100.0);
        session.begin_trim().unwrap();
        session.set_trim_start(10.0);
        session.set_trim_end(40.0);
        session.apply_edit().unwrap();

        session.begin_trim().unwrap();
        session.set_trim_end(90.0);
        session.cancel_edit();

        let trim = session.committed_trim().unwrap();
        assert_eq!(trim.start(), 10.0);
        assert_eq!(trim.end(), 40.0);
        assert_eq!(session.active_duration(), Some(30.0));
    }

    // -----------------------------------------------------------------------
    // mode exclusivity
    // -----------------------------------------------------------------------

    #[test]
    fn edit_modes_are_mutually_exclusive() {
        let mut session = make_session();
        session.begin_chapters().unwrap();
        assert!(matches!(
            session.begin_trim(),
            Err(CoreError::EditInProgress(EditMode::Chapters))
        ));
        session.cancel_edit();
        assert!(session.begin_trim().is_ok());
    }

    #[test]
    fn apply_without_an_active_edit_is_an_error() {
        let mut session = make_session();
        assert!(matches!(
            session.apply_edit(),
            Err(CoreError::NothingToApply)
        ));
    }

    // -----------------------------------------------------------------------
    // chapter flow
    // -----------------------------------------------------------------------

    #[test]
    fn chapter_edits_are_gated_on_chapter_mode() {
        let mut session = make_session();
        assert_eq!(session.add_chapter_at(25.0), EditOutcome::Rejected);

        session.begin_chapters().unwrap();
        assert_eq!(session.add_chapter_at(25.0), EditOutcome::Applied);
        let id = session.chapters().unwrap().chapters()[1].id;
        assert_eq!(session.remove_chapter(id), EditOutcome::Applied);

        session.cancel_edit();
        assert_eq!(session.remove_chapter(id), EditOutcome::Rejected);
    }

    #[test]
    fn cancel_never_rolls_back_chapter_edits() {
        let mut session = make_session();
        session.begin_chapters().unwrap();
        session.add_chapter_at(25.0);
        assert_eq!(session.cancel_edit(), EditMode::Chapters);
        assert_eq!(session.chapters().unwrap().chapter_count(), 2);
    }

    #[test]
    fn applying_chapter_mode_just_returns_to_idle() {
        let mut session = make_session();
        session.begin_chapters().unwrap();
        session.add_chapter_at(25.0);
        assert_eq!(session.apply_edit().unwrap(), AppliedEdit::Chapters);
        assert_eq!(session.mode(), EditMode::Idle);
        assert_eq!(session.chapters().unwrap().chapter_count(), 2);
    }

    #[test]
    fn renaming_is_allowed_in_any_mode() {
        let mut session = make_session();
        let id = session.chapters().unwrap().chapters()[0].id;
        assert_eq!(session.rename_chapter(id, "Welcome"), EditOutcome::Applied);
        assert_eq!(session.chapters().unwrap().chapters()[0].title, "Welcome");
    }

    #[test]
    fn chapter_at_reports_the_playing_chapter() {
        let mut session = make_session();
        session.begin_chapters().unwrap();
        session.add_chapter_at(25.0);
        session.apply_edit().unwrap();

        assert_eq!(session.chapter_at(10.0).unwrap().title, "Chapter 1");
        assert_eq!(session.chapter_at(25.0).unwrap().title, "Chapter 2");
        assert!(session.chapter_at(100.0).is_none());
    }

    // -----------------------------------------------------------------------
    // records and resume
    // -----------------------------------------------------------------------

    #[test]
    fn untrimmed_record_has_no_trim_data() {
        let session = make_session();
        let record = session.to_record().unwrap();
        assert!(record.trim_data.is_none());
        assert!(!record.was_trimmed);
        assert_eq!(record.final_duration, 100.0);
        assert_eq!(record.original_duration, 100.0);
        assert_eq!(record.chapters.len(), 1);
    }

    #[test]
    fn trimmed_record_carries_the_window() {
        let session = make_trimmed_session();
        let record = session.to_record().unwrap();
        let trim_data = record.trim_data.unwrap();
        assert_eq!(trim_data.trim_start, 10.0);
        assert_eq!(trim_data.trim_end, 40.0);
        assert_eq!(trim_data.trimmed_duration, 30.0);
        assert!(record.was_trimmed);
        assert_eq!(record.final_duration, 30.0);
        assert_eq!(record.original_duration, 100.0);
    }

    #[test]
    fn record_round_trip_rehydrates_identically() {
        let mut session = make_trimmed_session();
        session.begin_chapters().unwrap();
        session.add_chapter_at(5.0);
        session.add_chapter_at(17.5);
        session.apply_edit().unwrap();

        let json = session.to_record().unwrap().to_json().unwrap();
        let record = EditRecord::from_json(&json).unwrap();
        let resumed = EditSession::resume(&record, 100.0).unwrap();

        let trim = resumed.committed_trim().unwrap();
        assert_eq!(trim.start(), 10.0);
        assert_eq!(trim.end(), 40.0);
        assert_eq!(resumed.active_duration(), Some(30.0));
        assert_eq!(
            resumed.chapters().unwrap().chapters(),
            session.chapters().unwrap().chapters()
        );
    }

    #[test]
    fn resume_drops_invalid_trim_bounds() {
        let record = EditRecord {
            trim_data: Some(TrimData {
                trim_start: 50.0,
                trim_end: 20.0,
                trimmed_duration: -30.0,
            }),
            chapters: vec![Chapter::new("Chapter 1", 0.0, 30.0)],
            final_duration: 30.0,
            original_duration: 100.0,
            was_trimmed: true,
        };
        let resumed = EditSession::resume(&record, 100.0).unwrap();
        assert!(resumed.committed_trim().is_none());
        assert_eq!(resumed.active_duration(), Some(100.0));
        // The saved chapters no longer cover the active span, so the
        // single-chapter default takes over.
        let chapters = resumed.chapters().unwrap();
        assert_eq!(chapters.chapter_count(), 1);
        assert_eq!(chapters.chapters()[0].end_time, 100.0);
    }

    #[test]
    fn resume_replaces_malformed_chapters() {
        let record = EditRecord {
            trim_data: None,
            chapters: vec![
                Chapter::new("A", 0.0, 10.0),
                Chapter::new("B", 25.0, 100.0),
            ],
            final_duration: 100.0,
            original_duration: 100.0,
            was_trimmed: false,
        };
        let resumed = EditSession::resume(&record, 100.0).unwrap();
        assert_eq!(resumed.chapters().unwrap().chapter_count(), 1);
    }

    #[test]
    fn resume_requires_a_usable_duration() {
        let record = EditRecord {
            trim_data: None,
            chapters: vec![],
            final_duration: 0.0,
            original_duration: 0.0,
            was_trimmed: false,
        };
        assert!(matches!(
            EditSession::resume(&record, 0.0),
            Err(CoreError::MediaNotReady)
        ));
    }

    #[test]
    fn resumed_trim_stays_locked_by_default() {
        let session = make_trimmed_session();
        let record = session.to_record().unwrap();
        let mut resumed = EditSession::resume(&record, 100.0).unwrap();
        assert!(matches!(resumed.begin_trim(), Err(CoreError::TrimLocked)));

        resumed.set_policy(TrimCommitPolicy::Reeditable);
        assert!(resumed.begin_trim().is_ok());
    }

    // -----------------------------------------------------------------------
    // playback guard
    // -----------------------------------------------------------------------

    #[test]
    fn guard_is_unrestricted_before_commit() {
        let session = make_session();
        let guard = session.playback_guard().unwrap();
        assert!(guard.window().is_none());
        assert_eq!(guard.active_duration(), 100.0);
    }

    #[test]
    fn guard_carries_the_committed_window() {
        let session = make_trimmed_session();
        let guard = session.playback_guard().unwrap();
        assert_eq!(guard.window(), Some((10.0, 40.0)));
        assert_eq!(guard.active_duration(), 30.0);
    }
}
