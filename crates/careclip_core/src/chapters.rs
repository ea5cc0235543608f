use crate::types::{Chapter, EditOutcome, Seconds, BOUNDARY_EPS};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ChapterList
// ---------------------------------------------------------------------------

/// Gap-free partition of the active timeline into titled chapters: sorted by
/// start, first starts at 0, adjacent chapters share a boundary, the last
/// ends at the active duration. Never empty once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChapterList {
    active_duration: Seconds,
    chapters: Vec<Chapter>,
}

impl ChapterList {
    /// A single chapter spanning the whole active timeline.
    pub fn new(active_duration: Seconds) -> Self {
        Self {
            active_duration,
            chapters: vec![Chapter::new("Chapter 1", 0.0, active_duration)],
        }
    }

    /// Load persisted chapters, falling back to the single-chapter default
    /// when the list does not form a contiguous cover of the active span.
    pub fn from_saved(active_duration: Seconds, saved: Vec<Chapter>) -> Self {
        if is_contiguous_cover(active_duration, &saved) {
            Self {
                active_duration,
                chapters: saved,
            }
        } else {
            Self::new(active_duration)
        }
    }

    pub fn active_duration(&self) -> Seconds {
        self.active_duration
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn get(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }

    /// Index of the chapter whose `[start, end)` span contains `time`.
    pub fn index_at(&self, time: Seconds) -> Option<usize> {
        self.chapters.iter().position(|c| c.contains(time))
    }

    /// The chapter whose span contains `time` (relative seconds).
    pub fn chapter_at(&self, time: Seconds) -> Option<&Chapter> {
        self.index_at(time).map(|i| &self.chapters[i])
    }

    /// Start of the chapter after `index`, if any.
    pub fn next_start_after(&self, index: usize) -> Option<Seconds> {
        self.chapters.get(index + 1).map(|c| c.start_time)
    }

    /// Start of the chapter before `index`, if any.
    pub fn previous_start_before(&self, index: usize) -> Option<Seconds> {
        index
            .checked_sub(1)
            .and_then(|i| self.chapters.get(i))
            .map(|c| c.start_time)
    }

    /// Split the chapter containing `time` in two. The left part keeps its
    /// title, the right is auto-titled by position. No-op when `time` falls
    /// on an existing boundary or outside the active span.
    pub fn split_at(&mut self, time: Seconds) -> EditOutcome {
        if !time.is_finite() {
            return EditOutcome::Rejected;
        }
        let Some(index) = self.index_at(time) else {
            return EditOutcome::Rejected;
        };
        if time == self.chapters[index].start_time {
            return EditOutcome::Rejected;
        }
        let old_end = self.chapters[index].end_time;
        self.chapters[index].end_time = time;
        let title = format!("Chapter {}", index + 2);
        self.chapters
            .insert(index + 1, Chapter::new(title, time, old_end));
        EditOutcome::Applied
    }

    /// Remove a chapter and re-derive every boundary so the partition stays
    /// gap-free. The last remaining chapter can never be removed.
    pub fn remove(&mut self, id: Uuid) -> EditOutcome {
        if self.chapters.len() <= 1 {
            return EditOutcome::Rejected;
        }
        let Some(index) = self.chapters.iter().position(|c| c.id == id) else {
            return EditOutcome::Rejected;
        };
        self.chapters.remove(index);
        self.rederive_boundaries();
        EditOutcome::Applied
    }

    /// Retitle a chapter. No boundary effect.
    pub fn rename(&mut self, id: Uuid, title: impl Into<String>) -> EditOutcome {
        match self.chapters.iter_mut().find(|c| c.id == id) {
            Some(chapter) => {
                chapter.title = title.into();
                EditOutcome::Applied
            }
            None => EditOutcome::Rejected,
        }
    }

    /// Re-derive the partition against a new active duration (after a trim
    /// commit): boundaries clamp into the new span, chapters emptied by the
    /// clamp are dropped, the outer boundaries are pinned.
    pub fn rescale_to(&mut self, new_duration: Seconds) {
        self.active_duration = new_duration;
        for chapter in &mut self.chapters {
            chapter.start_time = chapter.start_time.min(new_duration).max(0.0);
            chapter.end_time = chapter.end_time.min(new_duration).max(0.0);
        }
        self.chapters.retain(|c| c.end_time > c.start_time);
        match self.chapters.len() {
            0 => self
                .chapters
                .push(Chapter::new("Chapter 1", 0.0, new_duration)),
            n => {
                self.chapters[0].start_time = 0.0;
                self.chapters[n - 1].end_time = new_duration;
            }
        }
    }

    // First chapter starts at 0, each next starts where the previous ended,
    // the last ends at the active duration.
    fn rederive_boundaries(&mut self) {
        let duration = self.active_duration;
        let last = self.chapters.len() - 1;
        let mut cursor = 0.0;
        for (i, chapter) in self.chapters.iter_mut().enumerate() {
            chapter.start_time = cursor;
            if i == last {
                chapter.end_time = duration;
            }
            cursor = chapter.end_time;
        }
    }
}

fn is_contiguous_cover(active_duration: Seconds, chapters: &[Chapter]) -> bool {
    let (Some(first), Some(last)) = (chapters.first(), chapters.last()) else {
        return false;
    };
    for chapter in chapters {
        if !chapter.start_time.is_finite() || !chapter.end_time.is_finite() {
            return false;
        }
        if chapter.end_time <= chapter.start_time {
            return false;
        }
    }
    if first.start_time.abs() > BOUNDARY_EPS {
        return false;
    }
    if (last.end_time - active_duration).abs() > BOUNDARY_EPS {
        return false;
    }
    chapters
        .windows(2)
        .all(|pair| (pair[1].start_time - pair[0].end_time).abs() <= BOUNDARY_EPS)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
