//! Per-player unlock state
//!
//! Serialized as `progress[mode][difficulty] = { "unlocked": n }`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::content::{Chapter, Difficulty, Mode};

/// Unlock counter for one (mode, difficulty) track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Highest chapter the player may attempt
    pub unlocked: Chapter,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            unlocked: Chapter::FIRST,
        }
    }
}

/// All unlock counters of one player. Tracks without a record count as
/// chapter 1 unlocked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(BTreeMap<Mode, BTreeMap<Difficulty, ProgressRecord>>);

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, mode: Mode, difficulty: Difficulty) -> Option<&ProgressRecord> {
        self.0.get(&mode).and_then(|by_difficulty| by_difficulty.get(&difficulty))
    }

    pub fn unlocked(&self, mode: Mode, difficulty: Difficulty) -> Chapter {
        self.record(mode, difficulty)
            .map(|r| r.unlocked)
            .unwrap_or(Chapter::FIRST)
    }

    pub fn is_unlocked(&self, mode: Mode, difficulty: Difficulty, chapter: Chapter) -> bool {
        chapter <= self.unlocked(mode, difficulty)
    }

    /// Raise the unlock counter to at least `chapter`, creating the record if
    /// needed. Returns the resulting counter.
    pub fn unlock_up_to(
        &mut self,
        mode: Mode,
        difficulty: Difficulty,
        chapter: Chapter,
    ) -> Chapter {
        let record = self
            .0
            .entry(mode)
            .or_default()
            .entry(difficulty)
            .or_default();
        record.unlocked = record.unlocked.max(chapter);
        record.unlocked
    }

    /// Insert a stored record as-is (used when loading from storage)
    pub fn set(&mut self, mode: Mode, difficulty: Difficulty, record: ProgressRecord) {
        self.0.entry(mode).or_default().insert(difficulty, record);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Mode, Difficulty, ProgressRecord)> + '_ {
        self.0.iter().flat_map(|(mode, by_difficulty)| {
            by_difficulty
                .iter()
                .map(move |(difficulty, record)| (*mode, *difficulty, *record))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|by_difficulty| by_difficulty.is_empty())
    }
}

/// A validated "puzzle solved" event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub chapter: Chapter,
    pub score_to_add: u64,
}

/// Largest score the store can hold (it keeps scores in a signed 64-bit column)
pub const MAX_SCORE: u64 = i64::MAX as u64;

/// Apply a completion to a score and progress map.
///
/// The score grows by `score_to_add`. The next chapter is unlocked unless the
/// completed chapter was the last one, in which case the track is left
/// untouched. Returns the new score, or `None` with nothing changed when the
/// score would pass [`MAX_SCORE`].
pub fn apply_completion(
    score: &mut u64,
    progress: &mut Progress,
    completion: &Completion,
) -> Option<u64> {
    let new_score = score
        .checked_add(completion.score_to_add)
        .filter(|s| *s <= MAX_SCORE)?;
    *score = new_score;
    if let Some(next) = completion.chapter.next() {
        progress.unlock_up_to(completion.mode, completion.difficulty, next);
    }
    Some(new_score)
}
