//! Cumulative score and character unlocks
//!
//! The session only reports score deltas. This tracker turns them into
//! unlock notifications the way the sandbox menu presents them.

use serde::{Deserialize, Serialize};

use crate::progress::catalog::CHARACTERS;
use crate::runner::events::ScoreEvent;

/// Points needed for each additional character
pub const POINTS_PER_UNLOCK: u32 = 3;

/// Characters available before any points are scored
pub const INITIAL_UNLOCKED: usize = 3;

/// How many roster characters a score has unlocked
pub fn unlocked_count(score: u32) -> usize {
    let earned = (score / POINTS_PER_UNLOCK) as usize;
    CHARACTERS.len().min(INITIAL_UNLOCKED + earned)
}

/// Points scored toward the next unlock
pub fn current_progress(score: u32) -> u32 {
    score % POINTS_PER_UNLOCK
}

pub fn is_locked(index: usize, score: u32) -> bool {
    index >= unlocked_count(score)
}

/// Points still missing before roster slot `index` unlocks
///
/// Zero for slots that are already available.
pub fn points_needed(index: usize, score: u32) -> u32 {
    if index < INITIAL_UNLOCKED {
        return 0;
    }
    let required = (index - INITIAL_UNLOCKED + 1) as u32 * POINTS_PER_UNLOCK;
    required.saturating_sub(score)
}

/// A character became available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Unlock {
    /// Roster index of the newly available character
    pub index: usize,
    pub character: &'static str,
}

/// Caller-owned cumulative score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    score: u32,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Apply a score event, returning the unlock it caused, if any
    ///
    /// No unlock is reported once the whole roster is available.
    pub fn record(&mut self, event: ScoreEvent) -> Option<Unlock> {
        let before = unlocked_count(event.previous_score);
        self.score = event.new_score;

        let crossed =
            event.new_score / POINTS_PER_UNLOCK > event.previous_score / POINTS_PER_UNLOCK;
        if !crossed || before >= CHARACTERS.len() {
            return None;
        }

        let unlock = Unlock {
            index: before,
            character: CHARACTERS[before],
        };
        tracing::info!("Unlocked character {} at score {}", unlock.character, self.score);
        Some(unlock)
    }

    pub fn reset(&mut self) {
        self.score = 0;
    }

    pub fn unlocked(&self) -> &'static [&'static str] {
        &CHARACTERS[..unlocked_count(self.score)]
    }
}
