//! Caller-side progression: themes, characters, unlocks

pub mod catalog;
pub mod unlocks;

pub use catalog::{default_theme, theme, Theme, CHARACTERS, THEMES};
pub use unlocks::{
    current_progress, is_locked, points_needed, unlocked_count, Progress, Unlock,
    INITIAL_UNLOCKED, POINTS_PER_UNLOCK,
};
