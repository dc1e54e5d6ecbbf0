//! Coordinate Quest - block-programming sandbox engine
//!
//! Scripts are ordered lists of blocks (go to, glide to, say) run against one
//! actor on a stage. Landing near the target scores and respawns it.

pub mod core;
pub mod progress;
pub mod runner;
pub mod script;
pub mod stage;
