//! Stage state: actors, the target, and the scoring rule between them

pub mod actors;
pub mod proximity;
pub mod target;

pub use actors::{Actor, Roster};
pub use proximity::{evaluate_proximity, SCORE_RADIUS};
pub use target::Target;
