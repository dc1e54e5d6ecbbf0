//! Script runner: sequential, time-driven, cooperatively cancellable
//!
//! `Session` is the entry point. It owns the stage and the script and runs the
//! script on a Tokio task:
//! Idle -> run() -> Running -> (all commands done | stop()) -> Idle

mod execute;
pub mod events;
pub mod session;

pub use events::{RunEvent, RunOutcome, RunReport, RunStatus, ScoreEvent, Snapshot};
pub use session::{RunHandle, Session};
