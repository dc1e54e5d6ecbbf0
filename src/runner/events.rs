//! What a session reports to the presentation layer

use serde::{Deserialize, Serialize};

use crate::core::types::{ActorId, CommandId, Point};
use crate::script::CommandKind;
use crate::stage::actors::Actor;

/// Whether a script is currently executing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunStatus {
    Idle,
    Running,
}

/// Score before and after a single scoring hit
///
/// Callers derive unlock transitions from the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub previous_score: u32,
    pub new_score: u32,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Every command in the script executed
    Completed,
    /// `stop()` or `reset()` ended the run early
    Cancelled,
    /// The running actor was removed from the stage mid-run
    ActorRemoved,
}

/// Summary returned when a run task ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Commands whose effects were applied, including one cut short by a stop
    pub executed: usize,
    pub outcome: RunOutcome,
    pub scores: Vec<ScoreEvent>,
}

/// Progress notifications broadcast while a run executes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunEvent {
    Started {
        actor: ActorId,
        commands: usize,
    },
    CommandStarted {
        index: usize,
        id: CommandId,
        kind: CommandKind,
    },
    Scored(ScoreEvent),
    Respawned {
        position: Point,
    },
    Finished(RunReport),
}

/// Fully committed view of the session for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Increases with every published change
    pub version: u64,
    pub status: RunStatus,
    pub actors: Vec<Actor>,
    pub active_actor: ActorId,
    pub target: Point,
    pub success_message: Option<String>,
    /// Index of the command being executed, while running
    pub command_index: Option<usize>,
    pub score: u32,
}

impl Snapshot {
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }
}
