//! The command loop behind `Session::run`
//!
//! Commands run strictly in order. Each one commits its effect, then waits
//! out its nominal duration. Cancellation is cooperative: the loop checks the
//! run's flag before every step and again after every wait, and all writes go
//! through `Shared::update_if_live` so nothing lands once `stop()` returns.

use std::sync::Arc;

use crate::core::types::Point;
use crate::runner::events::{RunEvent, RunOutcome, RunReport, RunStatus, ScoreEvent};
use crate::runner::session::{RunState, SessionState, Shared};
use crate::script::Block;
use crate::stage::proximity::evaluate_proximity;

pub(crate) async fn execute(shared: Arc<Shared>, run: RunState) -> RunReport {
    let mut executed = 0;
    let mut scores = Vec::new();
    let mut index = 0;

    let outcome = loop {
        let Some(started) = shared.update_if_live(&run, |state| start_step(state, index)) else {
            break RunOutcome::Cancelled;
        };
        let Some(block) = started else {
            break RunOutcome::Completed;
        };

        tracing::debug!("Run {} step {}: {:?}", run.generation, index, block.command);
        shared.emit(RunEvent::CommandStarted {
            index,
            id: block.id,
            kind: block.command.kind(),
        });

        let wait = block.command.wait(&shared.config);

        if let Some(destination) = block.command.destination() {
            let moved = shared.update_if_live(&run, |state| {
                state.roster.move_to(run.actor, destination)
            });
            match moved {
                None => break RunOutcome::Cancelled,
                Some(false) => break RunOutcome::ActorRemoved,
                Some(true) => {}
            }
            executed += 1;

            tokio::time::sleep(wait).await;

            match score_arrival(&shared, &run, destination) {
                Arrival::Scored(event) => scores.push(event),
                Arrival::Missed => {}
                Arrival::Cancelled => break RunOutcome::Cancelled,
                Arrival::ActorRemoved => break RunOutcome::ActorRemoved,
            }
        } else if let Some(speech) = block.command.speech() {
            let speech = speech.to_string();
            let spoke = shared.update_if_live(&run, |state| {
                state.roster.set_speech(run.actor, Some(speech))
            });
            match spoke {
                None => break RunOutcome::Cancelled,
                Some(false) => break RunOutcome::ActorRemoved,
                Some(true) => {}
            }
            executed += 1;

            tokio::time::sleep(wait).await;

            // Speech never outlives its wait. After a stop only clear it if
            // no newer run has taken the stage since.
            shared.update(|state| {
                if state.is_live(&run) || state.run.is_none() {
                    state.roster.set_speech(run.actor, None);
                }
            });
        }

        index += 1;
    };

    let report = RunReport {
        executed,
        outcome,
        scores,
    };
    finish(&shared, &run);
    tracing::info!(
        "Run {} finished: {:?} after {} commands, {} scores",
        run.generation,
        report.outcome,
        report.executed,
        report.scores.len()
    );
    shared.emit(RunEvent::Finished(report.clone()));
    report
}

/// Fetch the block at `index` and record it as the current step
fn start_step(state: &mut SessionState, index: usize) -> Option<Block> {
    let block = state.script.get(index).cloned()?;
    if let Some(current) = state.run.as_mut() {
        current.command_index = index;
    }
    Some(block)
}

/// What a motion block amounted to once its wait ended
enum Arrival {
    Scored(ScoreEvent),
    Missed,
    Cancelled,
    ActorRemoved,
}

/// Score the arrival at `destination` against the current target
fn score_arrival(shared: &Arc<Shared>, run: &RunState, destination: Point) -> Arrival {
    let config = &shared.config;
    let hit = shared.update_if_live(run, |state| {
        if !state.roster.contains(run.actor) {
            return Err(Arrival::ActorRemoved);
        }
        if !evaluate_proximity(destination, state.target.position) {
            return Err(Arrival::Missed);
        }
        let event = ScoreEvent {
            previous_score: state.score,
            new_score: state.score + 1,
        };
        state.score = event.new_score;
        let serial = state.show_success(config.success_message.clone());
        let respawned = state.target.respawn(&mut state.rng);
        Ok((event, serial, respawned))
    });

    let (event, serial, respawned) = match hit {
        None => return Arrival::Cancelled,
        Some(Err(arrival)) => return arrival,
        Some(Ok(hit)) => hit,
    };

    tracing::info!(
        "Scored at ({}, {}): {} -> {}",
        destination.x,
        destination.y,
        event.previous_score,
        event.new_score
    );
    tracing::debug!("Target respawned at ({}, {})", respawned.x, respawned.y);
    shared.emit(RunEvent::Scored(event));
    shared.emit(RunEvent::Respawned {
        position: respawned,
    });

    // The success message fades on its own clock; the loop moves on now.
    let timer = Arc::clone(shared);
    let linger = config.scaled(config.success_message_ms);
    tokio::spawn(async move {
        tokio::time::sleep(linger).await;
        timer.update(|state| {
            if state.success.as_ref().is_some_and(|m| m.serial == serial) {
                state.success = None;
            }
        });
    });

    Arrival::Scored(event)
}

fn finish(shared: &Shared, run: &RunState) {
    shared.update(|state| {
        let current = state
            .run
            .as_ref()
            .is_some_and(|r| r.generation == run.generation);
        if current {
            state.run = None;
            state.status = RunStatus::Idle;
        }
    });
}
