//! Session object: owns the stage, the script and the run lifecycle
//!
//! All state lives behind one lock that is never held across an await. The
//! run task and the control calls (`stop`, `reset`, edits) each apply a whole
//! step under that lock, so every published snapshot is fully committed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::{broadcast, watch};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::core::types::{ActorId, CommandId, Point};
use crate::progress::catalog::{default_theme, Theme};
use crate::runner::events::{RunEvent, RunReport, RunStatus, Snapshot};
use crate::runner::execute::execute;
use crate::script::{Command, CommandField, CommandKind, Script};
use crate::stage::actors::{Actor, Roster};
use crate::stage::target::Target;

const EVENT_CAPACITY: usize = 256;

/// Per-run bookkeeping, discarded when the run ends or is cancelled
#[derive(Debug, Clone)]
pub(crate) struct RunState {
    pub(crate) generation: u64,
    pub(crate) actor: ActorId,
    pub(crate) command_index: usize,
    pub(crate) cancelled: Arc<AtomicBool>,
}

impl RunState {
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SuccessMessage {
    pub(crate) serial: u64,
    pub(crate) text: String,
}

pub(crate) struct SessionState {
    pub(crate) roster: Roster,
    pub(crate) target: Target,
    pub(crate) script: Script,
    pub(crate) score: u32,
    pub(crate) status: RunStatus,
    pub(crate) run: Option<RunState>,
    pub(crate) success: Option<SuccessMessage>,
    pub(crate) rng: ChaCha8Rng,
    next_generation: u64,
    next_message: u64,
    version: u64,
}

impl SessionState {
    fn new(config: &EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            roster: Roster::new(default_theme().initial_character),
            target: Target::new(config.initial_target),
            script: Script::new(),
            score: 0,
            status: RunStatus::Idle,
            run: None,
            success: None,
            rng,
            next_generation: 0,
            next_message: 0,
            version: 0,
        }
    }

    /// Whether `run` is still the live run and has not been cancelled
    pub(crate) fn is_live(&self, run: &RunState) -> bool {
        !run.is_cancelled()
            && self
                .run
                .as_ref()
                .is_some_and(|current| current.generation == run.generation)
    }

    pub(crate) fn show_success(&mut self, text: String) -> u64 {
        self.next_message += 1;
        self.success = Some(SuccessMessage {
            serial: self.next_message,
            text,
        });
        self.next_message
    }

    fn cancel_run(&mut self) -> bool {
        let cancelled = match self.run.take() {
            Some(run) => {
                run.cancelled.store(true, Ordering::SeqCst);
                true
            }
            None => false,
        };
        self.status = RunStatus::Idle;
        self.roster.clear_all_speech();
        self.success = None;
        cancelled
    }

    fn snapshot(&mut self) -> Snapshot {
        self.version += 1;
        Snapshot {
            version: self.version,
            status: self.status,
            actors: self.roster.actors().to_vec(),
            active_actor: self.roster.active_id(),
            target: self.target.position,
            success_message: self.success.as_ref().map(|m| m.text.clone()),
            command_index: self.run.as_ref().map(|r| r.command_index),
            score: self.score,
        }
    }
}

pub(crate) struct Shared {
    pub(crate) config: EngineConfig,
    state: Mutex<SessionState>,
    snapshots: watch::Sender<Snapshot>,
    events: broadcast::Sender<RunEvent>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // Every step commits whole, so state behind a poisoned lock is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read state without publishing
    pub(crate) fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.lock())
    }

    /// Mutate state and publish the resulting snapshot
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let (result, snapshot) = {
            let mut state = self.lock();
            let result = f(&mut state);
            (result, state.snapshot())
        };
        self.publish(snapshot);
        result
    }

    /// Mutate state only while `run` is live
    ///
    /// The liveness check and the mutation happen under the same lock, so a
    /// concurrent `stop()` either lands before (nothing applied) or after.
    pub(crate) fn update_if_live<R>(
        &self,
        run: &RunState,
        f: impl FnOnce(&mut SessionState) -> R,
    ) -> Option<R> {
        let (result, snapshot) = {
            let mut state = self.lock();
            if !state.is_live(run) {
                return None;
            }
            let result = f(&mut state);
            (result, state.snapshot())
        };
        self.publish(snapshot);
        Some(result)
    }

    fn publish(&self, snapshot: Snapshot) {
        tracing::trace!("Publishing snapshot v{}", snapshot.version);
        // Writers race to publish after releasing the lock; keep the newest.
        self.snapshots.send_if_modified(|current| {
            if snapshot.version > current.version {
                *current = snapshot;
                true
            } else {
                false
            }
        });
    }

    pub(crate) fn emit(&self, event: RunEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

/// Handle to an in-flight run
pub struct RunHandle {
    generation: u64,
    join: JoinHandle<RunReport>,
}

impl RunHandle {
    /// Identifies this run among all runs of the session
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the run task to end and return its report
    pub async fn wait(self) -> Result<RunReport> {
        Ok(self.join.await?)
    }
}

/// A sandbox session: one stage, one script, at most one run at a time
///
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct Session {
    shared: Arc<Shared>,
}

impl Session {
    /// Create a session with the default theme's character and `config`
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let mut state = SessionState::new(&config);
        let (snapshots, _) = watch::channel(state.snapshot());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            shared: Arc::new(Shared {
                config,
                state: Mutex::new(state),
                snapshots,
                events,
            }),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    // === OUTBOUND ===

    pub fn snapshot(&self) -> Snapshot {
        self.shared.snapshots.borrow().clone()
    }

    /// Stream of committed state, latest value wins
    pub fn snapshots(&self) -> watch::Receiver<Snapshot> {
        self.shared.snapshots.subscribe()
    }

    /// Stream of run progress and score events
    pub fn events(&self) -> broadcast::Receiver<RunEvent> {
        self.shared.events.subscribe()
    }

    pub fn status(&self) -> RunStatus {
        self.shared.read(|s| s.status)
    }

    pub fn score(&self) -> u32 {
        self.shared.read(|s| s.score)
    }

    pub fn target(&self) -> Point {
        self.shared.read(|s| s.target.position)
    }

    pub fn success_message(&self) -> Option<String> {
        self.shared
            .read(|s| s.success.as_ref().map(|m| m.text.clone()))
    }

    // === SCRIPT EDITING ===

    pub fn add_command(&self, kind: CommandKind) -> CommandId {
        self.shared.update(|s| s.script.add(kind))
    }

    pub fn push_command(&self, command: Command) -> CommandId {
        self.shared.update(|s| s.script.push(command))
    }

    pub fn edit_command(&self, id: CommandId, field: CommandField, value: &str) -> bool {
        self.shared.update(|s| s.script.edit(id, field, value))
    }

    pub fn remove_command(&self, id: CommandId) -> bool {
        self.shared.update(|s| s.script.remove(id))
    }

    /// Replace the whole script
    pub fn load_script(&self, script: Script) {
        self.shared.update(|s| s.script = script);
    }

    /// Copy of the current script
    pub fn commands(&self) -> Script {
        self.shared.read(|s| s.script.clone())
    }

    // === ACTORS AND TARGET ===

    pub fn add_actor(&self, kind: impl Into<String>) -> ActorId {
        let kind = kind.into();
        let id = self.shared.update(|s| s.roster.add(kind));
        tracing::debug!("Added actor {}", id);
        id
    }

    /// Remove an actor; refused when it is the last one
    pub fn remove_actor(&self, id: ActorId) -> bool {
        self.shared.update(|s| s.roster.remove(id))
    }

    pub fn select_actor(&self, id: ActorId) -> bool {
        self.shared.update(|s| s.roster.select(id))
    }

    pub fn move_actor(&self, id: ActorId, position: Point) -> bool {
        self.shared.update(|s| s.roster.move_to(id, position))
    }

    pub fn set_speech(&self, id: ActorId, speech: Option<String>) -> bool {
        self.shared.update(|s| s.roster.set_speech(id, speech))
    }

    pub fn active_actor(&self) -> Option<Actor> {
        self.shared.read(|s| s.roster.active().cloned())
    }

    pub fn actor(&self, id: ActorId) -> Option<Actor> {
        self.shared.read(|s| s.roster.get(id).cloned())
    }

    pub fn actors(&self) -> Vec<Actor> {
        self.shared.read(|s| s.roster.actors().to_vec())
    }

    pub fn place_target(&self, position: Point) {
        self.shared.update(|s| s.target.position = position);
    }

    /// Switch level: stop, fresh roster with the theme's character, empty script
    pub fn select_theme(&self, theme: &Theme) -> ActorId {
        let id = self.shared.update(|s| {
            s.cancel_run();
            s.roster = Roster::new(theme.initial_character);
            s.script.clear();
            s.roster.active_id()
        });
        tracing::info!("Selected theme {} ({})", theme.id, theme.title);
        id
    }

    // === RUN CONTROL ===

    /// Start running the script against `actor`
    ///
    /// Returns `None` without touching any state when the script is empty, a
    /// run is already in progress, `actor` is not on the stage, or there is
    /// no Tokio runtime to drive the run. The actor becomes the active one.
    pub fn run(&self, actor: ActorId) -> Option<RunHandle> {
        let (run, commands, snapshot, runtime) = {
            let mut state = self.shared.lock();
            if state.status == RunStatus::Running || state.script.is_empty() {
                return None;
            }
            if !state.roster.contains(actor) {
                tracing::warn!("Run requested for unknown actor {}", actor);
                return None;
            }
            let Ok(runtime) = Handle::try_current() else {
                tracing::warn!("Run requested outside a Tokio runtime");
                return None;
            };
            state.roster.select(actor);

            state.next_generation += 1;
            let run = RunState {
                generation: state.next_generation,
                actor,
                command_index: 0,
                cancelled: Arc::new(AtomicBool::new(false)),
            };
            state.run = Some(run.clone());
            state.status = RunStatus::Running;
            (run, state.script.len(), state.snapshot(), runtime)
        };
        self.shared.publish(snapshot);

        tracing::info!(
            "Run {} started: {} commands for {}",
            run.generation,
            commands,
            actor
        );
        self.shared.emit(RunEvent::Started { actor, commands });

        let generation = run.generation;
        let join = runtime.spawn(execute(Arc::clone(&self.shared), run));
        Some(RunHandle { generation, join })
    }

    /// Run the script against whichever actor is active
    pub fn run_active(&self) -> Option<RunHandle> {
        let actor = self.shared.read(|s| s.roster.active_id());
        self.run(actor)
    }

    /// Cancel the current run, if any, and clear transient speech and messages
    ///
    /// Takes effect immediately. A run task suspended in a wait applies
    /// nothing further when it wakes. Returns whether a run was cancelled.
    pub fn stop(&self) -> bool {
        let cancelled = self.shared.update(SessionState::cancel_run);
        if cancelled {
            tracing::info!("Run stopped");
        }
        cancelled
    }

    /// Stop, send every actor back to the origin and zero the score
    pub fn reset(&self) {
        self.shared.update(|s| {
            s.cancel_run();
            s.roster.return_all_to_origin();
            s.score = 0;
        });
        tracing::info!("Session reset");
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}
