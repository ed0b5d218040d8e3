//! Simulation threads that call into the [`BattleEngine`].
//!
//! Every engine call that may publish packets runs on its own named OS thread,
//! since publishing blocks until the presentation thread releases the packet.
//! The presentation thread describes the call as an [`Invocation`] and never
//! waits for the thread to finish.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use battle_core::{ActionEntry, Side, SwitchEntry};
use tracing::{debug, error, warn};

use crate::api::{ActionDecider, BattleEngine, Result, RuntimeError, SubmissionKind};
use crate::events::EventPublisher;

/// One engine call to run on a fresh simulation thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    Begin,
    RunTurn,
    RunSwitches,
    SubmitActions {
        side: Side,
        actions: Vec<ActionEntry>,
    },
    SubmitSwitches {
        side: Side,
        switches: Vec<SwitchEntry>,
    },
    Flee {
        side: Side,
    },
    /// Let the side's automated decider choose, then submit its actions.
    DecideActions {
        side: Side,
    },
    DecideSwitches {
        side: Side,
        count: u8,
    },
}

impl Invocation {
    pub const fn label(&self) -> &'static str {
        match self {
            Invocation::Begin => "begin",
            Invocation::RunTurn => "run-turn",
            Invocation::RunSwitches => "run-switches",
            Invocation::SubmitActions { .. } => "submit-actions",
            Invocation::SubmitSwitches { .. } => "submit-switches",
            Invocation::Flee { .. } => "flee",
            Invocation::DecideActions { .. } => "decide-actions",
            Invocation::DecideSwitches { .. } => "decide-switches",
        }
    }
}

/// Starts simulation threads for one battle.
///
/// Threads are detached: dropping the spawner (or the whole session) does not
/// wait for them. A thread blocked on a publish unwinds with
/// [`RuntimeError::PumpClosed`] once the pump is dropped.
pub struct SimulationSpawner {
    engine: Arc<dyn BattleEngine>,
    decider: Arc<dyn ActionDecider>,
    publisher: EventPublisher,
    thread_prefix: String,
    threads: Vec<JoinHandle<()>>,
    spawned: u64,
}

impl SimulationSpawner {
    pub fn new(
        engine: Arc<dyn BattleEngine>,
        decider: Arc<dyn ActionDecider>,
        publisher: EventPublisher,
        thread_prefix: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            decider,
            publisher,
            thread_prefix: thread_prefix.into(),
            threads: Vec::new(),
            spawned: 0,
        }
    }

    /// Runs `invocation` on a new simulation thread.
    pub fn spawn(&mut self, invocation: Invocation) -> Result<()> {
        self.reap();

        let name = format!(
            "{}-{}-{}",
            self.thread_prefix,
            self.spawned,
            invocation.label()
        );
        debug!(target: "runtime::worker", thread = %name, "spawning simulation thread");

        let engine = Arc::clone(&self.engine);
        let decider = Arc::clone(&self.decider);
        let publisher = self.publisher.clone();
        let handle = thread::Builder::new()
            .name(name)
            .spawn(move || run(&*engine, &*decider, &publisher, invocation))
            .map_err(RuntimeError::ThreadSpawn)?;

        self.spawned += 1;
        self.threads.push(handle);
        Ok(())
    }

    /// Simulation threads still running.
    pub fn in_flight(&mut self) -> usize {
        self.reap();
        self.threads.len()
    }

    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Joins finished threads so panics on simulation threads get logged.
    fn reap(&mut self) {
        let (finished, running): (Vec<_>, Vec<_>) = self
            .threads
            .drain(..)
            .partition(|handle| handle.is_finished());
        self.threads = running;

        for handle in finished {
            let name = handle.thread().name().unwrap_or("simulation").to_string();
            if handle.join().is_err() {
                error!(target: "runtime::worker", thread = %name, "simulation thread panicked");
            }
        }
    }
}

fn run(
    engine: &dyn BattleEngine,
    decider: &dyn ActionDecider,
    publisher: &EventPublisher,
    invocation: Invocation,
) {
    let label = invocation.label();
    match handle_invocation(engine, decider, publisher, invocation) {
        Ok(()) => {
            debug!(target: "runtime::worker", invocation = label, "simulation call finished")
        }
        Err(RuntimeError::PumpClosed) => {
            debug!(
                target: "runtime::worker",
                invocation = label,
                "simulation call cancelled (pump closed)"
            )
        }
        Err(err @ RuntimeError::SubmissionRejected { .. }) => {
            warn!(
                target: "runtime::worker",
                invocation = label,
                error = %err,
                "submission rejected"
            )
        }
        Err(err) => {
            error!(
                target: "runtime::worker",
                invocation = label,
                error = %err,
                "simulation call failed"
            )
        }
    }
}

fn handle_invocation(
    engine: &dyn BattleEngine,
    decider: &dyn ActionDecider,
    publisher: &EventPublisher,
    invocation: Invocation,
) -> Result<()> {
    match invocation {
        Invocation::Begin => engine.begin(publisher),
        Invocation::RunTurn => engine.run_turn(publisher),
        Invocation::RunSwitches => engine.run_switches(publisher),
        Invocation::SubmitActions { side, actions } => {
            submit_actions(engine, publisher, side, &actions)
        }
        Invocation::SubmitSwitches { side, switches } => {
            submit_switches(engine, publisher, side, &switches)
        }
        Invocation::Flee { side } => {
            if engine.select_flee_if_valid(side, publisher)? {
                Ok(())
            } else {
                Err(RuntimeError::SubmissionRejected {
                    kind: SubmissionKind::Flee,
                    side,
                })
            }
        }
        Invocation::DecideActions { side } => {
            let actions = decider.decide_actions(engine, side)?;
            submit_actions(engine, publisher, side, &actions)
        }
        Invocation::DecideSwitches { side, count } => {
            let switches = decider.decide_switches(engine, side, count)?;
            submit_switches(engine, publisher, side, &switches)
        }
    }
}

fn submit_actions(
    engine: &dyn BattleEngine,
    publisher: &EventPublisher,
    side: Side,
    actions: &[ActionEntry],
) -> Result<()> {
    debug!(target: "runtime::worker", %side, count = actions.len(), "submitting actions");
    if engine.select_actions_if_valid(side, actions, publisher)? {
        Ok(())
    } else {
        Err(RuntimeError::SubmissionRejected {
            kind: SubmissionKind::Actions,
            side,
        })
    }
}

fn submit_switches(
    engine: &dyn BattleEngine,
    publisher: &EventPublisher,
    side: Side,
    switches: &[SwitchEntry],
) -> Result<()> {
    debug!(target: "runtime::worker", %side, count = switches.len(), "submitting switches");
    if engine.select_switches_if_valid(side, switches, publisher)? {
        Ok(())
    } else {
        Err(RuntimeError::SubmissionRejected {
            kind: SubmissionKind::Switches,
            side,
        })
    }
}
