//! High-level runtime orchestrator for one battle.
//!
//! The runtime owns the engine handle, the event handshake, and the
//! simulation thread spawner, and exposes a builder-based API for frontends to
//! drive the battle.

use std::sync::Arc;

use tracing::info;

use crate::api::{ActionDecider, BattleEngine, RandomDecider, Result, RuntimeError};
use crate::events::{EventPump, PendingEvent, event_pump};
use crate::workers::{Invocation, SimulationSpawner};

/// Runtime configuration shared across the orchestrator and simulation threads.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Prefix for simulation thread names.
    pub thread_prefix: String,
    /// Seed for the default automated decider.
    pub decider_seed: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            thread_prefix: "battle-sim".to_string(),
            decider_seed: 0,
        }
    }
}

/// Runtime for a single battle.
///
/// Owned by the presentation thread. Dropping it closes the event pump, which
/// cancels any simulation thread still waiting on a release.
pub struct BattleRuntime {
    engine: Arc<dyn BattleEngine>,
    pump: EventPump,
    spawner: SimulationSpawner,
}

impl BattleRuntime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn engine(&self) -> &Arc<dyn BattleEngine> {
        &self.engine
    }

    /// Starts the battle on a simulation thread.
    pub fn begin(&mut self) -> Result<()> {
        info!(target: "runtime", format = %self.engine.format(), "starting battle");
        self.spawner.spawn(Invocation::Begin)
    }

    pub fn spawn(&mut self, invocation: Invocation) -> Result<()> {
        self.spawner.spawn(invocation)
    }

    pub fn next_pending(&mut self) -> Option<PendingEvent> {
        self.pump.next_pending()
    }

    pub fn release(&mut self) -> bool {
        self.pump.release()
    }

    pub fn is_holding(&self) -> bool {
        self.pump.is_holding()
    }

    pub fn in_flight(&mut self) -> usize {
        self.spawner.in_flight()
    }
}

/// Builder for [`BattleRuntime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    engine: Option<Arc<dyn BattleEngine>>,
    decider: Option<Arc<dyn ActionDecider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            engine: None,
            decider: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required simulation engine
    pub fn engine(mut self, engine: Arc<dyn BattleEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Set the decider for automated sides (defaults to a seeded [`RandomDecider`])
    pub fn decider(mut self, decider: impl ActionDecider + 'static) -> Self {
        self.decider = Some(Arc::new(decider));
        self
    }

    /// Build the runtime
    pub fn build(self) -> Result<BattleRuntime> {
        let engine = self.engine.ok_or(RuntimeError::MissingEngine)?;
        let decider = self
            .decider
            .unwrap_or_else(|| Arc::new(RandomDecider::seeded(self.config.decider_seed)));

        let (publisher, pump) = event_pump();
        let spawner = SimulationSpawner::new(
            Arc::clone(&engine),
            decider,
            publisher,
            self.config.thread_prefix,
        );

        Ok(BattleRuntime {
            engine,
            pump,
            spawner,
        })
    }
}
