//! Runtime orchestration between the battle simulation engine and a
//! single-threaded presentation loop.
//!
//! This crate wires together the engine boundary, automated deciders, the
//! blocking event handshake, and simulation threads into a cohesive runtime
//! API. Frontends embed [`BattleRuntime`] to start engine calls, poll pending
//! events once per frame, and release the simulation after presenting them.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the engine and decider traits plus errors
//! - [`events`] provides the one-packet-at-a-time handshake
//! - [`workers`] keeps simulation thread management internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{
    ActionDecider, BattleEngine, Controller, FirstChoiceDecider, RandomDecider, Result,
    RuntimeError, SubmissionKind,
};
pub use events::{EventPublisher, EventPump, PendingEvent, event_pump};
pub use runtime::{BattleRuntime, RuntimeBuilder, RuntimeConfig};
pub use workers::{Invocation, SimulationSpawner};
