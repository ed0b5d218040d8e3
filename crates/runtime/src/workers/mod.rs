//! Simulation threads that back the runtime orchestration.
//!
//! Engine calls run on short-lived OS threads so the presentation thread
//! never blocks on the handshake.

mod simulation;

pub use simulation::{Invocation, SimulationSpawner};
