//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration or thread management.

pub mod engine;
pub mod errors;
pub mod providers;

pub use engine::{BattleEngine, Controller, bench, slot_of};
pub use errors::{Result, RuntimeError, SubmissionKind};
pub use providers::{ActionDecider, FirstChoiceDecider, RandomDecider};
