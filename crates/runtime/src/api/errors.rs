//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the event handshake, engine submissions, automated
//! deciders, and simulation thread management so callers can bubble them up
//! with consistent context.
use std::fmt;

use battle_core::{CombatantId, ConfigError, Side};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The presentation side dropped its pump; the simulation thread should
    /// unwind instead of waiting for a release that will never come.
    #[error("event pump closed before the packet was released")]
    PumpClosed,

    #[error("engine rejected {kind} submitted for the {side} side")]
    SubmissionRejected { kind: SubmissionKind, side: Side },

    #[error("combatant {combatant} is not on the field")]
    NotActive { combatant: CombatantId },

    #[error("combatant {combatant} has no legal action")]
    NoLegalAction { combatant: CombatantId },

    #[error("not enough healthy bench combatants on the {side} side to fill {count} positions")]
    NoReplacements { side: Side, count: u8 },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to spawn simulation thread")]
    ThreadSpawn(#[source] std::io::Error),

    #[error("runtime requires an engine to be configured before building")]
    MissingEngine,
}

/// What a rejected submission carried.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SubmissionKind {
    Actions,
    Switches,
    Flee,
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubmissionKind::Actions => "actions",
            SubmissionKind::Switches => "switches",
            SubmissionKind::Flee => "flee",
        };
        write!(f, "{}", label)
    }
}
