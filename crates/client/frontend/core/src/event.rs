//! Frame-level bookkeeping shared by the dispatcher and the session.
use std::time::Duration;

use battle_core::{BattleResult, CombatantId, RevealKind, Slot};

/// Whether a frame changed anything a frontend should redraw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventImpact {
    pub requires_redraw: bool,
}

impl EventImpact {
    pub const fn none() -> Self {
        Self {
            requires_redraw: false,
        }
    }

    pub const fn redraw() -> Self {
        Self {
            requires_redraw: true,
        }
    }

    pub fn combine(self, other: Self) -> Self {
        Self {
            requires_redraw: self.requires_redraw || other.requires_redraw,
        }
    }
}

/// Input gathered by the frontend for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Time since the previous frame.
    pub elapsed: Duration,
    /// The player pressed the confirm key this frame.
    pub acknowledge: bool,
}

impl FrameInput {
    pub const fn new(elapsed: Duration, acknowledge: bool) -> Self {
        Self {
            elapsed,
            acknowledge,
        }
    }
}

/// Side effects a renderer applies to its scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresentationCommand {
    AttachVisual { slot: Slot, combatant: CombatantId },
    DetachVisual { slot: Slot },
    /// Post-faint bookkeeping (friendship and the like) for the combatant.
    RecordFaint { combatant: CombatantId },
    RevealSprite { combatant: CombatantId, kind: RevealKind },
    BeginClosing { result: BattleResult },
}
