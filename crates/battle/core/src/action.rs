//! Turn actions handed from the presentation layer to the engine.
use crate::combatant::{CombatantId, ItemId, MoveId};
use crate::field::FieldPosition;
use crate::targeting::TargetMask;

/// The single choice made for one active combatant this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnAction {
    Move { move_id: MoveId, targets: TargetMask },
    Item { item_id: ItemId },
    Switch { incoming: CombatantId },
}

impl TurnAction {
    pub const fn switch_target(&self) -> Option<CombatantId> {
        match self {
            Self::Switch { incoming } => Some(*incoming),
            _ => None,
        }
    }
}

/// A [`TurnAction`] bound to the combatant that performs it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionEntry {
    pub combatant: CombatantId,
    pub action: TurnAction,
}

impl ActionEntry {
    pub const fn new(combatant: CombatantId, action: TurnAction) -> Self {
        Self { combatant, action }
    }
}

/// A bench combatant sent into an empty position after a faint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwitchEntry {
    pub combatant: CombatantId,
    pub position: FieldPosition,
}

impl SwitchEntry {
    pub const fn new(combatant: CombatantId, position: FieldPosition) -> Self {
        Self {
            combatant,
            position,
        }
    }
}
