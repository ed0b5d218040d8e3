use std::fmt;

use crate::field::FieldPosition;
use crate::targeting::MoveTarget;

/// Opaque handle into the simulation engine's roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u8);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveId(pub u16);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u16);

/// What the presentation layer may know about a combatant.
///
/// Only identity and the flags needed to judge menu legality are exposed;
/// stats and formulas stay inside the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantInfo {
    pub id: CombatantId,
    pub name: String,
    pub fainted: bool,
    /// Position on the field, `None` while on the bench.
    pub position: Option<FieldPosition>,
}

impl CombatantInfo {
    pub fn new(id: CombatantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            fainted: false,
            position: None,
        }
    }

    #[must_use]
    pub fn at(mut self, position: FieldPosition) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn fainted(mut self) -> Self {
        self.fainted = true;
        self
    }

    pub fn is_active(&self) -> bool {
        self.position.is_some()
    }
}

/// A move a combatant may pick this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveSlot {
    pub move_id: MoveId,
    pub pp: u8,
    pub target: MoveTarget,
}

impl MoveSlot {
    pub const fn new(move_id: MoveId, pp: u8, target: MoveTarget) -> Self {
        Self {
            move_id,
            pp,
            target,
        }
    }

    pub const fn usable(&self) -> bool {
        self.pp > 0
    }
}
