//! Battlefield geometry: sides, positions, formats, and slots.
//!
//! Slots are laid out on a two-row screen grid (foe row on top, ally row at the
//! bottom). Ally positions read left to right while foe positions are mirrored,
//! so each foe is drawn opposite the ally it faces. Adjacency is derived from
//! that grid: two distinct slots are adjacent when their screen columns differ
//! by at most one.
use arrayvec::ArrayVec;
use std::fmt;

use crate::error::ConfigError;

/// Maximum number of positions a side can field.
pub const MAX_POSITIONS: usize = 3;

/// Positions of one side, in layout order.
pub type PositionList = ArrayVec<FieldPosition, MAX_POSITIONS>;

/// Team relative to the local viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Ally,
    Foe,
}

impl Side {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Ally => Self::Foe,
            Self::Foe => Self::Ally,
        }
    }
}

/// Column a combatant occupies, named from its own side's perspective.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FieldPosition {
    Left,
    Center,
    Right,
}

/// Number and arrangement of active combatants per side.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BattleFormat {
    /// One combatant per side.
    #[default]
    Single,
    /// Two combatants per side (left, right).
    Double,
    /// Three combatants per side (left, center, right).
    Triple,
    /// Three combatants per side, only the center one acts and is targeted.
    Rotation,
}

impl BattleFormat {
    /// Parses a format name, surfacing unknown names as configuration errors.
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        name.parse()
            .map_err(|_| ConfigError::UnknownFormat(name.to_string()))
    }

    /// Positions a side can occupy in this format, in layout order.
    pub fn positions(self) -> PositionList {
        let mut list = PositionList::new();
        match self {
            Self::Single => list.push(FieldPosition::Center),
            Self::Double => {
                list.push(FieldPosition::Left);
                list.push(FieldPosition::Right);
            }
            Self::Triple | Self::Rotation => {
                list.push(FieldPosition::Left);
                list.push(FieldPosition::Center);
                list.push(FieldPosition::Right);
            }
        }
        list
    }

    /// Positions that take part in targeting.
    pub fn targetable_positions(self) -> PositionList {
        match self {
            Self::Rotation => {
                let mut list = PositionList::new();
                list.push(FieldPosition::Center);
                list
            }
            other => other.positions(),
        }
    }

    /// Number of combatants per side that choose an action each turn.
    pub fn active_count(self) -> usize {
        self.targetable_positions().len()
    }

    /// Width of the target selection grid.
    pub fn columns(self) -> u8 {
        self.targetable_positions().len() as u8
    }

    /// Whether confirming a move needs an interactive target pick.
    pub fn requires_target_selection(self) -> bool {
        self.columns() > 1
    }

    pub fn contains(self, position: FieldPosition) -> bool {
        self.positions().contains(&position)
    }

    pub fn is_targetable(self, position: FieldPosition) -> bool {
        self.targetable_positions().contains(&position)
    }

    /// Every targetable slot of both sides, foes first.
    pub fn slots(self) -> impl Iterator<Item = Slot> {
        let positions = self.targetable_positions();
        [Side::Foe, Side::Ally].into_iter().flat_map(move |side| {
            positions
                .clone()
                .into_iter()
                .map(move |position| Slot::new(side, position))
        })
    }

    /// Screen column of a targetable slot, or `None` when the slot is not targetable.
    pub fn screen_column(self, slot: Slot) -> Option<u8> {
        let positions = self.targetable_positions();
        let index = positions.iter().position(|&p| p == slot.position)? as u8;
        match slot.side {
            Side::Ally => Some(index),
            Side::Foe => Some(positions.len() as u8 - 1 - index),
        }
    }

    /// Targetable slot drawn at the given row and screen column.
    pub fn slot_at(self, side: Side, column: u8) -> Option<Slot> {
        let positions = self.targetable_positions();
        let width = positions.len() as u8;
        if column >= width {
            return None;
        }
        let index = match side {
            Side::Ally => column,
            Side::Foe => width - 1 - column,
        };
        Some(Slot::new(side, positions[index as usize]))
    }

    /// Whether two distinct targetable slots are adjacent.
    pub fn is_adjacent(self, a: Slot, b: Slot) -> bool {
        if a == b {
            return false;
        }
        match (self.screen_column(a), self.screen_column(b)) {
            (Some(ca), Some(cb)) => ca.abs_diff(cb) <= 1,
            _ => false,
        }
    }
}

/// One battlefield position, scoped to a side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot {
    pub side: Side,
    pub position: FieldPosition,
}

impl Slot {
    pub const fn new(side: Side, position: FieldPosition) -> Self {
        Self { side, position }
    }

    pub const fn ally(position: FieldPosition) -> Self {
        Self::new(Side::Ally, position)
    }

    pub const fn foe(position: FieldPosition) -> Self {
        Self::new(Side::Foe, position)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.side, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use FieldPosition::*;

    #[test]
    fn foe_columns_are_mirrored() {
        let format = BattleFormat::Triple;
        assert_eq!(format.screen_column(Slot::ally(Left)), Some(0));
        assert_eq!(format.screen_column(Slot::foe(Right)), Some(0));
        assert_eq!(format.screen_column(Slot::foe(Left)), Some(2));
        assert_eq!(format.slot_at(Side::Foe, 0), Some(Slot::foe(Right)));
        assert_eq!(format.slot_at(Side::Ally, 3), None);
    }

    #[test]
    fn doubles_everyone_is_adjacent() {
        let format = BattleFormat::Double;
        let slots: Vec<_> = format.slots().collect();
        assert_eq!(slots.len(), 4);
        for &a in &slots {
            for &b in &slots {
                assert_eq!(format.is_adjacent(a, b), a != b);
            }
        }
    }

    #[test]
    fn triples_far_columns_are_not_adjacent() {
        let format = BattleFormat::Triple;
        assert!(format.is_adjacent(Slot::ally(Left), Slot::ally(Center)));
        assert!(!format.is_adjacent(Slot::ally(Left), Slot::ally(Right)));
        assert!(format.is_adjacent(Slot::ally(Left), Slot::foe(Right)));
        assert!(format.is_adjacent(Slot::ally(Left), Slot::foe(Center)));
        assert!(!format.is_adjacent(Slot::ally(Left), Slot::foe(Left)));
        assert!(format.is_adjacent(Slot::ally(Center), Slot::foe(Left)));
    }

    #[test]
    fn rotation_targets_only_the_center() {
        let format = BattleFormat::Rotation;
        assert_eq!(format.positions().len(), 3);
        assert_eq!(format.active_count(), 1);
        assert!(!format.requires_target_selection());
        assert_eq!(format.screen_column(Slot::ally(Left)), None);
        assert!(format.is_adjacent(Slot::ally(Center), Slot::foe(Center)));
    }

    #[test]
    fn format_names_parse_case_insensitively() {
        assert_eq!(BattleFormat::parse("Triple"), Ok(BattleFormat::Triple));
        assert_eq!(
            BattleFormat::parse("quad"),
            Err(ConfigError::UnknownFormat("quad".into()))
        );
    }
}
