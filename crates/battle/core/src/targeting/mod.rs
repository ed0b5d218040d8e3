//! Move targeting: categories, slot masks, and the per-slot layout that the
//! target selection screen presents.
//!
//! The resolver is a pure function of (format, requester, category,
//! restriction). For every targetable slot it decides whether the slot can be
//! confirmed, which slots a confirmation would actually hit, which connector
//! lines to draw, and where the cursor starts.
mod resolver;

pub use resolver::resolve_targets;

use bitflags::bitflags;

use crate::error::ConfigError;
use crate::field::{BattleFormat, FieldPosition, Side, Slot};

/// Abstract rule describing which slots a move can hit.
#[derive(
    Clone,
    Copy,
    Debug,
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
pub enum MoveTarget {
    /// Every combatant on the field, including the user.
    All,
    /// Every opposing combatant.
    AllFoes,
    /// Every opposing combatant adjacent to the user.
    AllFoesSurrounding,
    /// Every combatant adjacent to the user, on both sides.
    AllSurrounding,
    /// The user and all of its allies.
    AllTeam,
    /// One adjacent opponent picked by the engine.
    RandomFoeSurrounding,
    /// The user only.
    #[strum(to_string = "self", serialize = "self_target")]
    SelfTarget,
    /// The user or one adjacent ally.
    SelfOrAllySurrounding,
    /// One adjacent ally.
    SingleAllySurrounding,
    /// One adjacent opponent.
    SingleFoeSurrounding,
    /// Any one combatant other than the user.
    SingleNotSelf,
    /// Any one adjacent combatant.
    SingleSurrounding,
    /// Decided by the engine when the move executes.
    Varies,
}

impl MoveTarget {
    /// Parses a category name; unknown names mean the move data is malformed.
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        name.parse()
            .map_err(|_| ConfigError::UnknownMoveTarget(name.to_string()))
    }

    /// Categories where one confirmation commits to several slots at once.
    pub const fn is_multi(self) -> bool {
        matches!(
            self,
            Self::All
                | Self::AllFoes
                | Self::AllFoesSurrounding
                | Self::AllSurrounding
                | Self::AllTeam
                | Self::RandomFoeSurrounding
        )
    }

    /// Whether the cursor should open on the opposing row.
    pub const fn prefers_foes(self) -> bool {
        matches!(
            self,
            Self::All
                | Self::AllFoes
                | Self::AllFoesSurrounding
                | Self::AllSurrounding
                | Self::RandomFoeSurrounding
                | Self::SingleFoeSurrounding
                | Self::SingleNotSelf
                | Self::SingleSurrounding
        )
    }
}

bitflags! {
    /// Set of slots hit by a move, in absolute (viewer-relative) terms.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TargetMask: u8 {
        const ALLY_LEFT   = 1 << 0;
        const ALLY_CENTER = 1 << 1;
        const ALLY_RIGHT  = 1 << 2;
        const FOE_LEFT    = 1 << 3;
        const FOE_CENTER  = 1 << 4;
        const FOE_RIGHT   = 1 << 5;
    }
}

impl TargetMask {
    /// Mask containing exactly one slot.
    pub const fn of(slot: Slot) -> Self {
        Self::from_bits_retain(1 << slot_index(slot))
    }

    pub fn from_slots(slots: impl IntoIterator<Item = Slot>) -> Self {
        slots
            .into_iter()
            .fold(Self::empty(), |mask, slot| mask | Self::of(slot))
    }

    pub const fn contains_slot(self, slot: Slot) -> bool {
        self.contains(Self::of(slot))
    }

    /// Slots in the mask, allies first, left to right.
    pub fn slots(self) -> impl Iterator<Item = Slot> {
        ALL_SLOTS
            .into_iter()
            .filter(move |&slot| self.contains_slot(slot))
    }
}

bitflags! {
    /// Connector lines drawn from one slot towards its screen neighbours.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Connectors: u8 {
        const LEFT  = 1 << 0;
        const RIGHT = 1 << 1;
        const UP    = 1 << 2;
        const DOWN  = 1 << 3;
    }
}

/// Row of the target selection grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CursorRow {
    Foe,
    Ally,
    /// The always-present cancel button.
    Back,
}

impl CursorRow {
    pub const fn of_side(side: Side) -> Self {
        match side {
            Side::Ally => Self::Ally,
            Side::Foe => Self::Foe,
        }
    }

    pub const fn side(self) -> Option<Side> {
        match self {
            Self::Ally => Some(Side::Ally),
            Self::Foe => Some(Side::Foe),
            Self::Back => None,
        }
    }
}

/// Cursor on the target grid. On the back row `column` remembers where the
/// cursor came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetCursor {
    pub row: CursorRow,
    pub column: u8,
}

impl TargetCursor {
    pub const fn new(row: CursorRow, column: u8) -> Self {
        Self { row, column }
    }

    pub const fn back(column: u8) -> Self {
        Self::new(CursorRow::Back, column)
    }

    pub const fn is_back(&self) -> bool {
        matches!(self.row, CursorRow::Back)
    }
}

/// Presentation state of one slot for the current move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotTargeting {
    pub enabled: bool,
    /// Slots hit when this slot is confirmed. Empty when disabled.
    pub targets: TargetMask,
    pub connectors: Connectors,
}

/// Resolved targeting for one move of one requester.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetLayout {
    format: BattleFormat,
    requester: Slot,
    category: MoveTarget,
    slots: [SlotTargeting; SLOT_COUNT],
    initial_cursor: TargetCursor,
}

impl TargetLayout {
    pub const fn format(&self) -> BattleFormat {
        self.format
    }

    pub const fn requester(&self) -> Slot {
        self.requester
    }

    pub const fn category(&self) -> MoveTarget {
        self.category
    }

    pub const fn initial_cursor(&self) -> TargetCursor {
        self.initial_cursor
    }

    /// Targeting of a slot. Slots outside the format are reported disabled.
    pub fn slot(&self, slot: Slot) -> SlotTargeting {
        self.slots[slot_index(slot)]
    }

    pub fn is_enabled(&self, slot: Slot) -> bool {
        self.slot(slot).enabled
    }

    /// Mask committed when `slot` is confirmed, if it can be confirmed.
    pub fn targets_for(&self, slot: Slot) -> Option<TargetMask> {
        let targeting = self.slot(slot);
        targeting.enabled.then_some(targeting.targets)
    }

    pub fn enabled_slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.format.slots().filter(|&slot| self.is_enabled(slot))
    }

    pub fn enabled_mask(&self) -> TargetMask {
        TargetMask::from_slots(self.enabled_slots())
    }

    pub fn has_targets(&self) -> bool {
        self.enabled_slots().next().is_some()
    }

    /// Slot under a cursor, if the cursor is on an enabled slot.
    pub fn slot_at_cursor(&self, cursor: TargetCursor) -> Option<Slot> {
        let side = cursor.row.side()?;
        let slot = self.format.slot_at(side, cursor.column)?;
        self.is_enabled(slot).then_some(slot)
    }

    /// Targets used when no interactive selection takes place.
    ///
    /// The cursor's default slot decides; with nothing enabled the requester's
    /// own slot is submitted and the engine reports the failure.
    pub fn implicit_targets(&self) -> TargetMask {
        self.slot_at_cursor(self.initial_cursor)
            .or_else(|| self.enabled_slots().next())
            .and_then(|slot| self.targets_for(slot))
            .unwrap_or_else(|| TargetMask::of(self.requester))
    }
}

pub(crate) const SLOT_COUNT: usize = 6;

const ALL_SLOTS: [Slot; SLOT_COUNT] = [
    Slot::ally(FieldPosition::Left),
    Slot::ally(FieldPosition::Center),
    Slot::ally(FieldPosition::Right),
    Slot::foe(FieldPosition::Left),
    Slot::foe(FieldPosition::Center),
    Slot::foe(FieldPosition::Right),
];

const fn slot_index(slot: Slot) -> usize {
    let side = match slot.side {
        Side::Ally => 0,
        Side::Foe => 3,
    };
    let position = match slot.position {
        FieldPosition::Left => 0,
        FieldPosition::Center => 1,
        FieldPosition::Right => 2,
    };
    side + position
}
