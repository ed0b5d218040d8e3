//! Discrete events emitted by the simulation engine and the phase notices that
//! accompany them.
//!
//! Packets arrive strictly in order, one at a time, and the engine blocks after
//! each one until the presentation layer has finished showing it.
use crate::combatant::{CombatantId, ItemId, MoveId};
use crate::field::{FieldPosition, Side, Slot};

/// Non-volatile or volatile status a combatant can gain or lose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum StatusKind {
    Burned,
    Frozen,
    Paralyzed,
    Poisoned,
    Asleep,
    Confused,
}

/// How effective a hit was.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effectiveness {
    Ineffective,
    NotVeryEffective,
    SuperEffective,
}

/// Kind of identity change revealed with a pixelation-style animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RevealKind {
    /// A disguise (illusion) broke.
    Disguise,
    /// The combatant transformed into a copy of another.
    Transform { into: CombatantId },
    /// The combatant changed form.
    FormChange,
}

/// Outcome of a finished battle, from the local viewer's perspective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum BattleResult {
    Won,
    Lost,
    Fled,
    Draw,
}

/// One simulation event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Packet {
    // Silent state updates
    PpChanged {
        combatant: CombatantId,
        move_id: MoveId,
        pp: u8,
    },
    MoveLockChanged {
        combatant: CombatantId,
        locked: Option<MoveId>,
    },

    // Requests
    ActionsRequest {
        side: Side,
    },
    SwitchInRequest {
        side: Side,
        count: u8,
    },

    // Visible events
    TurnBegan {
        turn: u32,
    },
    SwitchedIn {
        side: Side,
        combatant: CombatantId,
        position: FieldPosition,
    },
    MoveUsed {
        combatant: CombatantId,
        move_id: MoveId,
    },
    MoveMissed {
        combatant: CombatantId,
        target: CombatantId,
    },
    Damaged {
        combatant: CombatantId,
        amount: u16,
        remaining: u16,
    },
    Healed {
        combatant: CombatantId,
        amount: u16,
    },
    Effectiveness {
        target: CombatantId,
        effectiveness: Effectiveness,
    },
    StatusChanged {
        combatant: CombatantId,
        status: StatusKind,
        applied: bool,
    },
    ItemUsed {
        side: Side,
        item_id: ItemId,
        target: CombatantId,
    },
    Fainted {
        combatant: CombatantId,
        slot: Slot,
    },
    Revealed {
        combatant: CombatantId,
        kind: RevealKind,
    },
    FleeFailed {
        side: Side,
    },
    /// Free-form text the engine wants shown verbatim.
    Text {
        text: String,
    },
    BattleResult {
        result: BattleResult,
    },
}

impl Packet {
    /// Packets that change engine-side bookkeeping without any visible reaction.
    pub const fn is_silent(&self) -> bool {
        matches!(self, Self::PpChanged { .. } | Self::MoveLockChanged { .. })
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PpChanged { .. } => "pp_changed",
            Self::MoveLockChanged { .. } => "move_lock_changed",
            Self::ActionsRequest { .. } => "actions_request",
            Self::SwitchInRequest { .. } => "switch_in_request",
            Self::TurnBegan { .. } => "turn_began",
            Self::SwitchedIn { .. } => "switched_in",
            Self::MoveUsed { .. } => "move_used",
            Self::MoveMissed { .. } => "move_missed",
            Self::Damaged { .. } => "damaged",
            Self::Healed { .. } => "healed",
            Self::Effectiveness { .. } => "effectiveness",
            Self::StatusChanged { .. } => "status_changed",
            Self::ItemUsed { .. } => "item_used",
            Self::Fainted { .. } => "fainted",
            Self::Revealed { .. } => "revealed",
            Self::FleeFailed { .. } => "flee_failed",
            Self::Text { .. } => "text",
            Self::BattleResult { .. } => "battle_result",
        }
    }
}

/// Processing stage announced by the engine.
///
/// A simulation thread exits right after announcing a phase, so notices are
/// fire-and-forget and the presentation layer starts the next invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    ReadyToBegin,
    WaitingForActions,
    ReadyToRunTurn,
    WaitingForSwitchIns,
    ReadyToRunSwitches,
    Ended(BattleResult),
}

impl BattlePhase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ReadyToBegin => "ready_to_begin",
            Self::WaitingForActions => "waiting_for_actions",
            Self::ReadyToRunTurn => "ready_to_run_turn",
            Self::WaitingForSwitchIns => "waiting_for_switch_ins",
            Self::ReadyToRunSwitches => "ready_to_run_switches",
            Self::Ended(_) => "ended",
        }
    }
}
