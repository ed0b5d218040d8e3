//! Data model and targeting rules shared by the battle runtime and frontends.
//!
//! `battle-core` owns the vocabulary exchanged across the engine boundary
//! (slots, formats, turn actions, packets, phases) and the pure
//! [`targeting::resolve_targets`] algorithm used both by the target selection
//! screen and by automated deciders. Nothing here spawns threads or performs
//! I/O.
pub mod action;
pub mod combatant;
pub mod error;
pub mod field;
pub mod packet;
pub mod targeting;

pub use action::{ActionEntry, SwitchEntry, TurnAction};
pub use combatant::{CombatantId, CombatantInfo, ItemId, MoveId, MoveSlot};
pub use error::ConfigError;
pub use field::{BattleFormat, FieldPosition, MAX_POSITIONS, PositionList, Side, Slot};
pub use packet::{BattlePhase, BattleResult, Effectiveness, Packet, RevealKind, StatusKind};
pub use targeting::{
    Connectors, CursorRow, MoveTarget, SlotTargeting, TargetCursor, TargetLayout, TargetMask,
    resolve_targets,
};
