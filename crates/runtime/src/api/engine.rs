//! Boundary to the battle simulation engine.
//!
//! The engine computes outcomes and owns all battle state; the runtime only
//! queries what menus need to judge legality and invokes entry points on
//! simulation threads. Entry points receive the session's [`EventPublisher`]
//! and report progress exclusively through it.
use battle_core::{
    ActionEntry, BattleFormat, CombatantId, CombatantInfo, ItemId, MoveId, MoveSlot,
    PositionList, Side, Slot, SwitchEntry, TargetMask, TurnAction,
};

use super::errors::{Result, RuntimeError};
use crate::events::EventPublisher;

/// Who picks actions for a side.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Controller {
    /// The player in front of this frontend.
    Local,
    /// An automated opponent driven by an [`ActionDecider`](super::ActionDecider).
    Automated,
}

/// Simulation engine queried from the presentation thread and driven from
/// simulation threads.
///
/// Implementations must not hold internal locks while calling
/// [`EventPublisher::publish`]: the presentation thread keeps querying the
/// engine while it shows the packet, and would deadlock otherwise.
pub trait BattleEngine: Send + Sync {
    fn format(&self) -> BattleFormat;

    fn controller(&self, side: Side) -> Controller;

    /// Active combatants of a side that choose an action, in slot order.
    fn active(&self, side: Side) -> Vec<CombatantId>;

    /// Whole party of a side, active members included.
    fn party(&self, side: Side) -> Vec<CombatantInfo>;

    fn combatant(&self, id: CombatantId) -> Option<CombatantInfo>;

    fn moves(&self, id: CombatantId) -> Vec<MoveSlot>;

    /// Items the side may use this turn.
    fn items(&self, _side: Side) -> Vec<ItemId> {
        Vec::new()
    }

    /// Action the combatant is locked into (recharging, continuing a move).
    fn forced_action(&self, id: CombatantId) -> Option<TurnAction>;

    /// Slots the combatant's next move is restricted to, if any.
    fn target_restriction(&self, id: CombatantId) -> Option<TargetMask>;

    fn can_switch_out(&self, id: CombatantId) -> bool;

    fn can_flee(&self, side: Side) -> bool;

    /// Empty positions waiting for a replacement.
    fn open_positions(&self, side: Side) -> PositionList;

    fn move_name(&self, id: MoveId) -> String;

    fn item_name(&self, id: ItemId) -> String;

    fn begin(&self, events: &EventPublisher) -> Result<()>;

    fn run_turn(&self, events: &EventPublisher) -> Result<()>;

    fn run_switches(&self, events: &EventPublisher) -> Result<()>;

    /// Records a side's actions. Returns `false` when the engine refused them.
    fn select_actions_if_valid(
        &self,
        side: Side,
        actions: &[ActionEntry],
        events: &EventPublisher,
    ) -> Result<bool>;

    fn select_switches_if_valid(
        &self,
        side: Side,
        switches: &[SwitchEntry],
        events: &EventPublisher,
    ) -> Result<bool>;

    fn select_flee_if_valid(&self, side: Side, events: &EventPublisher) -> Result<bool>;
}

/// Field slot of an active combatant.
pub fn slot_of(engine: &dyn BattleEngine, side: Side, id: CombatantId) -> Result<Slot> {
    engine
        .combatant(id)
        .and_then(|info| info.position)
        .map(|position| Slot::new(side, position))
        .ok_or(RuntimeError::NotActive { combatant: id })
}

/// Healthy bench members that may be sent in.
pub fn bench(engine: &dyn BattleEngine, side: Side) -> Vec<CombatantId> {
    engine
        .party(side)
        .into_iter()
        .filter(|info| !info.fainted && !info.is_active())
        .map(|info| info.id)
        .collect()
}
