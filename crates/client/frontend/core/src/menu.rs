//! Menu options and the legality checks behind them.
//!
//! A refused choice is never an error: it yields a [`Rejection`] whose text is
//! shown to the player while the menu stays exactly as it was.
use battle_core::{
    CombatantId, CombatantInfo, FieldPosition, ItemId, MoveId, MoveSlot, MoveTarget, Side,
};
use battle_runtime::BattleEngine;
use thiserror::Error;

use crate::builders::{ActionsBuilder, SwitchesBuilder};

/// A user-correctable refusal, worded for the player.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("There's no PP left for {move_name}!")]
    NoPp { move_name: String },
    #[error("{name} can't be switched out!")]
    Trapped { name: String },
    #[error("{name} is already in battle!")]
    AlreadyActive { name: String },
    #[error("{name} has no energy left to battle!")]
    Fainted { name: String },
    #[error("{name} is already going in!")]
    StandingBy { name: String },
    #[error("You can't escape!")]
    CannotFlee,
    #[error("The {position} position is already taken!")]
    PositionTaken { position: FieldPosition },
    #[error("That option isn't available.")]
    NoSuchOption,
    #[error("There's nothing to take back.")]
    NothingToUndo,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOption {
    pub move_id: MoveId,
    pub name: String,
    pub pp: u8,
    pub target: MoveTarget,
    pub enabled: bool,
}

/// A party member as offered by a switch or replacement menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwitchOption {
    pub combatant: CombatantId,
    pub name: String,
    pub fainted: bool,
    pub active: bool,
    pub standing_by: bool,
}

impl SwitchOption {
    fn new(info: &CombatantInfo, standing_by: bool) -> Self {
        Self {
            combatant: info.id,
            name: info.name.clone(),
            fainted: info.fainted,
            active: info.is_active(),
            standing_by,
        }
    }

    pub fn enabled(&self) -> bool {
        !self.fainted && !self.active && !self.standing_by
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemOption {
    pub item_id: ItemId,
    pub name: String,
}

/// Everything the player may pick for the combatant whose turn it is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionMenu {
    pub side: Side,
    pub index: usize,
    pub combatant: CombatantId,
    pub name: String,
    pub moves: Vec<MoveOption>,
    pub switches: Vec<SwitchOption>,
    pub items: Vec<ItemOption>,
    /// Switch options are shown disabled while this is false.
    pub can_switch: bool,
    pub can_flee: bool,
    pub can_undo: bool,
}

impl ActionMenu {
    /// Menu for the builder's current slot, `None` once it is complete.
    pub fn build(engine: &dyn BattleEngine, builder: &ActionsBuilder) -> Option<Self> {
        let combatant = builder.current()?;
        let side = builder.side();
        let moves = engine
            .moves(combatant)
            .into_iter()
            .map(|slot| MoveOption {
                move_id: slot.move_id,
                name: engine.move_name(slot.move_id),
                pp: slot.pp,
                target: slot.target,
                enabled: slot.usable(),
            })
            .collect();
        let switches = engine
            .party(side)
            .iter()
            .map(|info| SwitchOption::new(info, builder.is_standby(info.id)))
            .collect();
        let items = engine
            .items(side)
            .into_iter()
            .map(|item_id| ItemOption {
                item_id,
                name: engine.item_name(item_id),
            })
            .collect();

        Some(Self {
            side,
            index: builder.index(),
            combatant,
            name: display_name(engine, combatant),
            moves,
            switches,
            items,
            can_switch: engine.can_switch_out(combatant),
            can_flee: engine.can_flee(side),
            can_undo: builder.can_pop(),
        })
    }
}

/// Bench candidates and free positions for a replacement pick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplacementMenu {
    pub side: Side,
    pub index: usize,
    pub count: usize,
    pub candidates: Vec<SwitchOption>,
    pub positions: Vec<FieldPosition>,
    pub can_undo: bool,
}

impl ReplacementMenu {
    pub fn build(engine: &dyn BattleEngine, builder: &SwitchesBuilder) -> Option<Self> {
        if builder.is_complete() {
            return None;
        }
        let candidates = engine
            .party(builder.side())
            .iter()
            .map(|info| SwitchOption::new(info, builder.is_standby(info.id)))
            .collect();
        Some(Self {
            side: builder.side(),
            index: builder.index(),
            count: builder.count(),
            candidates,
            positions: builder.available_positions().collect(),
            can_undo: builder.can_pop(),
        })
    }
}

pub(crate) fn check_move(
    engine: &dyn BattleEngine,
    combatant: CombatantId,
    index: usize,
) -> Result<MoveSlot, Rejection> {
    let slot = engine
        .moves(combatant)
        .get(index)
        .copied()
        .ok_or(Rejection::NoSuchOption)?;
    if !slot.usable() {
        return Err(Rejection::NoPp {
            move_name: engine.move_name(slot.move_id),
        });
    }
    Ok(slot)
}

pub(crate) fn check_item(
    engine: &dyn BattleEngine,
    side: Side,
    item_id: ItemId,
) -> Result<(), Rejection> {
    if engine.items(side).contains(&item_id) {
        Ok(())
    } else {
        Err(Rejection::NoSuchOption)
    }
}

/// Whether `outgoing` may be replaced by `incoming` this turn.
pub(crate) fn check_switch(
    engine: &dyn BattleEngine,
    builder: &ActionsBuilder,
    outgoing: CombatantId,
    incoming: CombatantId,
) -> Result<(), Rejection> {
    let info = party_member(engine, builder.side(), incoming)?;
    check_candidate(&info)?;
    if builder.is_standby(incoming) {
        return Err(Rejection::StandingBy { name: info.name });
    }
    if !engine.can_switch_out(outgoing) {
        return Err(Rejection::Trapped {
            name: display_name(engine, outgoing),
        });
    }
    Ok(())
}

pub(crate) fn check_flee(engine: &dyn BattleEngine, side: Side) -> Result<(), Rejection> {
    if engine.can_flee(side) {
        Ok(())
    } else {
        Err(Rejection::CannotFlee)
    }
}

/// Validates the combatant half of a replacement pick; the builder checks the
/// position and standby rules.
pub(crate) fn check_replacement(
    engine: &dyn BattleEngine,
    side: Side,
    incoming: CombatantId,
) -> Result<CombatantInfo, Rejection> {
    let info = party_member(engine, side, incoming)?;
    check_candidate(&info)?;
    Ok(info)
}

fn party_member(
    engine: &dyn BattleEngine,
    side: Side,
    id: CombatantId,
) -> Result<CombatantInfo, Rejection> {
    engine
        .party(side)
        .into_iter()
        .find(|info| info.id == id)
        .ok_or(Rejection::NoSuchOption)
}

fn check_candidate(info: &CombatantInfo) -> Result<(), Rejection> {
    if info.fainted {
        return Err(Rejection::Fainted {
            name: info.name.clone(),
        });
    }
    if info.is_active() {
        return Err(Rejection::AlreadyActive {
            name: info.name.clone(),
        });
    }
    Ok(())
}

pub(crate) fn display_name(engine: &dyn BattleEngine, id: CombatantId) -> String {
    engine
        .combatant(id)
        .map(|info| info.name)
        .unwrap_or_else(|| format!("Combatant {id}"))
}
