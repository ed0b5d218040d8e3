//! Automated decision routines for sides the local player does not control.
//!
//! Deciders run on simulation threads and only read from the engine; their
//! output is submitted through the same entry points the player's menus use.
use std::sync::{Mutex, PoisonError};

use battle_core::{
    ActionEntry, CombatantId, MoveSlot, Side, SwitchEntry, TurnAction, resolve_targets,
};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use super::engine::{BattleEngine, bench, slot_of};
use super::errors::{Result, RuntimeError};

/// Trait for choosing a side's turn without player input.
///
/// Different implementations can handle:
/// - Scripted opponents in tests
/// - Simple AI policies
/// - Replayed choices
pub trait ActionDecider: Send + Sync {
    /// One action per active combatant of `side`, in slot order.
    fn decide_actions(&self, engine: &dyn BattleEngine, side: Side) -> Result<Vec<ActionEntry>>;

    /// Replacements for up to `count` open positions of `side`.
    fn decide_switches(
        &self,
        engine: &dyn BattleEngine,
        side: Side,
        count: u8,
    ) -> Result<Vec<SwitchEntry>>;
}

/// Always picks the first usable move and the default target.
/// Useful for deterministic tests or as a fallback.
pub struct FirstChoiceDecider;

impl ActionDecider for FirstChoiceDecider {
    fn decide_actions(&self, engine: &dyn BattleEngine, side: Side) -> Result<Vec<ActionEntry>> {
        engine
            .active(side)
            .into_iter()
            .map(|combatant| {
                if let Some(action) = engine.forced_action(combatant) {
                    return Ok(ActionEntry::new(combatant, action));
                }
                let choice = engine
                    .moves(combatant)
                    .into_iter()
                    .find(|slot| slot.usable())
                    .ok_or(RuntimeError::NoLegalAction { combatant })?;
                let layout = resolve_targets(
                    engine.format(),
                    slot_of(engine, side, combatant)?,
                    choice.target,
                    engine.target_restriction(combatant),
                )?;
                Ok(ActionEntry::new(
                    combatant,
                    TurnAction::Move {
                        move_id: choice.move_id,
                        targets: layout.implicit_targets(),
                    },
                ))
            })
            .collect()
    }

    fn decide_switches(
        &self,
        engine: &dyn BattleEngine,
        side: Side,
        count: u8,
    ) -> Result<Vec<SwitchEntry>> {
        pair_replacements(engine, side, count, bench(engine, side))
    }
}

/// Picks uniformly among usable moves and enabled targets.
///
/// Seeded so a battle replays identically for the same seed.
pub struct RandomDecider {
    rng: Mutex<ChaCha8Rng>,
}

impl RandomDecider {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    fn decide_one(
        &self,
        engine: &dyn BattleEngine,
        side: Side,
        combatant: CombatantId,
        rng: &mut ChaCha8Rng,
    ) -> Result<ActionEntry> {
        if let Some(action) = engine.forced_action(combatant) {
            return Ok(ActionEntry::new(combatant, action));
        }

        let usable: Vec<MoveSlot> = engine
            .moves(combatant)
            .into_iter()
            .filter(|slot| slot.usable())
            .collect();
        let choice = usable
            .choose(rng)
            .copied()
            .ok_or(RuntimeError::NoLegalAction { combatant })?;

        let layout = resolve_targets(
            engine.format(),
            slot_of(engine, side, combatant)?,
            choice.target,
            engine.target_restriction(combatant),
        )?;
        let enabled: Vec<_> = layout.enabled_slots().collect();
        let targets = enabled
            .choose(rng)
            .and_then(|&slot| layout.targets_for(slot))
            .unwrap_or_else(|| layout.implicit_targets());

        Ok(ActionEntry::new(
            combatant,
            TurnAction::Move {
                move_id: choice.move_id,
                targets,
            },
        ))
    }
}

impl ActionDecider for RandomDecider {
    fn decide_actions(&self, engine: &dyn BattleEngine, side: Side) -> Result<Vec<ActionEntry>> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        engine
            .active(side)
            .into_iter()
            .map(|combatant| self.decide_one(engine, side, combatant, &mut rng))
            .collect()
    }

    fn decide_switches(
        &self,
        engine: &dyn BattleEngine,
        side: Side,
        count: u8,
    ) -> Result<Vec<SwitchEntry>> {
        let mut candidates = bench(engine, side);
        candidates.shuffle(&mut *self.rng.lock().unwrap_or_else(PoisonError::into_inner));
        pair_replacements(engine, side, count, candidates)
    }
}

/// Assigns candidates to open positions in layout order.
fn pair_replacements(
    engine: &dyn BattleEngine,
    side: Side,
    count: u8,
    candidates: Vec<CombatantId>,
) -> Result<Vec<SwitchEntry>> {
    let positions = engine.open_positions(side);
    let switches: Vec<SwitchEntry> = positions
        .into_iter()
        .take(count as usize)
        .zip(candidates)
        .map(|(position, combatant)| SwitchEntry::new(combatant, position))
        .collect();

    if switches.is_empty() && count > 0 {
        return Err(RuntimeError::NoReplacements { side, count });
    }
    Ok(switches)
}
