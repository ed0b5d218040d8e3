use crate::error::ConfigError;
use crate::field::{BattleFormat, Side, Slot};

use super::{
    Connectors, CursorRow, MoveTarget, SLOT_COUNT, SlotTargeting, TargetCursor, TargetLayout,
    TargetMask, slot_index,
};

/// Resolves which slots `requester` may pick for a move of `category`.
///
/// `restriction`, when present, narrows both the selectable slots and the
/// slots each confirmation hits (e.g. a move locked onto one target).
/// Sides are interpreted relative to the requester, so the same function
/// serves both the local player and automated deciders.
pub fn resolve_targets(
    format: BattleFormat,
    requester: Slot,
    category: MoveTarget,
    restriction: Option<TargetMask>,
) -> Result<TargetLayout, ConfigError> {
    if !format.is_targetable(requester.position) {
        return Err(ConfigError::PositionNotInFormat {
            format,
            position: requester.position,
        });
    }

    let closure = TargetMask::from_slots(
        format
            .slots()
            .filter(|&slot| in_closure(format, requester, category, slot)),
    );

    let mut slots = [SlotTargeting::default(); SLOT_COUNT];
    for slot in closure.slots() {
        let hits = if category.is_multi() {
            closure
        } else {
            TargetMask::of(slot)
        };
        let (allowed, hits) = match restriction {
            Some(restriction) => (restriction.contains_slot(slot), hits & restriction),
            None => (true, hits),
        };
        if allowed && !hits.is_empty() {
            slots[slot_index(slot)] = SlotTargeting {
                enabled: true,
                targets: hits,
                connectors: Connectors::empty(),
            };
        }
    }

    if category.is_multi() {
        link_neighbours(format, &mut slots);
    }

    let initial_cursor = initial_cursor(format, requester, category, &slots);

    Ok(TargetLayout {
        format,
        requester,
        category,
        slots,
        initial_cursor,
    })
}

fn in_closure(format: BattleFormat, requester: Slot, category: MoveTarget, slot: Slot) -> bool {
    let own_side = slot.side == requester.side;
    let adjacent = format.is_adjacent(requester, slot);
    match category {
        MoveTarget::All => true,
        MoveTarget::AllFoes => !own_side,
        MoveTarget::AllFoesSurrounding
        | MoveTarget::RandomFoeSurrounding
        | MoveTarget::SingleFoeSurrounding => !own_side && adjacent,
        MoveTarget::AllSurrounding | MoveTarget::SingleSurrounding => adjacent,
        MoveTarget::AllTeam => own_side,
        MoveTarget::SelfTarget | MoveTarget::Varies => slot == requester,
        MoveTarget::SelfOrAllySurrounding => slot == requester || (own_side && adjacent),
        MoveTarget::SingleAllySurrounding => own_side && adjacent,
        MoveTarget::SingleNotSelf => slot != requester,
    }
}

/// Draws connector lines between enabled screen neighbours.
fn link_neighbours(format: BattleFormat, slots: &mut [SlotTargeting; SLOT_COUNT]) {
    let enabled = |slots: &[SlotTargeting; SLOT_COUNT], slot: Option<Slot>| {
        slot.is_some_and(|slot| slots[slot_index(slot)].enabled)
    };

    for side in [Side::Foe, Side::Ally] {
        for column in 1..format.columns() {
            let left = format.slot_at(side, column - 1);
            let right = format.slot_at(side, column);
            if enabled(slots, left) && enabled(slots, right) {
                if let (Some(left), Some(right)) = (left, right) {
                    slots[slot_index(left)].connectors |= Connectors::RIGHT;
                    slots[slot_index(right)].connectors |= Connectors::LEFT;
                }
            }
        }
    }

    for column in 0..format.columns() {
        let foe = format.slot_at(Side::Foe, column);
        let ally = format.slot_at(Side::Ally, column);
        if enabled(slots, foe) && enabled(slots, ally) {
            if let (Some(foe), Some(ally)) = (foe, ally) {
                slots[slot_index(foe)].connectors |= Connectors::DOWN;
                slots[slot_index(ally)].connectors |= Connectors::UP;
            }
        }
    }
}

fn initial_cursor(
    format: BattleFormat,
    requester: Slot,
    category: MoveTarget,
    slots: &[SlotTargeting; SLOT_COUNT],
) -> TargetCursor {
    // Requester is targetable, so it always has a column.
    let own_column = format.screen_column(requester).unwrap_or(0);
    let preferred = if category.prefers_foes() {
        requester.side.opposite()
    } else {
        requester.side
    };

    [preferred, preferred.opposite()]
        .into_iter()
        .find_map(|side| {
            (0..format.columns())
                .filter(|&column| {
                    format
                        .slot_at(side, column)
                        .is_some_and(|slot| slots[slot_index(slot)].enabled)
                })
                .min_by_key(|&column| (column.abs_diff(own_column), column))
                .map(|column| TargetCursor::new(CursorRow::of_side(side), column))
        })
        .unwrap_or(TargetCursor::back(own_column))
}
