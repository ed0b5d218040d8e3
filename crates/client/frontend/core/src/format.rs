//! Text synthesised for packets that carry no text of their own.
use battle_core::{BattleResult, CombatantId, Effectiveness, Packet, RevealKind, Side};
use battle_runtime::BattleEngine;

use crate::config::MessageVisibility;

/// Message shown for `packet`, or `None` when it needs no visible text.
pub fn describe(
    packet: &Packet,
    engine: &dyn BattleEngine,
    visibility: &MessageVisibility,
) -> Option<String> {
    let name = |id: CombatantId| {
        engine
            .combatant(id)
            .map(|info| info.name)
            .unwrap_or_else(|| format!("Combatant {id}"))
    };

    let text = match packet {
        Packet::PpChanged { .. }
        | Packet::MoveLockChanged { .. }
        | Packet::ActionsRequest { .. }
        | Packet::SwitchInRequest { .. } => return None,

        Packet::TurnBegan { turn } => {
            if !visibility.show_turns {
                return None;
            }
            format!("Turn {turn}")
        }
        Packet::SwitchedIn {
            side, combatant, ..
        } => match side {
            Side::Ally => format!("Go! {}!", name(*combatant)),
            Side::Foe => format!("The opponent sent out {}!", name(*combatant)),
        },
        Packet::MoveUsed { combatant, move_id } => {
            format!("{} used {}!", name(*combatant), engine.move_name(*move_id))
        }
        Packet::MoveMissed { target, .. } => format!("{} avoided the attack!", name(*target)),
        Packet::Damaged {
            combatant, amount, ..
        } => {
            if !visibility.show_damage {
                return None;
            }
            format!("{} took {amount} damage.", name(*combatant))
        }
        Packet::Healed { combatant, amount } => {
            if !visibility.show_healing {
                return None;
            }
            format!("{} regained {amount} HP.", name(*combatant))
        }
        Packet::Effectiveness {
            target,
            effectiveness,
        } => match effectiveness {
            Effectiveness::SuperEffective => "It's super effective!".to_string(),
            Effectiveness::NotVeryEffective => "It's not very effective...".to_string(),
            Effectiveness::Ineffective => format!("It doesn't affect {}...", name(*target)),
        },
        Packet::StatusChanged {
            combatant,
            status,
            applied,
        } => {
            if !visibility.show_status {
                return None;
            }
            if *applied {
                format!("{} is {status}!", name(*combatant))
            } else {
                format!("{} is no longer {status}.", name(*combatant))
            }
        }
        Packet::ItemUsed {
            item_id, target, ..
        } => format!(
            "{} was used on {}.",
            engine.item_name(*item_id),
            name(*target)
        ),
        Packet::Fainted { combatant, .. } => format!("{} fainted!", name(*combatant)),
        Packet::Revealed { combatant, kind } => match kind {
            RevealKind::Disguise => format!("{}'s disguise was broken!", name(*combatant)),
            RevealKind::Transform { into } => {
                format!("{} transformed into {}!", name(*combatant), name(*into))
            }
            RevealKind::FormChange => format!("{} changed form!", name(*combatant)),
        },
        Packet::FleeFailed { .. } => "Couldn't get away!".to_string(),
        Packet::Text { text } => text.clone(),
        Packet::BattleResult { result } => result_text(*result).to_string(),
    };
    Some(text)
}

pub fn result_text(result: BattleResult) -> &'static str {
    match result {
        BattleResult::Won => "You won the battle!",
        BattleResult::Lost => "You lost the battle...",
        BattleResult::Fled => "Got away safely!",
        BattleResult::Draw => "The battle ended in a draw.",
    }
}
