//! Small deterministic battle engine used to drive the frame loop from the
//! command line.
//!
//! Each side fields four combatants with the same four moves. Outcomes are
//! derived from ids, speed and the turn counter, so a run with a given format
//! and opponent seed always plays out the same way.
use std::sync::{Mutex, MutexGuard, PoisonError};

use battle_core::{
    ActionEntry, BattleFormat, BattlePhase, BattleResult, CombatantId, CombatantInfo,
    Effectiveness, ItemId, MoveId, MoveSlot, MoveTarget, Packet, PositionList, RevealKind, Side,
    Slot, StatusKind, SwitchEntry, TargetMask, TurnAction,
};
use battle_runtime::{BattleEngine, Controller, EventPublisher, Result};
use tracing::debug;

pub const TACKLE: MoveId = MoveId(1);
pub const HEAT_WAVE: MoveId = MoveId(2);
pub const GUARD: MoveId = MoveId(3);
pub const OVERDRIVE: MoveId = MoveId(4);
/// Locked in for the turn after [`OVERDRIVE`].
pub const RECHARGE: MoveId = MoveId(5);
pub const POTION: ItemId = ItemId(1);

const POTION_HEAL: u16 = 20;
const STARTING_POTIONS: u8 = 2;

struct MoveData {
    id: MoveId,
    name: &'static str,
    power: u16,
    target: MoveTarget,
    pp: u8,
}

static MOVES: [MoveData; 5] = [
    MoveData {
        id: TACKLE,
        name: "Tackle",
        power: 12,
        target: MoveTarget::SingleFoeSurrounding,
        pp: 20,
    },
    MoveData {
        id: HEAT_WAVE,
        name: "Heat Wave",
        power: 8,
        target: MoveTarget::AllFoes,
        pp: 5,
    },
    MoveData {
        id: GUARD,
        name: "Guard",
        power: 0,
        target: MoveTarget::SelfTarget,
        pp: 10,
    },
    MoveData {
        id: OVERDRIVE,
        name: "Overdrive",
        power: 22,
        target: MoveTarget::SingleNotSelf,
        pp: 2,
    },
    MoveData {
        id: RECHARGE,
        name: "Recharge",
        power: 0,
        target: MoveTarget::SelfTarget,
        pp: 0,
    },
];

fn move_data(id: MoveId) -> Option<&'static MoveData> {
    MOVES.iter().find(|data| data.id == id)
}

struct Fighter {
    side: Side,
    info: CombatantInfo,
    hp: u16,
    max_hp: u16,
    speed: u8,
    moves: Vec<MoveSlot>,
    recharging: bool,
    disguised: bool,
    status: Option<StatusKind>,
}

impl Fighter {
    fn new(side: Side, id: u8, name: &str, max_hp: u16, speed: u8) -> Self {
        let moves = MOVES[..4]
            .iter()
            .map(|data| MoveSlot::new(data.id, data.pp, data.target))
            .collect();
        Self {
            side,
            info: CombatantInfo::new(CombatantId(id), name),
            hp: max_hp,
            max_hp,
            speed,
            moves,
            recharging: false,
            disguised: false,
            status: None,
        }
    }

    fn id(&self) -> CombatantId {
        self.info.id
    }

    fn slot(&self) -> Option<Slot> {
        self.info.position.map(|position| Slot::new(self.side, position))
    }

    fn is_healthy_bench(&self) -> bool {
        !self.info.fainted && !self.info.is_active()
    }
}

/// What the engine asks for once a turn has been resolved.
enum FollowUp {
    Ended(BattleResult),
    Replacements(Vec<(Side, u8)>),
    Actions,
}

struct DemoState {
    fighters: Vec<Fighter>,
    turn: u32,
    potions: u8,
    actions: Vec<(Side, Vec<ActionEntry>)>,
    awaiting_switches: Vec<(Side, u8)>,
    switches: Vec<(Side, Vec<SwitchEntry>)>,
}

pub struct DemoEngine {
    format: BattleFormat,
    state: Mutex<DemoState>,
}

impl DemoEngine {
    pub fn new(format: BattleFormat) -> Self {
        let mut fighters = vec![
            Fighter::new(Side::Ally, 0, "Ember", 48, 9),
            Fighter::new(Side::Ally, 1, "Ripple", 55, 7),
            Fighter::new(Side::Ally, 2, "Thorn", 50, 5),
            Fighter::new(Side::Ally, 3, "Moss", 44, 4),
            Fighter::new(Side::Foe, 10, "Gale", 46, 8),
            Fighter::new(Side::Foe, 11, "Boulder", 60, 3),
            Fighter::new(Side::Foe, 12, "Spark", 40, 10),
            Fighter::new(Side::Foe, 13, "Frost", 45, 6),
        ];
        if let Some(spark) = fighters.iter_mut().find(|f| f.id() == CombatantId(12)) {
            spark.disguised = true;
        }

        let positions = format.targetable_positions();
        for side in [Side::Ally, Side::Foe] {
            for (fighter, position) in fighters
                .iter_mut()
                .filter(|f| f.side == side)
                .zip(positions.iter())
            {
                fighter.info.position = Some(*position);
            }
        }

        Self {
            format,
            state: Mutex::new(DemoState {
                fighters,
                turn: 0,
                potions: STARTING_POTIONS,
                actions: Vec::new(),
                awaiting_switches: Vec::new(),
                switches: Vec::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, DemoState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish_all(packets: Vec<Packet>, events: &EventPublisher) -> Result<()> {
        for packet in packets {
            events.publish(packet)?;
        }
        Ok(())
    }

    fn follow_up(&self, next: FollowUp, events: &EventPublisher) -> Result<()> {
        match next {
            FollowUp::Ended(result) => {
                events.publish(Packet::BattleResult { result })?;
                events.notify_phase(BattlePhase::Ended(result));
            }
            FollowUp::Replacements(requests) => {
                for (side, count) in requests {
                    events.publish(Packet::SwitchInRequest { side, count })?;
                }
                events.notify_phase(BattlePhase::WaitingForSwitchIns);
            }
            FollowUp::Actions => {
                // The local side is asked last, so its menu opens with no
                // packet outstanding.
                events.publish(Packet::ActionsRequest { side: Side::Foe })?;
                events.publish(Packet::ActionsRequest { side: Side::Ally })?;
                events.notify_phase(BattlePhase::WaitingForActions);
            }
        }
        Ok(())
    }
}

impl DemoState {
    fn fighter(&self, id: CombatantId) -> Option<&Fighter> {
        self.fighters.iter().find(|f| f.id() == id)
    }

    fn index_of(&self, id: CombatantId) -> Option<usize> {
        self.fighters.iter().position(|f| f.id() == id)
    }

    fn at_slot(&self, slot: Slot) -> Option<usize> {
        self.fighters
            .iter()
            .position(|f| !f.info.fainted && f.slot() == Some(slot))
    }

    fn active(&self, side: Side, format: BattleFormat) -> Vec<CombatantId> {
        format
            .targetable_positions()
            .iter()
            .filter_map(|&position| self.at_slot(Slot::new(side, position)))
            .map(|index| self.fighters[index].id())
            .collect()
    }

    fn open_positions(&self, side: Side, format: BattleFormat) -> PositionList {
        format
            .targetable_positions()
            .into_iter()
            .filter(|&position| self.at_slot(Slot::new(side, position)).is_none())
            .collect()
    }

    fn forced_action(&self, id: CombatantId) -> Option<TurnAction> {
        let fighter = self.fighter(id)?;
        if !fighter.recharging {
            return None;
        }
        let slot = fighter.slot()?;
        Some(TurnAction::Move {
            move_id: RECHARGE,
            targets: TargetMask::of(slot),
        })
    }

    fn valid_actions(&self, side: Side, format: BattleFormat, actions: &[ActionEntry]) -> bool {
        let active = self.active(side, format);
        if active.len() != actions.len() {
            return false;
        }
        let mut incoming = Vec::new();
        let mut potions = self.potions;

        for (expected, entry) in active.iter().zip(actions) {
            if *expected != entry.combatant {
                return false;
            }
            if let Some(forced) = self.forced_action(entry.combatant) {
                if forced != entry.action {
                    return false;
                }
                continue;
            }
            let Some(fighter) = self.fighter(entry.combatant) else {
                return false;
            };
            let legal = match entry.action {
                TurnAction::Move { move_id, targets } => {
                    !targets.is_empty()
                        && fighter
                            .moves
                            .iter()
                            .any(|slot| slot.move_id == move_id && slot.usable())
                }
                TurnAction::Item { item_id } => {
                    let available = side == Side::Ally && item_id == POTION && potions > 0;
                    potions = potions.saturating_sub(1);
                    available
                }
                TurnAction::Switch { incoming: id } => {
                    let healthy = self
                        .fighter(id)
                        .is_some_and(|f| f.side == side && f.is_healthy_bench());
                    let fresh = !incoming.contains(&id);
                    incoming.push(id);
                    healthy && fresh
                }
            };
            if !legal {
                return false;
            }
        }
        true
    }

    fn valid_switches(&self, side: Side, format: BattleFormat, switches: &[SwitchEntry]) -> bool {
        let Some(&(_, count)) = self.awaiting_switches.iter().find(|(s, _)| *s == side) else {
            return false;
        };
        if switches.len() != usize::from(count) {
            return false;
        }
        let open = self.open_positions(side, format);
        switches.iter().enumerate().all(|(i, entry)| {
            let unique = switches[..i]
                .iter()
                .all(|prior| {
                    prior.combatant != entry.combatant && prior.position != entry.position
                });
            unique
                && open.contains(&entry.position)
                && self
                    .fighter(entry.combatant)
                    .is_some_and(|f| f.side == side && f.is_healthy_bench())
        })
    }

    /// Resolves the stored actions into the turn's packets.
    fn resolve_turn(&mut self, format: BattleFormat) -> (Vec<Packet>, FollowUp) {
        self.turn += 1;
        let mut packets = vec![Packet::TurnBegan { turn: self.turn }];

        let mut queue: Vec<(Side, ActionEntry)> = self
            .actions
            .drain(..)
            .flat_map(|(side, entries)| entries.into_iter().map(move |entry| (side, entry)))
            .collect();
        queue.sort_by_key(|(_, entry)| {
            let priority = match entry.action {
                TurnAction::Switch { .. } => 0,
                TurnAction::Item { .. } => 1,
                TurnAction::Move { .. } => 2,
            };
            let speed = self.fighter(entry.combatant).map_or(0, |f| f.speed);
            (priority, std::cmp::Reverse(speed))
        });

        for (side, entry) in queue {
            let Some(actor) = self.index_of(entry.combatant) else {
                continue;
            };
            if self.fighters[actor].info.fainted || !self.fighters[actor].info.is_active() {
                continue;
            }
            match entry.action {
                TurnAction::Switch { incoming } => self.switch_out(actor, incoming, &mut packets),
                TurnAction::Item { item_id } => self.use_item(side, actor, item_id, &mut packets),
                TurnAction::Move { move_id, targets } => {
                    self.use_move(actor, move_id, targets, &mut packets)
                }
            }
        }

        (packets, self.next_step(format))
    }

    fn switch_out(&mut self, actor: usize, incoming: CombatantId, packets: &mut Vec<Packet>) {
        let Some(position) = self.fighters[actor].info.position.take() else {
            return;
        };
        packets.push(Packet::Text {
            text: format!("{}, come back!", self.fighters[actor].info.name),
        });
        if let Some(index) = self.index_of(incoming) {
            let fighter = &mut self.fighters[index];
            fighter.info.position = Some(position);
            packets.push(Packet::SwitchedIn {
                side: fighter.side,
                combatant: incoming,
                position,
            });
        }
    }

    fn use_item(&mut self, side: Side, actor: usize, item_id: ItemId, packets: &mut Vec<Packet>) {
        self.potions = self.potions.saturating_sub(1);
        let fighter = &mut self.fighters[actor];
        let amount = POTION_HEAL.min(fighter.max_hp - fighter.hp);
        fighter.hp += amount;
        packets.push(Packet::ItemUsed {
            side,
            item_id,
            target: fighter.id(),
        });
        packets.push(Packet::Healed {
            combatant: fighter.id(),
            amount,
        });
    }

    fn use_move(
        &mut self,
        actor: usize,
        move_id: MoveId,
        targets: TargetMask,
        packets: &mut Vec<Packet>,
    ) {
        let id = self.fighters[actor].id();
        if move_id == RECHARGE {
            self.fighters[actor].recharging = false;
            packets.push(Packet::Text {
                text: format!("{} must recharge!", self.fighters[actor].info.name),
            });
            packets.push(Packet::MoveLockChanged {
                combatant: id,
                locked: None,
            });
            return;
        }
        let Some(data) = move_data(move_id) else {
            return;
        };

        if let Some(slot) = self.fighters[actor]
            .moves
            .iter_mut()
            .find(|slot| slot.move_id == move_id)
        {
            slot.pp = slot.pp.saturating_sub(1);
            packets.push(Packet::PpChanged {
                combatant: id,
                move_id,
                pp: slot.pp,
            });
        }
        packets.push(Packet::MoveUsed {
            combatant: id,
            move_id,
        });

        if move_id == OVERDRIVE {
            self.fighters[actor].recharging = true;
            packets.push(Packet::MoveLockChanged {
                combatant: id,
                locked: Some(RECHARGE),
            });
        }
        if data.power == 0 {
            packets.push(Packet::Text {
                text: format!("{} braced itself!", self.fighters[actor].info.name),
            });
            return;
        }

        let mut victims: Vec<usize> = targets
            .slots()
            .filter_map(|slot| self.at_slot(slot))
            .collect();
        if victims.is_empty() && !data.target.is_multi() {
            // The chosen target fainted earlier this turn.
            let foe = self.fighters[actor].side.opposite();
            victims.extend(
                self.fighters
                    .iter()
                    .position(|f| f.side == foe && !f.info.fainted && f.info.is_active()),
            );
        }
        if victims.is_empty() {
            packets.push(Packet::Text {
                text: "But there was no target...".to_string(),
            });
            return;
        }

        for victim in victims {
            self.strike(actor, victim, data, packets);
        }
    }

    fn strike(&mut self, actor: usize, victim: usize, data: &MoveData, packets: &mut Vec<Packet>) {
        let attacker = self.fighters[actor].id();
        let speed = self.fighters[actor].speed;
        let target = self.fighters[victim].id();

        if (self.turn + u32::from(attacker.0) + u32::from(target.0)) % 7 == 0 {
            packets.push(Packet::MoveMissed {
                combatant: attacker,
                target,
            });
            return;
        }

        let defender = &mut self.fighters[victim];
        if defender.disguised {
            defender.disguised = false;
            packets.push(Packet::Revealed {
                combatant: target,
                kind: RevealKind::Disguise,
            });
            return;
        }

        let base = data.power + u16::from(speed % 4);
        let (amount, effectiveness) = match (data.id.0 + u16::from(target.0)) % 6 {
            0 => (base * 3 / 2, Some(Effectiveness::SuperEffective)),
            1 => (base / 2, Some(Effectiveness::NotVeryEffective)),
            _ => (base, None),
        };
        defender.hp = defender.hp.saturating_sub(amount);
        packets.push(Packet::Damaged {
            combatant: target,
            amount,
            remaining: defender.hp,
        });
        if let Some(effectiveness) = effectiveness {
            packets.push(Packet::Effectiveness {
                target,
                effectiveness,
            });
        }

        if data.id == HEAT_WAVE
            && defender.status.is_none()
            && defender.hp > 0
            && target.0 % 3 == 0
        {
            defender.status = Some(StatusKind::Burned);
            packets.push(Packet::StatusChanged {
                combatant: target,
                status: StatusKind::Burned,
                applied: true,
            });
        }

        if defender.hp == 0 {
            let slot = defender.slot();
            defender.info.fainted = true;
            defender.info.position = None;
            defender.recharging = false;
            if let Some(slot) = slot {
                packets.push(Packet::Fainted {
                    combatant: target,
                    slot,
                });
            }
        }
    }

    fn next_step(&mut self, format: BattleFormat) -> FollowUp {
        let standing = |side: Side| self.fighters.iter().any(|f| f.side == side && !f.info.fainted);
        match (standing(Side::Ally), standing(Side::Foe)) {
            (false, false) => return FollowUp::Ended(BattleResult::Draw),
            (false, true) => return FollowUp::Ended(BattleResult::Lost),
            (true, false) => return FollowUp::Ended(BattleResult::Won),
            (true, true) => {}
        }

        let requests: Vec<(Side, u8)> = [Side::Foe, Side::Ally]
            .into_iter()
            .filter_map(|side| {
                let open = self.open_positions(side, format).len();
                let bench = self
                    .fighters
                    .iter()
                    .filter(|f| f.side == side && f.is_healthy_bench())
                    .count();
                let count = open.min(bench) as u8;
                (count > 0).then_some((side, count))
            })
            .collect();

        if requests.is_empty() {
            FollowUp::Actions
        } else {
            self.awaiting_switches = requests.clone();
            FollowUp::Replacements(requests)
        }
    }
}

impl BattleEngine for DemoEngine {
    fn format(&self) -> BattleFormat {
        self.format
    }

    fn controller(&self, side: Side) -> Controller {
        match side {
            Side::Ally => Controller::Local,
            Side::Foe => Controller::Automated,
        }
    }

    fn active(&self, side: Side) -> Vec<CombatantId> {
        self.state().active(side, self.format)
    }

    fn party(&self, side: Side) -> Vec<CombatantInfo> {
        self.state()
            .fighters
            .iter()
            .filter(|f| f.side == side)
            .map(|f| f.info.clone())
            .collect()
    }

    fn combatant(&self, id: CombatantId) -> Option<CombatantInfo> {
        self.state().fighter(id).map(|f| f.info.clone())
    }

    fn moves(&self, id: CombatantId) -> Vec<MoveSlot> {
        self.state()
            .fighter(id)
            .map(|f| f.moves.clone())
            .unwrap_or_default()
    }

    fn items(&self, side: Side) -> Vec<ItemId> {
        if side == Side::Ally && self.state().potions > 0 {
            vec![POTION]
        } else {
            Vec::new()
        }
    }

    fn forced_action(&self, id: CombatantId) -> Option<TurnAction> {
        self.state().forced_action(id)
    }

    fn target_restriction(&self, _id: CombatantId) -> Option<TargetMask> {
        None
    }

    fn can_switch_out(&self, id: CombatantId) -> bool {
        self.state().fighter(id).is_some_and(|f| !f.recharging)
    }

    fn can_flee(&self, side: Side) -> bool {
        side == Side::Ally
    }

    fn open_positions(&self, side: Side) -> PositionList {
        self.state().open_positions(side, self.format)
    }

    fn move_name(&self, id: MoveId) -> String {
        move_data(id).map_or_else(|| format!("Move {}", id.0), |data| data.name.to_string())
    }

    fn item_name(&self, id: ItemId) -> String {
        if id == POTION {
            "Potion".to_string()
        } else {
            format!("Item {}", id.0)
        }
    }

    fn begin(&self, events: &EventPublisher) -> Result<()> {
        let entrances: Vec<Packet> = {
            let state = self.state();
            [Side::Foe, Side::Ally]
                .into_iter()
                .flat_map(|side| {
                    state
                        .fighters
                        .iter()
                        .filter(move |f| f.side == side)
                        .filter_map(|f| {
                            f.info.position.map(|position| Packet::SwitchedIn {
                                side: f.side,
                                combatant: f.id(),
                                position,
                            })
                        })
                        .collect::<Vec<_>>()
                })
                .collect()
        };
        Self::publish_all(entrances, events)?;
        self.follow_up(FollowUp::Actions, events)
    }

    fn run_turn(&self, events: &EventPublisher) -> Result<()> {
        let (packets, next) = self.state().resolve_turn(self.format);
        debug!(target: "demo", packets = packets.len(), "turn resolved");
        Self::publish_all(packets, events)?;
        self.follow_up(next, events)
    }

    fn run_switches(&self, events: &EventPublisher) -> Result<()> {
        let packets: Vec<Packet> = {
            let mut state = self.state();
            let switches: Vec<_> = state.switches.drain(..).collect();
            let mut packets = Vec::new();
            for (side, entries) in switches {
                for entry in entries {
                    if let Some(index) = state.index_of(entry.combatant) {
                        state.fighters[index].info.position = Some(entry.position);
                        packets.push(Packet::SwitchedIn {
                            side,
                            combatant: entry.combatant,
                            position: entry.position,
                        });
                    }
                }
            }
            packets
        };
        Self::publish_all(packets, events)?;
        self.follow_up(FollowUp::Actions, events)
    }

    fn select_actions_if_valid(
        &self,
        side: Side,
        actions: &[ActionEntry],
        events: &EventPublisher,
    ) -> Result<bool> {
        let ready = {
            let mut state = self.state();
            if !state.valid_actions(side, self.format, actions)
                || state.actions.iter().any(|(s, _)| *s == side)
            {
                None
            } else {
                state.actions.push((side, actions.to_vec()));
                Some(state.actions.len() == 2)
            }
        };
        let Some(ready) = ready else {
            debug!(target: "demo", %side, "actions refused, asking again");
            events.publish(Packet::ActionsRequest { side })?;
            return Ok(false);
        };
        if ready {
            events.notify_phase(BattlePhase::ReadyToRunTurn);
        }
        Ok(true)
    }

    fn select_switches_if_valid(
        &self,
        side: Side,
        switches: &[SwitchEntry],
        events: &EventPublisher,
    ) -> Result<bool> {
        let ready = {
            let mut state = self.state();
            if state.valid_switches(side, self.format, switches) {
                state.awaiting_switches.retain(|(s, _)| *s != side);
                state.switches.push((side, switches.to_vec()));
                Ok(state.awaiting_switches.is_empty())
            } else {
                let count = state
                    .awaiting_switches
                    .iter()
                    .find_map(|&(s, count)| (s == side).then_some(count));
                Err(count)
            }
        };
        let ready = match ready {
            Ok(ready) => ready,
            Err(count) => {
                if let Some(count) = count {
                    debug!(target: "demo", %side, "replacements refused, asking again");
                    events.publish(Packet::SwitchInRequest { side, count })?;
                }
                return Ok(false);
            }
        };
        if ready {
            events.notify_phase(BattlePhase::ReadyToRunSwitches);
        }
        Ok(true)
    }

    fn select_flee_if_valid(&self, side: Side, events: &EventPublisher) -> Result<bool> {
        if !self.can_flee(side) {
            return Ok(false);
        }
        events.publish(Packet::BattleResult {
            result: BattleResult::Fled,
        })?;
        events.notify_phase(BattlePhase::Ended(BattleResult::Fled));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::FieldPosition::*;

    #[test]
    fn roster_fills_the_format_positions() {
        let engine = DemoEngine::new(BattleFormat::Triple);
        assert_eq!(
            engine.active(Side::Ally),
            vec![CombatantId(0), CombatantId(1), CombatantId(2)]
        );
        assert_eq!(engine.active(Side::Foe).len(), 3);
        assert!(engine.open_positions(Side::Ally).is_empty());

        let engine = DemoEngine::new(BattleFormat::Single);
        assert_eq!(engine.active(Side::Foe), vec![CombatantId(10)]);
        assert_eq!(engine.combatant(CombatantId(10)).unwrap().position, Some(Center));
    }

    #[test]
    fn overdrive_locks_the_user_into_recharging() {
        let engine = DemoEngine::new(BattleFormat::Single);
        {
            let mut state = engine.state();
            state.actions = vec![
                (
                    Side::Ally,
                    vec![ActionEntry::new(
                        CombatantId(0),
                        TurnAction::Move {
                            move_id: OVERDRIVE,
                            targets: TargetMask::FOE_CENTER,
                        },
                    )],
                ),
                (
                    Side::Foe,
                    vec![ActionEntry::new(
                        CombatantId(10),
                        TurnAction::Move {
                            move_id: GUARD,
                            targets: TargetMask::FOE_CENTER,
                        },
                    )],
                ),
            ];
            let (packets, _) = state.resolve_turn(BattleFormat::Single);
            assert!(packets.contains(&Packet::MoveLockChanged {
                combatant: CombatantId(0),
                locked: Some(RECHARGE),
            }));
        }
        assert_eq!(
            engine.forced_action(CombatantId(0)),
            Some(TurnAction::Move {
                move_id: RECHARGE,
                targets: TargetMask::ALLY_CENTER,
            })
        );
        assert!(!engine.can_switch_out(CombatantId(0)));
    }

    #[test]
    fn invalid_selections_are_refused() {
        let engine = DemoEngine::new(BattleFormat::Single);
        let state = engine.state();
        let wrong_combatant = [ActionEntry::new(
            CombatantId(1),
            TurnAction::Item { item_id: POTION },
        )];
        assert!(!state.valid_actions(Side::Ally, BattleFormat::Single, &wrong_combatant));

        let foe_item = [ActionEntry::new(
            CombatantId(10),
            TurnAction::Item { item_id: POTION },
        )];
        assert!(!state.valid_actions(Side::Foe, BattleFormat::Single, &foe_item));

        let switch = [ActionEntry::new(
            CombatantId(0),
            TurnAction::Switch {
                incoming: CombatantId(2),
            },
        )];
        assert!(state.valid_actions(Side::Ally, BattleFormat::Single, &switch));
    }

    #[test]
    fn fainting_requests_a_replacement() {
        let engine = DemoEngine::new(BattleFormat::Single);
        let mut state = engine.state();
        let index = state.index_of(CombatantId(10)).unwrap();
        state.fighters[index].hp = 1;
        state.actions = vec![
            (
                Side::Ally,
                vec![ActionEntry::new(
                    CombatantId(0),
                    TurnAction::Move {
                        move_id: TACKLE,
                        targets: TargetMask::FOE_CENTER,
                    },
                )],
            ),
            (
                Side::Foe,
                vec![ActionEntry::new(
                    CombatantId(10),
                    TurnAction::Move {
                        move_id: GUARD,
                        targets: TargetMask::FOE_CENTER,
                    },
                )],
            ),
        ];
        let (packets, next) = state.resolve_turn(BattleFormat::Single);
        assert!(packets.iter().any(|p| matches!(
            p,
            Packet::Fainted { combatant, .. } if *combatant == CombatantId(10)
        )));
        assert!(matches!(
            next,
            FollowUp::Replacements(ref requests) if requests == &vec![(Side::Foe, 1)]
        ));
        assert_eq!(state.open_positions(Side::Foe, BattleFormat::Single).as_slice(), &[Center]);
    }
}
