//! Scripted doubles engine and a frame driver for session tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use battle_core::{
    ActionEntry, BattleFormat, BattlePhase, BattleResult, CombatantId, CombatantInfo,
    FieldPosition::{self, *},
    ItemId, MoveId, MoveSlot, MoveTarget, Packet, PositionList, Side, Slot, SwitchEntry,
    TargetMask, TurnAction,
};
use battle_runtime::{
    BattleEngine, BattleRuntime, Controller, EventPublisher, FirstChoiceDecider, Result,
};
use client_frontend_core::{
    AnimationConfig, BattleSession, FrameInput, FrontendConfig, MessageConfig,
};

pub const EMBER: CombatantId = CombatantId(0);
pub const RIPPLE: CombatantId = CombatantId(1);
pub const THORN: CombatantId = CombatantId(2);
pub const MOSS: CombatantId = CombatantId(3);
pub const GALE: CombatantId = CombatantId(10);
pub const BOULDER: CombatantId = CombatantId(11);

pub const EMPTY_MOVE: MoveId = MoveId(1);
pub const JAB: MoveId = MoveId(2);
pub const QUAKE: MoveId = MoveId(3);
pub const POTION: ItemId = ItemId(7);

pub struct ScriptedEngine {
    roster: Mutex<Vec<(Side, CombatantInfo)>>,
    turns: Mutex<VecDeque<Vec<Packet>>>,
    submitted_this_turn: Mutex<Vec<Side>>,
    incoming: Mutex<Vec<(Side, SwitchEntry)>>,
    pub forced: Vec<(CombatantId, TurnAction)>,
    pub trapped: Vec<CombatantId>,
    pub can_flee: bool,
    pub ending: BattleResult,
    pub actions: Mutex<Vec<(Side, Vec<ActionEntry>)>>,
    pub switches: Mutex<Vec<(Side, Vec<SwitchEntry>)>>,
}

impl ScriptedEngine {
    pub fn doubles(turns: Vec<Vec<Packet>>) -> Self {
        Self {
            roster: Mutex::new(vec![
                (Side::Ally, CombatantInfo::new(EMBER, "Ember").at(Left)),
                (Side::Ally, CombatantInfo::new(RIPPLE, "Ripple").at(Right)),
                (Side::Ally, CombatantInfo::new(THORN, "Thorn")),
                (Side::Ally, CombatantInfo::new(MOSS, "Moss").fainted()),
                (Side::Foe, CombatantInfo::new(GALE, "Gale").at(Left)),
                (Side::Foe, CombatantInfo::new(BOULDER, "Boulder").at(Right)),
            ]),
            turns: Mutex::new(turns.into()),
            submitted_this_turn: Mutex::new(Vec::new()),
            incoming: Mutex::new(Vec::new()),
            forced: Vec::new(),
            trapped: Vec::new(),
            can_flee: true,
            ending: BattleResult::Won,
            actions: Mutex::new(Vec::new()),
            switches: Mutex::new(Vec::new()),
        }
    }

    pub fn submitted_actions(&self, side: Side) -> Vec<Vec<ActionEntry>> {
        self.actions
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == side)
            .map(|(_, list)| list.clone())
            .collect()
    }

    fn apply(&self, packet: &Packet) {
        let mut roster = self.roster.lock().unwrap();
        match packet {
            Packet::Fainted { combatant, .. } => {
                if let Some((_, info)) = roster.iter_mut().find(|(_, info)| info.id == *combatant) {
                    info.fainted = true;
                    info.position = None;
                }
            }
            Packet::SwitchedIn {
                combatant,
                position,
                ..
            } => {
                if let Some((_, info)) = roster.iter_mut().find(|(_, info)| info.id == *combatant) {
                    info.position = Some(*position);
                }
            }
            _ => {}
        }
    }

    fn publish_all(&self, packets: Vec<Packet>, events: &EventPublisher) -> Result<()> {
        for packet in packets {
            self.apply(&packet);
            events.publish(packet)?;
        }
        Ok(())
    }

    /// Requests the next turn, or ends the battle once the script runs out.
    fn next_turn(&self, events: &EventPublisher) -> Result<()> {
        let remaining = self.turns.lock().unwrap().len();
        if remaining == 0 {
            events.publish(Packet::BattleResult {
                result: self.ending,
            })?;
            events.notify_phase(BattlePhase::Ended(self.ending));
            return Ok(());
        }
        // The local request goes last so no publish is outstanding while the
        // player's menu is open.
        events.publish(Packet::ActionsRequest { side: Side::Foe })?;
        events.publish(Packet::ActionsRequest { side: Side::Ally })?;
        events.notify_phase(BattlePhase::WaitingForActions);
        Ok(())
    }
}

impl BattleEngine for ScriptedEngine {
    fn format(&self) -> BattleFormat {
        BattleFormat::Double
    }

    fn controller(&self, side: Side) -> Controller {
        match side {
            Side::Ally => Controller::Local,
            Side::Foe => Controller::Automated,
        }
    }

    fn active(&self, side: Side) -> Vec<CombatantId> {
        let roster = self.roster.lock().unwrap();
        let mut active: Vec<_> = roster
            .iter()
            .filter(|(s, info)| *s == side && info.is_active())
            .map(|(_, info)| (info.position, info.id))
            .collect();
        active.sort();
        active.into_iter().map(|(_, id)| id).collect()
    }

    fn party(&self, side: Side) -> Vec<CombatantInfo> {
        self.roster
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == side)
            .map(|(_, info)| info.clone())
            .collect()
    }

    fn combatant(&self, id: CombatantId) -> Option<CombatantInfo> {
        self.roster
            .lock()
            .unwrap()
            .iter()
            .find(|(_, info)| info.id == id)
            .map(|(_, info)| info.clone())
    }

    fn moves(&self, _id: CombatantId) -> Vec<MoveSlot> {
        vec![
            MoveSlot::new(EMPTY_MOVE, 0, MoveTarget::SingleNotSelf),
            MoveSlot::new(JAB, 10, MoveTarget::SingleFoeSurrounding),
            MoveSlot::new(QUAKE, 5, MoveTarget::AllSurrounding),
        ]
    }

    fn items(&self, side: Side) -> Vec<ItemId> {
        match side {
            Side::Ally => vec![POTION],
            Side::Foe => Vec::new(),
        }
    }

    fn forced_action(&self, id: CombatantId) -> Option<TurnAction> {
        self.forced
            .iter()
            .find(|(c, _)| *c == id)
            .map(|(_, action)| *action)
    }

    fn target_restriction(&self, _id: CombatantId) -> Option<TargetMask> {
        None
    }

    fn can_switch_out(&self, id: CombatantId) -> bool {
        !self.trapped.contains(&id)
    }

    fn can_flee(&self, _side: Side) -> bool {
        self.can_flee
    }

    fn open_positions(&self, side: Side) -> PositionList {
        let roster = self.roster.lock().unwrap();
        BattleFormat::Double
            .positions()
            .into_iter()
            .filter(|position| {
                !roster
                    .iter()
                    .any(|(s, info)| *s == side && info.position == Some(*position))
            })
            .collect()
    }

    fn move_name(&self, id: MoveId) -> String {
        match id {
            EMPTY_MOVE => "Splash".to_string(),
            JAB => "Jab".to_string(),
            QUAKE => "Quake".to_string(),
            other => format!("Move {}", other.0),
        }
    }

    fn item_name(&self, _id: ItemId) -> String {
        "Potion".to_string()
    }

    fn begin(&self, events: &EventPublisher) -> Result<()> {
        let entrances: Vec<_> = {
            let roster = self.roster.lock().unwrap();
            roster
                .iter()
                .filter_map(|(side, info)| {
                    info.position.map(|position| Packet::SwitchedIn {
                        side: *side,
                        combatant: info.id,
                        position,
                    })
                })
                .collect()
        };
        for packet in entrances {
            events.publish(packet)?;
        }
        self.next_turn(events)
    }

    fn run_turn(&self, events: &EventPublisher) -> Result<()> {
        let script = self.turns.lock().unwrap().pop_front().unwrap_or_default();
        let wants_replacement = matches!(script.last(), Some(Packet::SwitchInRequest { .. }));
        self.publish_all(script, events)?;
        if wants_replacement {
            events.notify_phase(BattlePhase::WaitingForSwitchIns);
            return Ok(());
        }
        self.next_turn(events)
    }

    fn run_switches(&self, events: &EventPublisher) -> Result<()> {
        let incoming: Vec<_> = self
            .incoming
            .lock()
            .unwrap()
            .drain(..)
            .map(|(side, entry)| Packet::SwitchedIn {
                side,
                combatant: entry.combatant,
                position: entry.position,
            })
            .collect();
        self.publish_all(incoming, events)?;
        self.next_turn(events)
    }

    fn select_actions_if_valid(
        &self,
        side: Side,
        actions: &[ActionEntry],
        events: &EventPublisher,
    ) -> Result<bool> {
        self.actions.lock().unwrap().push((side, actions.to_vec()));
        let ready = {
            let mut submitted = self.submitted_this_turn.lock().unwrap();
            submitted.push(side);
            if submitted.len() == 2 {
                submitted.clear();
                true
            } else {
                false
            }
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
        self.switches.lock().unwrap().push((side, switches.to_vec()));
        self.incoming
            .lock()
            .unwrap()
            .extend(switches.iter().map(|entry| (side, *entry)));
        events.notify_phase(BattlePhase::ReadyToRunSwitches);
        Ok(true)
    }

    fn select_flee_if_valid(&self, _side: Side, events: &EventPublisher) -> Result<bool> {
        if !self.can_flee {
            return Ok(false);
        }
        events.publish(Packet::BattleResult {
            result: BattleResult::Fled,
        })?;
        events.notify_phase(BattlePhase::Ended(BattleResult::Fled));
        Ok(true)
    }
}

pub fn fainted(combatant: CombatantId, side: Side, position: FieldPosition) -> Packet {
    Packet::Fainted {
        combatant,
        slot: Slot::new(side, position),
    }
}

pub fn test_config() -> FrontendConfig {
    FrontendConfig::new(
        MessageConfig {
            chars_per_second: 0,
            ..MessageConfig::default()
        },
        AnimationConfig {
            reveal: Duration::from_millis(100),
        },
    )
}

pub fn session(engine: Arc<ScriptedEngine>) -> BattleSession {
    let runtime = BattleRuntime::builder()
        .engine(engine)
        .decider(FirstChoiceDecider)
        .build()
        .unwrap();
    let mut session = BattleSession::new(runtime, test_config());
    session.start().unwrap();
    session
}

/// Runs acknowledged frames until `done` holds.
pub fn drive_until(session: &mut BattleSession, done: impl Fn(&BattleSession) -> bool) {
    drive(session, true, done);
}

pub fn drive(
    session: &mut BattleSession,
    acknowledge: bool,
    done: impl Fn(&BattleSession) -> bool,
) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done(session) {
        assert!(Instant::now() < deadline, "session stalled: {:?}", session.view());
        session
            .frame(FrameInput::new(Duration::from_millis(50), acknowledge))
            .unwrap();
        thread::sleep(Duration::from_millis(1));
    }
}
