//! Doubles battle engine with a fixed roster, used to exercise the runtime.
#![allow(dead_code)]

use std::sync::Mutex;

use battle_core::{
    ActionEntry, BattleFormat, BattlePhase, CombatantId, CombatantInfo, FieldPosition::*, ItemId,
    MoveId, MoveSlot, MoveTarget, Packet, PositionList, Side, SwitchEntry, TargetMask,
    TurnAction,
};
use battle_runtime::{BattleEngine, Controller, EventPublisher, Result};

pub const ALLY_LEFT: CombatantId = CombatantId(0);
pub const ALLY_RIGHT: CombatantId = CombatantId(1);
pub const ALLY_BENCH: CombatantId = CombatantId(2);
pub const FOE_LEFT: CombatantId = CombatantId(10);
pub const FOE_RIGHT: CombatantId = CombatantId(11);
pub const FOE_BENCH: CombatantId = CombatantId(12);

pub struct TestEngine {
    pub party: Vec<(Side, CombatantInfo)>,
    pub forced: Vec<(CombatantId, TurnAction)>,
    pub open: Vec<(Side, PositionList)>,
    pub turn_script: Vec<Packet>,
    pub accept: bool,
    pub submitted_actions: Mutex<Vec<(Side, Vec<ActionEntry>)>>,
    pub submitted_switches: Mutex<Vec<(Side, Vec<SwitchEntry>)>>,
}

impl TestEngine {
    pub fn doubles() -> Self {
        Self {
            party: vec![
                (Side::Ally, CombatantInfo::new(ALLY_LEFT, "Ember").at(Left)),
                (Side::Ally, CombatantInfo::new(ALLY_RIGHT, "Ripple").at(Right)),
                (Side::Ally, CombatantInfo::new(ALLY_BENCH, "Thorn")),
                (Side::Foe, CombatantInfo::new(FOE_LEFT, "Gale").at(Left)),
                (Side::Foe, CombatantInfo::new(FOE_RIGHT, "Boulder").at(Right)),
                (Side::Foe, CombatantInfo::new(FOE_BENCH, "Spark")),
            ],
            forced: Vec::new(),
            open: Vec::new(),
            turn_script: Vec::new(),
            accept: true,
            submitted_actions: Mutex::new(Vec::new()),
            submitted_switches: Mutex::new(Vec::new()),
        }
    }

    pub fn last_actions(&self) -> Option<(Side, Vec<ActionEntry>)> {
        self.submitted_actions.lock().unwrap().last().cloned()
    }

    pub fn last_switches(&self) -> Option<(Side, Vec<SwitchEntry>)> {
        self.submitted_switches.lock().unwrap().last().cloned()
    }
}

impl BattleEngine for TestEngine {
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
        self.party
            .iter()
            .filter(|(s, info)| *s == side && info.is_active())
            .map(|(_, info)| info.id)
            .collect()
    }

    fn party(&self, side: Side) -> Vec<CombatantInfo> {
        self.party
            .iter()
            .filter(|(s, _)| *s == side)
            .map(|(_, info)| info.clone())
            .collect()
    }

    fn combatant(&self, id: CombatantId) -> Option<CombatantInfo> {
        self.party
            .iter()
            .find(|(_, info)| info.id == id)
            .map(|(_, info)| info.clone())
    }

    fn moves(&self, _id: CombatantId) -> Vec<MoveSlot> {
        vec![
            MoveSlot::new(MoveId(1), 0, MoveTarget::SingleNotSelf),
            MoveSlot::new(MoveId(2), 10, MoveTarget::SingleFoeSurrounding),
            MoveSlot::new(MoveId(3), 5, MoveTarget::AllFoes),
        ]
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

    fn can_switch_out(&self, _id: CombatantId) -> bool {
        true
    }

    fn can_flee(&self, _side: Side) -> bool {
        true
    }

    fn open_positions(&self, side: Side) -> PositionList {
        self.open
            .iter()
            .find(|(s, _)| *s == side)
            .map(|(_, list)| list.clone())
            .unwrap_or_default()
    }

    fn move_name(&self, id: MoveId) -> String {
        format!("Move {}", id.0)
    }

    fn item_name(&self, id: ItemId) -> String {
        format!("Item {}", id.0)
    }

    fn begin(&self, events: &EventPublisher) -> Result<()> {
        events.publish(Packet::ActionsRequest { side: Side::Foe })?;
        events.notify_phase(BattlePhase::WaitingForActions);
        Ok(())
    }

    fn run_turn(&self, events: &EventPublisher) -> Result<()> {
        for packet in &self.turn_script {
            events.publish(packet.clone())?;
        }
        events.notify_phase(BattlePhase::WaitingForActions);
        Ok(())
    }

    fn run_switches(&self, events: &EventPublisher) -> Result<()> {
        events.notify_phase(BattlePhase::WaitingForActions);
        Ok(())
    }

    fn select_actions_if_valid(
        &self,
        side: Side,
        actions: &[ActionEntry],
        events: &EventPublisher,
    ) -> Result<bool> {
        if !self.accept {
            return Ok(false);
        }
        self.submitted_actions
            .lock()
            .unwrap()
            .push((side, actions.to_vec()));
        events.notify_phase(BattlePhase::ReadyToRunTurn);
        Ok(true)
    }

    fn select_switches_if_valid(
        &self,
        side: Side,
        switches: &[SwitchEntry],
        events: &EventPublisher,
    ) -> Result<bool> {
        self.submitted_switches
            .lock()
            .unwrap()
            .push((side, switches.to_vec()));
        events.notify_phase(BattlePhase::ReadyToRunSwitches);
        Ok(true)
    }

    fn select_flee_if_valid(&self, _side: Side, events: &EventPublisher) -> Result<bool> {
        events.notify_phase(BattlePhase::Ended(battle_core::BattleResult::Fled));
        Ok(self.accept)
    }
}
