//! Reacts to packets and phase notices one at a time.
//!
//! The dispatcher owns two independent pieces of state. The presenting state
//! tracks what is on screen for the packet currently held by the pump; the
//! collection state tracks an open action or replacement menu. Only an idle
//! presenting state takes the next event, so a held packet is always released
//! after its reaction has finished, while silent packets keep flowing under an
//! open menu.
use std::mem;
use std::sync::Arc;
use std::time::Duration;

use battle_core::{BattlePhase, BattleResult, MoveId, Packet, Side, Slot};
use battle_runtime::{
    BattleEngine, BattleRuntime, Controller, Invocation, PendingEvent, Result as RuntimeResult,
};
use tracing::{debug, trace};

use crate::builders::{ActionsBuilder, ActionsStep, SwitchesBuilder, SwitchesStep};
use crate::config::FrontendConfig;
use crate::event::{EventImpact, PresentationCommand};
use crate::format;
use crate::message::{MessageBox, MessageEntry, MessageLevel, MessageLog, MessageMode};
use crate::targeting::TargetSelection;

#[derive(Clone, Debug)]
pub(crate) enum Presenting {
    Idle,
    Message(MessageBox),
    Reveal {
        remaining: Duration,
        then: Option<MessageBox>,
    },
    Closed(BattleResult),
}

/// A move waiting for the player to pick its target.
#[derive(Clone, Debug)]
pub(crate) struct PendingMove {
    pub(crate) move_id: MoveId,
    pub(crate) selection: TargetSelection,
}

#[derive(Clone, Debug)]
pub(crate) enum Collection {
    None,
    Actions {
        builder: ActionsBuilder,
        targeting: Option<PendingMove>,
    },
    Switches(SwitchesBuilder),
}

pub struct PacketDispatcher {
    config: FrontendConfig,
    presenting: Presenting,
    collection: Collection,
    log: MessageLog,
    commands: Vec<PresentationCommand>,
    turn: Option<u32>,
}

impl PacketDispatcher {
    pub fn new(config: FrontendConfig) -> Self {
        Self {
            log: MessageLog::new(config.messages.capacity),
            config,
            presenting: Presenting::Idle,
            collection: Collection::None,
            commands: Vec::new(),
            turn: None,
        }
    }

    /// Takes and reacts to at most one pending event.
    ///
    /// Does nothing while a message or animation is still on screen.
    pub fn handle_next_event(&mut self, runtime: &mut BattleRuntime) -> RuntimeResult<EventImpact> {
        if !matches!(self.presenting, Presenting::Idle) {
            return Ok(EventImpact::none());
        }

        match runtime.next_pending() {
            Some(PendingEvent::Packet(packet)) => self.on_packet(packet, runtime),
            Some(PendingEvent::Phase(phase)) => self.on_phase(phase, runtime),
            None => Ok(EventImpact::none()),
        }
    }

    /// Advances the message or animation on screen and releases the held
    /// packet once it is done.
    pub fn present(
        &mut self,
        elapsed: Duration,
        acknowledge: bool,
        runtime: &mut BattleRuntime,
    ) -> EventImpact {
        match &mut self.presenting {
            Presenting::Idle | Presenting::Closed(_) => EventImpact::none(),
            Presenting::Message(message) => {
                if acknowledge {
                    message.acknowledge();
                }
                message.advance(elapsed);
                if message.is_closed() {
                    self.finish(runtime);
                }
                EventImpact::redraw()
            }
            Presenting::Reveal { remaining, then } => {
                *remaining = remaining.saturating_sub(elapsed);
                if remaining.is_zero() {
                    match then.take() {
                        Some(message) => self.show_box(message),
                        None => self.finish(runtime),
                    }
                }
                EventImpact::redraw()
            }
        }
    }

    pub fn current_message(&self) -> Option<&MessageBox> {
        match &self.presenting {
            Presenting::Message(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_revealing(&self) -> bool {
        matches!(self.presenting, Presenting::Reveal { .. })
    }

    pub fn result(&self) -> Option<BattleResult> {
        match self.presenting {
            Presenting::Closed(result) => Some(result),
            _ => None,
        }
    }

    pub fn message_log(&self) -> &MessageLog {
        &self.log
    }

    pub fn turn(&self) -> Option<u32> {
        self.turn
    }

    pub fn drain_commands(&mut self) -> Vec<PresentationCommand> {
        mem::take(&mut self.commands)
    }

    pub(crate) fn collection(&self) -> &Collection {
        &self.collection
    }

    pub(crate) fn collection_mut(&mut self) -> &mut Collection {
        &mut self.collection
    }

    pub(crate) fn close_collection(&mut self) {
        self.collection = Collection::None;
    }

    pub(crate) fn log_mut(&mut self) -> &mut MessageLog {
        &mut self.log
    }

    pub(crate) fn config(&self) -> &FrontendConfig {
        &self.config
    }

    fn on_packet(
        &mut self,
        packet: Packet,
        runtime: &mut BattleRuntime,
    ) -> RuntimeResult<EventImpact> {
        trace!(target: "frontend::dispatch", kind = packet.kind(), "packet");
        let engine = Arc::clone(runtime.engine());

        if packet.is_silent() {
            runtime.release();
            return Ok(EventImpact::none());
        }

        match packet {
            Packet::ActionsRequest { side } => {
                runtime.release();
                self.request_actions(side, engine.as_ref(), runtime)?;
            }
            Packet::SwitchInRequest { side, count } => {
                runtime.release();
                self.request_switches(side, count, engine.as_ref(), runtime)?;
            }
            Packet::Fainted { combatant, slot } => {
                self.commands.push(PresentationCommand::DetachVisual { slot });
                self.commands.push(PresentationCommand::RecordFaint { combatant });
                self.show_described(&packet, engine.as_ref(), runtime);
            }
            Packet::SwitchedIn {
                side,
                combatant,
                position,
            } => {
                self.commands.push(PresentationCommand::AttachVisual {
                    slot: Slot::new(side, position),
                    combatant,
                });
                self.show_described(&packet, engine.as_ref(), runtime);
            }
            Packet::Revealed { combatant, kind } => {
                self.commands
                    .push(PresentationCommand::RevealSprite { combatant, kind });
                let visibility = &self.config.messages.visibility;
                let then = format::describe(&packet, engine.as_ref(), visibility)
                    .map(|text| self.message_box(text));
                self.presenting = Presenting::Reveal {
                    remaining: self.config.animation.reveal,
                    then,
                };
            }
            Packet::TurnBegan { turn } => {
                self.turn = Some(turn);
                self.show_described(&packet, engine.as_ref(), runtime);
            }
            other => self.show_described(&other, engine.as_ref(), runtime),
        }
        Ok(EventImpact::redraw())
    }

    fn on_phase(
        &mut self,
        phase: BattlePhase,
        runtime: &mut BattleRuntime,
    ) -> RuntimeResult<EventImpact> {
        match phase {
            BattlePhase::ReadyToRunTurn => runtime.spawn(Invocation::RunTurn)?,
            BattlePhase::ReadyToRunSwitches => runtime.spawn(Invocation::RunSwitches)?,
            BattlePhase::Ended(result) => {
                debug!(target: "frontend::dispatch", %result, "battle ended");
                self.collection = Collection::None;
                self.presenting = Presenting::Closed(result);
                self.commands
                    .push(PresentationCommand::BeginClosing { result });
                return Ok(EventImpact::redraw());
            }
            BattlePhase::ReadyToBegin
            | BattlePhase::WaitingForActions
            | BattlePhase::WaitingForSwitchIns => {
                debug!(target: "frontend::dispatch", phase = phase.as_str(), "phase notice");
            }
        }
        Ok(EventImpact::none())
    }

    fn request_actions(
        &mut self,
        side: Side,
        engine: &dyn BattleEngine,
        runtime: &mut BattleRuntime,
    ) -> RuntimeResult<()> {
        if engine.controller(side) == Controller::Automated {
            return runtime.spawn(Invocation::DecideActions { side });
        }

        let mut builder = ActionsBuilder::new(side, engine.active(side));
        match builder.begin(|id| engine.forced_action(id)) {
            ActionsStep::Choose { index, combatant } => {
                debug!(
                    target: "frontend::dispatch",
                    %side,
                    index,
                    %combatant,
                    "collecting actions"
                );
                self.collection = Collection::Actions {
                    builder,
                    targeting: None,
                };
                Ok(())
            }
            ActionsStep::Submit(actions) => {
                self.collection = Collection::None;
                runtime.spawn(Invocation::SubmitActions { side, actions })
            }
        }
    }

    fn request_switches(
        &mut self,
        side: Side,
        count: u8,
        engine: &dyn BattleEngine,
        runtime: &mut BattleRuntime,
    ) -> RuntimeResult<()> {
        if engine.controller(side) == Controller::Automated {
            return runtime.spawn(Invocation::DecideSwitches { side, count });
        }

        let builder = SwitchesBuilder::new(side, count, engine.open_positions(side));
        match builder.begin() {
            SwitchesStep::Choose { .. } => {
                debug!(target: "frontend::dispatch", %side, count, "collecting replacements");
                self.collection = Collection::Switches(builder);
                Ok(())
            }
            SwitchesStep::Submit(switches) => {
                self.collection = Collection::None;
                runtime.spawn(Invocation::SubmitSwitches { side, switches })
            }
        }
    }

    fn show_described(
        &mut self,
        packet: &Packet,
        engine: &dyn BattleEngine,
        runtime: &mut BattleRuntime,
    ) {
        match format::describe(packet, engine, &self.config.messages.visibility) {
            Some(text) => {
                let message = self.message_box(text);
                self.show_box(message);
            }
            None => {
                runtime.release();
            }
        }
    }

    fn message_box(&self, text: String) -> MessageBox {
        MessageBox::new(text, MessageMode::AutoAdvance, &self.config.messages)
    }

    fn show_box(&mut self, message: MessageBox) {
        self.log
            .push(MessageEntry::new(message.text(), self.turn, MessageLevel::Info));
        self.presenting = Presenting::Message(message);
    }

    fn finish(&mut self, runtime: &mut BattleRuntime) {
        self.presenting = Presenting::Idle;
        runtime.release();
    }
}
