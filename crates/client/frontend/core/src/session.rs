//! One battle's presentation state, driven frame by frame.
use std::sync::Arc;

use battle_core::{
    BattleResult, CombatantId, FieldPosition, ItemId, MoveTarget, Side, TurnAction,
    resolve_targets,
};
use battle_runtime::api::slot_of;
use battle_runtime::{BattleEngine, BattleRuntime, Invocation, RuntimeError};
use thiserror::Error;
use tracing::{debug, info};

use crate::builders::{ActionsStep, SwitchRejection, SwitchesStep};
use crate::config::FrontendConfig;
use crate::dispatcher::{Collection, PacketDispatcher, PendingMove};
use crate::event::{EventImpact, FrameInput, PresentationCommand};
use crate::menu::{self, ActionMenu, Rejection, ReplacementMenu};
use crate::message::{MessageBox, MessageEntry, MessageLevel, MessageLog, MessageMode};
use crate::targeting::{CursorMove, TargetOutcome, TargetSelection};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no menu is waiting for this choice")]
    MenuClosed,

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Result of a menu choice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuOutcome {
    /// The move needs an interactive target pick.
    NeedsTarget,
    /// The next combatant's choice is requested.
    Next {
        index: usize,
        combatant: CombatantId,
    },
    NextReplacement {
        index: usize,
    },
    /// The collection was handed to the engine.
    Submitted,
    /// Refused; a static notice explains why and the menu is unchanged.
    Rejected(Rejection),
    /// Target selection was backed out of.
    Cancelled,
}

/// What a frontend should show right now.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Awaiting {
    Nothing,
    Action {
        index: usize,
        combatant: CombatantId,
    },
    Target,
    Replacement {
        index: usize,
    },
}

#[derive(Clone, Debug)]
pub struct SessionView<'a> {
    /// Printed part of the message on screen.
    pub message: Option<&'a str>,
    pub notice: Option<&'a str>,
    pub revealing: bool,
    pub turn: Option<u32>,
    pub awaiting: Awaiting,
    pub result: Option<BattleResult>,
}

/// Per-battle session: the runtime, the dispatcher and any open menu.
///
/// Owned by the presentation thread and dropped when the battle screen
/// closes, which cancels simulation threads still waiting on the pump.
pub struct BattleSession {
    runtime: BattleRuntime,
    dispatcher: PacketDispatcher,
    notice: Option<MessageBox>,
}

impl BattleSession {
    pub fn new(runtime: BattleRuntime, config: FrontendConfig) -> Self {
        Self {
            runtime,
            dispatcher: PacketDispatcher::new(config),
            notice: None,
        }
    }

    pub fn start(&mut self) -> SessionResult<()> {
        info!(target: "frontend::session", "battle session started");
        self.runtime.begin()?;
        Ok(())
    }

    /// Runs one frame: notice, on-screen message, then at most one new event.
    pub fn frame(&mut self, input: FrameInput) -> SessionResult<EventImpact> {
        let mut impact = EventImpact::none();
        let mut acknowledge = input.acknowledge;

        if let Some(notice) = &mut self.notice {
            if acknowledge {
                notice.acknowledge();
                acknowledge = false;
            }
            notice.advance(input.elapsed);
            if notice.is_closed() {
                self.notice = None;
            }
            impact = EventImpact::redraw();
        }

        impact = impact.combine(
            self.dispatcher
                .present(input.elapsed, acknowledge, &mut self.runtime),
        );
        impact = impact.combine(self.dispatcher.handle_next_event(&mut self.runtime)?);
        Ok(impact)
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            message: self.dispatcher.current_message().map(MessageBox::visible_text),
            notice: self.notice.as_ref().map(MessageBox::text),
            revealing: self.dispatcher.is_revealing(),
            turn: self.dispatcher.turn(),
            awaiting: self.awaiting(),
            result: self.dispatcher.result(),
        }
    }

    pub fn awaiting(&self) -> Awaiting {
        match self.dispatcher.collection() {
            Collection::None => Awaiting::Nothing,
            Collection::Actions {
                targeting: Some(_), ..
            } => Awaiting::Target,
            Collection::Actions { builder, .. } => match builder.current() {
                Some(combatant) => Awaiting::Action {
                    index: builder.index(),
                    combatant,
                },
                None => Awaiting::Nothing,
            },
            Collection::Switches(builder) => Awaiting::Replacement {
                index: builder.index(),
            },
        }
    }

    pub fn drain_commands(&mut self) -> Vec<PresentationCommand> {
        self.dispatcher.drain_commands()
    }

    pub fn message_log(&self) -> &MessageLog {
        self.dispatcher.message_log()
    }

    pub fn result(&self) -> Option<BattleResult> {
        self.dispatcher.result()
    }

    pub fn is_finished(&self) -> bool {
        self.result().is_some()
    }

    pub fn engine(&self) -> &Arc<dyn BattleEngine> {
        self.runtime.engine()
    }

    pub fn action_menu(&self) -> Option<ActionMenu> {
        match self.dispatcher.collection() {
            Collection::Actions {
                builder,
                targeting: None,
            } => ActionMenu::build(self.runtime.engine().as_ref(), builder),
            _ => None,
        }
    }

    pub fn replacement_menu(&self) -> Option<ReplacementMenu> {
        match self.dispatcher.collection() {
            Collection::Switches(builder) => {
                ReplacementMenu::build(self.runtime.engine().as_ref(), builder)
            }
            _ => None,
        }
    }

    pub fn target_selection(&self) -> Option<&TargetSelection> {
        match self.dispatcher.collection() {
            Collection::Actions {
                targeting: Some(pending),
                ..
            } => Some(&pending.selection),
            _ => None,
        }
    }

    /// Picks the move at `index` in the current combatant's move list.
    pub fn choose_move(&mut self, index: usize) -> SessionResult<MenuOutcome> {
        let engine = Arc::clone(self.runtime.engine());
        let (side, combatant) = self.open_action_slot()?;

        let slot = match menu::check_move(engine.as_ref(), combatant, index) {
            Ok(slot) => slot,
            Err(rejection) => return Ok(self.reject(rejection)),
        };

        let requester = slot_of(engine.as_ref(), side, combatant)?;
        let layout = resolve_targets(
            engine.format(),
            requester,
            slot.target,
            engine.target_restriction(combatant),
        )
        .map_err(RuntimeError::from)?;

        let interactive = engine.format().requires_target_selection()
            && !matches!(slot.target, MoveTarget::SelfTarget | MoveTarget::Varies)
            && layout.has_targets();
        if interactive {
            if let Collection::Actions { targeting, .. } = self.dispatcher.collection_mut() {
                *targeting = Some(PendingMove {
                    move_id: slot.move_id,
                    selection: TargetSelection::new(layout),
                });
            }
            return Ok(MenuOutcome::NeedsTarget);
        }

        self.push_action(TurnAction::Move {
            move_id: slot.move_id,
            targets: layout.implicit_targets(),
        })
    }

    /// Moves the target cursor. Returns whether it moved.
    pub fn move_cursor(&mut self, direction: CursorMove) -> SessionResult<bool> {
        match self.dispatcher.collection_mut() {
            Collection::Actions {
                targeting: Some(pending),
                ..
            } => Ok(pending.selection.move_cursor(direction)),
            _ => Err(SessionError::MenuClosed),
        }
    }

    pub fn confirm_target(&mut self) -> SessionResult<MenuOutcome> {
        let Collection::Actions { targeting, .. } = self.dispatcher.collection_mut() else {
            return Err(SessionError::MenuClosed);
        };
        let pending = targeting.take().ok_or(SessionError::MenuClosed)?;
        match pending.selection.confirm() {
            TargetOutcome::Selected(targets) => self.push_action(TurnAction::Move {
                move_id: pending.move_id,
                targets,
            }),
            TargetOutcome::Cancelled => Ok(MenuOutcome::Cancelled),
        }
    }

    pub fn cancel_target(&mut self) -> SessionResult<MenuOutcome> {
        match self.dispatcher.collection_mut() {
            Collection::Actions { targeting, .. } if targeting.is_some() => {
                *targeting = None;
                Ok(MenuOutcome::Cancelled)
            }
            _ => Err(SessionError::MenuClosed),
        }
    }

    pub fn choose_item(&mut self, item_id: ItemId) -> SessionResult<MenuOutcome> {
        let (side, _) = self.open_action_slot()?;
        if let Err(rejection) = menu::check_item(self.runtime.engine().as_ref(), side, item_id) {
            return Ok(self.reject(rejection));
        }
        self.push_action(TurnAction::Item { item_id })
    }

    /// Switches the current combatant out for `incoming`.
    pub fn choose_switch(&mut self, incoming: CombatantId) -> SessionResult<MenuOutcome> {
        let (_, outgoing) = self.open_action_slot()?;
        let checked = match self.dispatcher.collection() {
            Collection::Actions { builder, .. } => {
                menu::check_switch(self.runtime.engine().as_ref(), builder, outgoing, incoming)
            }
            _ => return Err(SessionError::MenuClosed),
        };
        if let Err(rejection) = checked {
            return Ok(self.reject(rejection));
        }
        self.push_action(TurnAction::Switch { incoming })
    }

    /// Abandons the collection and asks the engine to end the battle by fleeing.
    pub fn choose_flee(&mut self) -> SessionResult<MenuOutcome> {
        let (side, _) = self.open_action_slot()?;
        if let Err(rejection) = menu::check_flee(self.runtime.engine().as_ref(), side) {
            return Ok(self.reject(rejection));
        }
        self.dispatcher.close_collection();
        self.runtime.spawn(Invocation::Flee { side })?;
        Ok(MenuOutcome::Submitted)
    }

    /// Steps back to the previous player-made choice.
    pub fn undo(&mut self) -> SessionResult<MenuOutcome> {
        let outcome = match self.dispatcher.collection_mut() {
            Collection::None => return Err(SessionError::MenuClosed),
            Collection::Actions { targeting, .. } if targeting.is_some() => {
                *targeting = None;
                Some(MenuOutcome::Cancelled)
            }
            Collection::Actions { builder, .. } if builder.can_pop() => match builder.pop() {
                ActionsStep::Choose { index, combatant } => {
                    Some(MenuOutcome::Next { index, combatant })
                }
                ActionsStep::Submit(_) => unreachable!("pop always reopens a slot"),
            },
            Collection::Switches(builder) if builder.can_pop() => match builder.pop() {
                SwitchesStep::Choose { index } => Some(MenuOutcome::NextReplacement { index }),
                SwitchesStep::Submit(_) => unreachable!("pop always reopens a replacement"),
            },
            Collection::Actions { .. } | Collection::Switches(_) => None,
        };
        Ok(outcome.unwrap_or_else(|| self.reject(Rejection::NothingToUndo)))
    }

    /// Sends `incoming` into the open `position`.
    pub fn choose_replacement(
        &mut self,
        incoming: CombatantId,
        position: FieldPosition,
    ) -> SessionResult<MenuOutcome> {
        let side = match self.dispatcher.collection() {
            Collection::Switches(builder) => builder.side(),
            _ => return Err(SessionError::MenuClosed),
        };

        let info = match menu::check_replacement(self.runtime.engine().as_ref(), side, incoming) {
            Ok(info) => info,
            Err(rejection) => return Ok(self.reject(rejection)),
        };

        let pushed = match self.dispatcher.collection_mut() {
            Collection::Switches(builder) => builder.push(incoming, position),
            _ => return Err(SessionError::MenuClosed),
        };
        let step = match pushed {
            Ok(step) => step,
            Err(SwitchRejection::PositionUnavailable(position))
            | Err(SwitchRejection::AlreadyClaimed(position)) => {
                return Ok(self.reject(Rejection::PositionTaken { position }));
            }
            Err(SwitchRejection::StandingBy(_)) => {
                return Ok(self.reject(Rejection::StandingBy { name: info.name }));
            }
        };

        match step {
            SwitchesStep::Choose { index } => Ok(MenuOutcome::NextReplacement { index }),
            SwitchesStep::Submit(switches) => {
                debug!(
                    target: "frontend::session",
                    %side,
                    count = switches.len(),
                    "submitting replacements"
                );
                self.dispatcher.close_collection();
                self.runtime
                    .spawn(Invocation::SubmitSwitches { side, switches })?;
                Ok(MenuOutcome::Submitted)
            }
        }
    }

    /// Whether a replacement menu may offer `position`.
    pub fn can_use_position(&self, position: FieldPosition) -> bool {
        match self.dispatcher.collection() {
            Collection::Switches(builder) => builder.can_use_position(position),
            _ => false,
        }
    }

    fn open_action_slot(&self) -> SessionResult<(Side, CombatantId)> {
        match self.dispatcher.collection() {
            Collection::Actions {
                builder,
                targeting: None,
            } => builder
                .current()
                .map(|combatant| (builder.side(), combatant))
                .ok_or(SessionError::MenuClosed),
            _ => Err(SessionError::MenuClosed),
        }
    }

    fn push_action(&mut self, action: TurnAction) -> SessionResult<MenuOutcome> {
        let engine = Arc::clone(self.runtime.engine());
        let Collection::Actions { builder, .. } = self.dispatcher.collection_mut() else {
            return Err(SessionError::MenuClosed);
        };
        let side = builder.side();
        match builder.push(action, |id| engine.forced_action(id)) {
            ActionsStep::Choose { index, combatant } => Ok(MenuOutcome::Next { index, combatant }),
            ActionsStep::Submit(actions) => {
                debug!(
                    target: "frontend::session",
                    %side,
                    count = actions.len(),
                    "submitting actions"
                );
                self.dispatcher.close_collection();
                self.runtime
                    .spawn(Invocation::SubmitActions { side, actions })?;
                Ok(MenuOutcome::Submitted)
            }
        }
    }

    fn reject(&mut self, rejection: Rejection) -> MenuOutcome {
        let text = rejection.to_string();
        debug!(target: "frontend::session", %text, "choice rejected");
        let turn = self.dispatcher.turn();
        self.dispatcher
            .log_mut()
            .push(MessageEntry::new(text.clone(), turn, MessageLevel::Warning));
        self.notice = Some(MessageBox::new(
            text,
            MessageMode::Static,
            &self.dispatcher.config().messages,
        ));
        MenuOutcome::Rejected(rejection)
    }
}
