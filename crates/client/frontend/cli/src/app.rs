//! Headless frontend that plays the local side and prints the transcript.
use std::io::Write;
use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;
use battle_core::BattleResult;
use client_frontend_core::{
    Awaiting, BattleSession, FrameInput, Frontend, MenuOutcome, MessageLevel,
    PresentationCommand,
};
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::config::CliConfig;

/// Drives a [`BattleSession`] on a fixed frame interval, answering every menu
/// with a simple policy and echoing the message log to stdout.
pub struct AutoplayFrontend<W> {
    config: CliConfig,
    out: W,
    printed: u64,
}

impl<W: Write + Send> AutoplayFrontend<W> {
    pub fn new(config: CliConfig, out: W) -> Self {
        Self {
            config,
            out,
            printed: 0,
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Writes log entries pushed since the last call.
    fn print_new_messages(&mut self, session: &BattleSession) -> Result<()> {
        let log = session.message_log();
        for entry in log.since(self.printed) {
            let marker = match entry.level {
                MessageLevel::Info => "",
                MessageLevel::Warning => "! ",
            };
            match entry.turn {
                Some(turn) => writeln!(self.out, "[turn {turn:>2}] {marker}{}", entry.text)?,
                None => writeln!(self.out, "[       ] {marker}{}", entry.text)?,
            }
        }
        self.printed = log.total();
        Ok(())
    }

    fn apply_commands(session: &mut BattleSession) {
        for command in session.drain_commands() {
            match command {
                PresentationCommand::BeginClosing { result } => {
                    info!(%result, "battle screen closing");
                }
                other => debug!(command = ?other, "scene command"),
            }
        }
    }
}

/// Answers whatever menu is open. Returns whether a choice was made.
pub fn autoplay(session: &mut BattleSession) -> Result<bool> {
    match session.awaiting() {
        Awaiting::Nothing => Ok(false),
        Awaiting::Target => {
            session.confirm_target()?;
            Ok(true)
        }
        Awaiting::Action { .. } => {
            let Some(menu) = session.action_menu() else {
                return Ok(false);
            };
            let turn = session.view().turn.unwrap_or_default() as usize;
            let enabled: Vec<usize> = menu
                .moves
                .iter()
                .enumerate()
                .filter(|(_, option)| option.enabled)
                .map(|(index, _)| index)
                .collect();

            // Rotate through the usable moves so every kind of target shows up.
            for offset in 0..enabled.len() {
                let index = enabled[(turn + menu.index + offset) % enabled.len()];
                match session.choose_move(index)? {
                    MenuOutcome::Rejected(rejection) => {
                        debug!(%rejection, index, "move refused, trying the next one");
                    }
                    _ => return Ok(true),
                }
            }

            warn!(combatant = %menu.name, "no usable move, running away");
            session.choose_flee()?;
            Ok(true)
        }
        Awaiting::Replacement { .. } => {
            let Some(menu) = session.replacement_menu() else {
                return Ok(false);
            };
            let candidate = menu.candidates.iter().find(|option| option.enabled());
            let position = menu
                .positions
                .iter()
                .copied()
                .find(|&position| session.can_use_position(position));
            match (candidate, position) {
                (Some(candidate), Some(position)) => {
                    session.choose_replacement(candidate.combatant, position)?;
                    Ok(true)
                }
                _ => bail!("replacement requested with nothing to send in"),
            }
        }
    }
}

#[async_trait]
impl<W: Write + Send> Frontend for AutoplayFrontend<W> {
    async fn run(&mut self, mut session: BattleSession) -> Result<BattleResult> {
        info!(format = ?self.config.format, "starting autoplay");
        session.start()?;

        let mut ticker = interval(self.config.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last = Instant::now();

        for frame in 0..self.config.max_frames {
            ticker.tick().await;
            let now = Instant::now();
            let elapsed: Duration = now - last;
            last = now;

            session.frame(FrameInput::new(elapsed, self.config.auto_acknowledge))?;
            Self::apply_commands(&mut session);
            self.print_new_messages(&session)?;

            if let Some(result) = session.result() {
                info!(%result, frame, "battle finished");
                self.out.flush()?;
                return Ok(result);
            }

            if autoplay(&mut session)? {
                self.print_new_messages(&session)?;
            }
        }

        bail!(
            "battle did not finish within {} frames",
            self.config.max_frames
        )
    }
}
