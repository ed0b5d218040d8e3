//! Trait describing a runnable battle frontend.
use anyhow::Result;
use async_trait::async_trait;
use battle_core::BattleResult;

use crate::session::BattleSession;

/// Frontend abstraction for UI layers.
///
/// A frontend owns the [`BattleSession`] for the duration of one battle and
/// drives it from its own frame loop:
/// - call [`BattleSession::frame`] once per frame with the elapsed time and
///   whether the player acknowledged
/// - apply [`BattleSession::drain_commands`] to its scene
/// - route menu input to the session's `choose_*` methods
///
/// Dropping the session ends the battle and cancels simulation threads still
/// waiting on the event pump.
///
/// # Example Implementation
///
/// ```no_run
/// use anyhow::Result;
/// use async_trait::async_trait;
/// use battle_core::BattleResult;
/// use client_frontend_core::{BattleSession, FrameInput, Frontend};
/// use std::time::Duration;
///
/// struct Headless;
///
/// #[async_trait]
/// impl Frontend for Headless {
///     async fn run(&mut self, mut session: BattleSession) -> Result<BattleResult> {
///         session.start()?;
///         loop {
///             session.frame(FrameInput::new(Duration::from_millis(16), true))?;
///             if let Some(result) = session.result() {
///                 return Ok(result);
///             }
///             tokio::time::sleep(Duration::from_millis(16)).await;
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Frontend: Send {
    /// Runs the battle to completion and returns its result.
    ///
    /// # Errors
    ///
    /// Returns an error if the session fails in a way the player cannot
    /// correct, such as a simulation thread that could not be spawned.
    async fn run(&mut self, session: BattleSession) -> Result<BattleResult>;
}
