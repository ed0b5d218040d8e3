//! Cross-frontend presentation logic for battles.
//!
//! Houses the packet dispatcher, the action and replacement collectors,
//! interactive target selection, message boxes and the per-battle session that
//! ties them to a [`battle_runtime::BattleRuntime`]. Nothing here draws; CLI
//! and graphical clients render from [`SessionView`] and
//! [`PresentationCommand`]s.
pub mod builders;
pub mod config;
pub mod dispatcher;
pub mod event;
pub mod format;
pub mod frontend;
pub mod menu;
pub mod message;
pub mod session;
pub mod targeting;

pub use builders::{ActionsBuilder, ActionsStep, SwitchRejection, SwitchesBuilder, SwitchesStep};
pub use config::{AnimationConfig, FrontendConfig, MessageConfig, MessageVisibility};
pub use dispatcher::PacketDispatcher;
pub use event::{EventImpact, FrameInput, PresentationCommand};
pub use frontend::Frontend;
pub use menu::{ActionMenu, ItemOption, MoveOption, Rejection, ReplacementMenu, SwitchOption};
pub use message::{MessageBox, MessageEntry, MessageLevel, MessageLog, MessageMode};
pub use session::{Awaiting, BattleSession, MenuOutcome, SessionError, SessionResult, SessionView};
pub use targeting::{CursorMove, TargetOutcome, TargetSelection};
