//! Collection state machines for a side's turn and for replacements.
//!
//! Both builders are owned by the presentation thread and hand a completed,
//! immutable list to the engine once every slot has been filled.

mod actions;
mod switches;

pub use actions::{ActionsBuilder, ActionsStep};
pub use switches::{SwitchRejection, SwitchesBuilder, SwitchesStep};
