//! Configuration errors raised while interpreting move and format data.
//!
//! These indicate malformed data (an unknown targeting category, a format the
//! presentation layer cannot lay out) and are not recoverable at runtime.
//! User-correctable situations are never expressed through this type.
use thiserror::Error;

use crate::field::{BattleFormat, FieldPosition};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown move targeting category `{0}`")]
    UnknownMoveTarget(String),

    #[error("unknown battle format `{0}`")]
    UnknownFormat(String),

    #[error("position {position} does not take part in targeting in {format} battles")]
    PositionNotInFormat {
        format: BattleFormat,
        position: FieldPosition,
    },
}
