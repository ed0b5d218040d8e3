use battle_core::{CombatantId, FieldPosition, PositionList, Side, SwitchEntry};
use thiserror::Error;

/// What the replacement pass needs next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SwitchesStep {
    /// The player must pick the replacement at `index`.
    Choose { index: usize },
    /// Every open position is claimed.
    Submit(Vec<SwitchEntry>),
}

/// Why a replacement pick was refused. The pass is left unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SwitchRejection {
    #[error("position {0} is not waiting for a replacement")]
    PositionUnavailable(FieldPosition),
    #[error("position {0} was already claimed this pass")]
    AlreadyClaimed(FieldPosition),
    #[error("combatant {0} is already standing by")]
    StandingBy(CombatantId),
}

/// Collects one bench combatant per open position after a faint.
///
/// Unlike [`ActionsBuilder`](super::ActionsBuilder) the positions are not
/// walked in order: each push names the position it fills, and may use any
/// open position that has not been claimed earlier in the pass.
#[derive(Clone, Debug)]
pub struct SwitchesBuilder {
    side: Side,
    open: PositionList,
    count: usize,
    chosen: Vec<SwitchEntry>,
}

impl SwitchesBuilder {
    /// `count` is clamped to the number of open positions.
    pub fn new(side: Side, count: u8, open: PositionList) -> Self {
        let count = usize::from(count).min(open.len());
        Self {
            side,
            open,
            count,
            chosen: Vec::with_capacity(count),
        }
    }

    pub fn begin(&self) -> SwitchesStep {
        self.step()
    }

    pub fn push(
        &mut self,
        combatant: CombatantId,
        position: FieldPosition,
    ) -> Result<SwitchesStep, SwitchRejection> {
        assert!(
            self.chosen.len() < self.count,
            "replacement pushed after the {} side was complete",
            self.side
        );
        if !self.open.contains(&position) {
            return Err(SwitchRejection::PositionUnavailable(position));
        }
        if self.is_claimed(position) {
            return Err(SwitchRejection::AlreadyClaimed(position));
        }
        if self.is_standby(combatant) {
            return Err(SwitchRejection::StandingBy(combatant));
        }
        self.chosen.push(SwitchEntry::new(combatant, position));
        Ok(self.step())
    }

    /// Whether a menu may offer `position` for the current pick.
    pub fn can_use_position(&self, position: FieldPosition) -> bool {
        self.open.contains(&position) && !self.is_claimed(position)
    }

    /// Open positions still unclaimed, in layout order.
    pub fn available_positions(&self) -> impl Iterator<Item = FieldPosition> + '_ {
        self.open
            .iter()
            .copied()
            .filter(|&position| !self.is_claimed(position))
    }

    pub fn can_pop(&self) -> bool {
        !self.chosen.is_empty()
    }

    /// # Panics
    ///
    /// Panics when nothing has been chosen yet.
    pub fn pop(&mut self) -> SwitchesStep {
        assert!(self.can_pop(), "pop at the first replacement");
        self.chosen.pop();
        self.step()
    }

    /// Whether `combatant` was already picked in this pass.
    pub fn is_standby(&self, combatant: CombatantId) -> bool {
        self.chosen.iter().any(|entry| entry.combatant == combatant)
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn index(&self) -> usize {
        self.chosen.len()
    }

    /// Number of replacements this pass collects.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_complete(&self) -> bool {
        self.chosen.len() == self.count
    }

    fn is_claimed(&self, position: FieldPosition) -> bool {
        self.chosen.iter().any(|entry| entry.position == position)
    }

    fn step(&self) -> SwitchesStep {
        if self.is_complete() {
            SwitchesStep::Submit(self.chosen.clone())
        } else {
            SwitchesStep::Choose {
                index: self.chosen.len(),
            }
        }
    }
}
