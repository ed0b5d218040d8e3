//! Interactive target selection over a resolved [`TargetLayout`].
//!
//! The grid has a foe row on top, an ally row below it, and a back button
//! underneath. The cursor only ever rests on an enabled slot or on the back
//! button; moves towards absent or disabled slots are ignored.
use battle_core::{CursorRow, TargetCursor, TargetLayout, TargetMask};

/// Direction pressed by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorMove {
    Left,
    Right,
    Up,
    Down,
}

/// Result of confirming the current cursor position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetOutcome {
    Selected(TargetMask),
    Cancelled,
}

#[derive(Clone, Debug)]
pub struct TargetSelection {
    layout: TargetLayout,
    cursor: TargetCursor,
}

impl TargetSelection {
    pub fn new(layout: TargetLayout) -> Self {
        let cursor = layout.initial_cursor();
        Self { layout, cursor }
    }

    pub fn layout(&self) -> &TargetLayout {
        &self.layout
    }

    pub fn cursor(&self) -> TargetCursor {
        self.cursor
    }

    /// Slots that would be hit if the player confirmed now.
    pub fn highlighted(&self) -> TargetMask {
        self.layout
            .slot_at_cursor(self.cursor)
            .and_then(|slot| self.layout.targets_for(slot))
            .unwrap_or_default()
    }

    /// Moves the cursor. Returns whether it moved.
    pub fn move_cursor(&mut self, direction: CursorMove) -> bool {
        let next = match (self.cursor.row, direction) {
            (CursorRow::Back, CursorMove::Left | CursorMove::Right) => None,
            (row, CursorMove::Left) => self.scan(row, self.cursor.column, -1),
            (row, CursorMove::Right) => self.scan(row, self.cursor.column, 1),
            (CursorRow::Foe, CursorMove::Down) => Some(
                self.enabled_at(CursorRow::Ally, self.cursor.column)
                    .unwrap_or(TargetCursor::back(self.cursor.column)),
            ),
            (CursorRow::Ally, CursorMove::Down) => Some(TargetCursor::back(self.cursor.column)),
            (CursorRow::Back, CursorMove::Down) => None,
            (CursorRow::Back, CursorMove::Up) => self
                .enabled_at(CursorRow::Ally, self.cursor.column)
                .or_else(|| self.enabled_at(CursorRow::Foe, self.cursor.column)),
            (CursorRow::Ally, CursorMove::Up) => {
                self.enabled_at(CursorRow::Foe, self.cursor.column)
            }
            (CursorRow::Foe, CursorMove::Up) => None,
        };

        match next {
            Some(cursor) if cursor != self.cursor => {
                self.cursor = cursor;
                true
            }
            _ => false,
        }
    }

    pub fn confirm(&self) -> TargetOutcome {
        match self.layout.slot_at_cursor(self.cursor) {
            Some(slot) => self
                .layout
                .targets_for(slot)
                .map_or(TargetOutcome::Cancelled, TargetOutcome::Selected),
            None => TargetOutcome::Cancelled,
        }
    }

    fn enabled_at(&self, row: CursorRow, column: u8) -> Option<TargetCursor> {
        let cursor = TargetCursor::new(row, column);
        self.layout.slot_at_cursor(cursor).map(|_| cursor)
    }

    /// Nearest enabled slot from `column` in `step` direction within `row`.
    fn scan(&self, row: CursorRow, column: u8, step: i8) -> Option<TargetCursor> {
        let columns = self.layout.format().columns() as i8;
        let mut next = column as i8 + step;
        while (0..columns).contains(&next) {
            if let Some(cursor) = self.enabled_at(row, next as u8) {
                return Some(cursor);
            }
            next += step;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{BattleFormat, FieldPosition::*, MoveTarget, Slot, resolve_targets};

    fn selection(format: BattleFormat, requester: Slot, category: MoveTarget) -> TargetSelection {
        TargetSelection::new(resolve_targets(format, requester, category, None).unwrap())
    }

    #[test]
    fn horizontal_moves_skip_disabled_slots() {
        // From the left column only the center ally is adjacent.
        let mut target = selection(
            BattleFormat::Triple,
            Slot::ally(Left),
            MoveTarget::SingleAllySurrounding,
        );
        assert_eq!(target.cursor(), TargetCursor::new(CursorRow::Ally, 1));
        assert!(!target.move_cursor(CursorMove::Left));
        assert!(!target.move_cursor(CursorMove::Right));

        let mut target = selection(
            BattleFormat::Triple,
            Slot::ally(Center),
            MoveTarget::SingleAllySurrounding,
        );
        assert_eq!(target.cursor(), TargetCursor::new(CursorRow::Ally, 0));
        assert!(target.move_cursor(CursorMove::Right));
        assert_eq!(target.cursor(), TargetCursor::new(CursorRow::Ally, 2));
    }

    #[test]
    fn down_from_foe_row_falls_through_to_back() {
        let mut target = selection(
            BattleFormat::Double,
            Slot::ally(Left),
            MoveTarget::SingleFoeSurrounding,
        );
        assert_eq!(target.cursor(), TargetCursor::new(CursorRow::Foe, 0));
        assert!(target.move_cursor(CursorMove::Down));
        assert!(target.cursor().is_back());
        assert_eq!(target.confirm(), TargetOutcome::Cancelled);

        assert!(target.move_cursor(CursorMove::Up));
        assert_eq!(target.cursor(), TargetCursor::new(CursorRow::Foe, 0));
    }

    #[test]
    fn up_from_back_prefers_the_ally_row() {
        let mut target =
            selection(BattleFormat::Double, Slot::ally(Left), MoveTarget::SingleNotSelf);
        assert!(target.move_cursor(CursorMove::Right));
        assert_eq!(target.cursor(), TargetCursor::new(CursorRow::Foe, 1));
        assert!(target.move_cursor(CursorMove::Down));
        assert_eq!(target.cursor(), TargetCursor::new(CursorRow::Ally, 1));
        assert!(target.move_cursor(CursorMove::Down));
        assert!(target.cursor().is_back());
        assert!(target.move_cursor(CursorMove::Up));
        assert_eq!(target.cursor(), TargetCursor::new(CursorRow::Ally, 1));
        assert!(target.move_cursor(CursorMove::Up));
        assert_eq!(target.cursor(), TargetCursor::new(CursorRow::Foe, 1));
        assert!(!target.move_cursor(CursorMove::Up));
    }

    #[test]
    fn confirm_yields_the_slot_mask() {
        let mut target =
            selection(BattleFormat::Double, Slot::ally(Right), MoveTarget::SingleNotSelf);
        // Ally right sits in column 1; the foe drawn above it is foe left.
        assert_eq!(target.cursor(), TargetCursor::new(CursorRow::Foe, 1));
        assert_eq!(target.confirm(), TargetOutcome::Selected(TargetMask::FOE_LEFT));
        assert!(target.move_cursor(CursorMove::Left));
        assert_eq!(target.highlighted(), TargetMask::FOE_RIGHT);
    }

    #[test]
    fn multi_target_confirms_the_shared_mask() {
        let mut target =
            selection(BattleFormat::Double, Slot::ally(Left), MoveTarget::AllSurrounding);
        let expected = TargetMask::ALLY_RIGHT | TargetMask::FOE_LEFT | TargetMask::FOE_RIGHT;
        assert_eq!(target.confirm(), TargetOutcome::Selected(expected));
        assert!(target.move_cursor(CursorMove::Down));
        assert_eq!(target.cursor(), TargetCursor::back(0));
        assert!(target.move_cursor(CursorMove::Up));
        assert_eq!(target.cursor(), TargetCursor::new(CursorRow::Foe, 0));
    }
}
