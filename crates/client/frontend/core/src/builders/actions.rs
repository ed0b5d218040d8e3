use battle_core::{ActionEntry, CombatantId, Side, TurnAction};

/// What the collection needs next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionsStep {
    /// The player must choose for the combatant at `index`.
    Choose {
        index: usize,
        combatant: CombatantId,
    },
    /// Every slot is filled; the list is in slot order.
    Submit(Vec<ActionEntry>),
}

#[derive(Clone, Copy, Debug)]
struct Chosen {
    entry: ActionEntry,
    /// Pushed automatically because the combatant had no choice.
    forced: bool,
}

/// Walks a side's active combatants in slot order, one action each.
///
/// Combatants locked into an action are filled in automatically through the
/// `forced` lookup passed to [`begin`](Self::begin), [`push`](Self::push) and
/// [`pop`](Self::pop); stepping back skips over them to the most recent
/// choice the player actually made.
#[derive(Clone, Debug)]
pub struct ActionsBuilder {
    side: Side,
    combatants: Vec<CombatantId>,
    chosen: Vec<Chosen>,
}

impl ActionsBuilder {
    pub fn new(side: Side, combatants: Vec<CombatantId>) -> Self {
        Self {
            side,
            chosen: Vec::with_capacity(combatants.len()),
            combatants,
        }
    }

    /// First step of the collection.
    pub fn begin(&mut self, forced: impl Fn(CombatantId) -> Option<TurnAction>) -> ActionsStep {
        self.advance(&forced)
    }

    /// Records the player's action for the current slot.
    ///
    /// # Panics
    ///
    /// Panics if the collection is already complete.
    pub fn push(
        &mut self,
        action: TurnAction,
        forced: impl Fn(CombatantId) -> Option<TurnAction>,
    ) -> ActionsStep {
        let combatant = self
            .current()
            .unwrap_or_else(|| panic!("action pushed after the {} side was complete", self.side));
        self.chosen.push(Chosen {
            entry: ActionEntry::new(combatant, action),
            forced: false,
        });
        self.advance(&forced)
    }

    /// Whether there is a player-made choice to step back to.
    pub fn can_pop(&self) -> bool {
        self.chosen.iter().any(|chosen| !chosen.forced)
    }

    /// Discards the most recent player-made choice, and any forced actions
    /// recorded after it, and asks for that slot again.
    ///
    /// # Panics
    ///
    /// Panics when [`can_pop`](Self::can_pop) is false.
    pub fn pop(&mut self) -> ActionsStep {
        assert!(self.can_pop(), "pop with no player choice to revise");
        while let Some(last) = self.chosen.pop() {
            if !last.forced {
                break;
            }
        }
        let index = self.chosen.len();
        ActionsStep::Choose {
            index,
            combatant: self.combatants[index],
        }
    }

    /// Whether `combatant` was picked as a switch-in at an earlier slot.
    pub fn is_standby(&self, combatant: CombatantId) -> bool {
        self.chosen
            .iter()
            .any(|chosen| chosen.entry.action.switch_target() == Some(combatant))
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Index of the slot awaiting a choice.
    pub fn index(&self) -> usize {
        self.chosen.len()
    }

    /// Combatant awaiting a choice, `None` once complete.
    pub fn current(&self) -> Option<CombatantId> {
        self.combatants.get(self.chosen.len()).copied()
    }

    pub fn combatants(&self) -> &[CombatantId] {
        &self.combatants
    }

    pub fn is_complete(&self) -> bool {
        self.chosen.len() == self.combatants.len()
    }

    pub fn chosen(&self) -> impl Iterator<Item = &ActionEntry> {
        self.chosen.iter().map(|chosen| &chosen.entry)
    }

    fn advance(&mut self, forced: &dyn Fn(CombatantId) -> Option<TurnAction>) -> ActionsStep {
        while let Some(combatant) = self.current() {
            match forced(combatant) {
                Some(action) => self.chosen.push(Chosen {
                    entry: ActionEntry::new(combatant, action),
                    forced: true,
                }),
                None => {
                    return ActionsStep::Choose {
                        index: self.chosen.len(),
                        combatant,
                    };
                }
            }
        }
        ActionsStep::Submit(self.chosen().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{ItemId, MoveId, TargetMask};

    const A: CombatantId = CombatantId(0);
    const B: CombatantId = CombatantId(1);
    const C: CombatantId = CombatantId(2);
    const BENCH: CombatantId = CombatantId(5);

    fn no_force(_: CombatantId) -> Option<TurnAction> {
        None
    }

    fn attack(id: u16) -> TurnAction {
        TurnAction::Move {
            move_id: MoveId(id),
            targets: TargetMask::FOE_CENTER,
        }
    }

    #[test]
    fn n_pushes_submit_once_in_slot_order() {
        let mut builder = ActionsBuilder::new(Side::Ally, vec![A, B, C]);
        assert_eq!(builder.begin(no_force), ActionsStep::Choose { index: 0, combatant: A });
        assert_eq!(
            builder.push(attack(1), no_force),
            ActionsStep::Choose {
                index: 1,
                combatant: B
            }
        );
        assert_eq!(
            builder.push(TurnAction::Item { item_id: ItemId(2) }, no_force),
            ActionsStep::Choose { index: 2, combatant: C }
        );
        let ActionsStep::Submit(actions) = builder.push(attack(3), no_force) else {
            panic!("expected submission");
        };
        let order: Vec<_> = actions.iter().map(|entry| entry.combatant).collect();
        assert_eq!(order, vec![A, B, C]);
        assert!(builder.is_complete());
    }

    #[test]
    fn pop_then_push_restores_index_and_clears_standby() {
        let mut builder = ActionsBuilder::new(Side::Ally, vec![A, B]);
        builder.begin(no_force);
        builder.push(TurnAction::Switch { incoming: BENCH }, no_force);
        assert!(builder.is_standby(BENCH));

        assert_eq!(builder.pop(), ActionsStep::Choose { index: 0, combatant: A });
        assert!(!builder.is_standby(BENCH));
        assert!(!builder.can_pop());

        assert_eq!(
            builder.push(attack(1), no_force),
            ActionsStep::Choose {
                index: 1,
                combatant: B
            }
        );
        assert_eq!(builder.index(), 1);
        assert!(!builder.is_standby(BENCH));
    }

    #[test]
    fn forced_slots_are_pushed_automatically_and_skipped_on_pop() {
        let recharge = attack(9);
        let forced = |combatant: CombatantId| (combatant == B).then_some(recharge);

        let mut builder = ActionsBuilder::new(Side::Ally, vec![A, B, C]);
        assert_eq!(builder.begin(forced), ActionsStep::Choose { index: 0, combatant: A });
        assert_eq!(builder.push(attack(1), forced), ActionsStep::Choose { index: 2, combatant: C });

        // Going back from C skips B's locked action and lands on A.
        assert_eq!(builder.pop(), ActionsStep::Choose { index: 0, combatant: A });

        assert_eq!(builder.push(attack(2), forced), ActionsStep::Choose { index: 2, combatant: C });
        let ActionsStep::Submit(actions) = builder.push(attack(3), forced) else {
            panic!("expected submission");
        };
        assert_eq!(actions[1], ActionEntry::new(B, recharge));
    }

    #[test]
    fn fully_forced_side_submits_immediately() {
        let forced = |_| Some(attack(4));
        let mut builder = ActionsBuilder::new(Side::Ally, vec![A, B]);
        assert!(matches!(builder.begin(forced), ActionsStep::Submit(list) if list.len() == 2));
        assert!(!builder.can_pop());
    }

    #[test]
    #[should_panic(expected = "pop with no player choice")]
    fn pop_at_first_slot_is_a_protocol_violation() {
        let mut builder = ActionsBuilder::new(Side::Ally, vec![A, B]);
        builder.begin(no_force);
        builder.pop();
    }

    #[test]
    fn standby_only_counts_earlier_slots() {
        let mut builder = ActionsBuilder::new(Side::Ally, vec![A, B, C]);
        builder.begin(no_force);
        assert!(!builder.is_standby(BENCH));
        builder.push(attack(1), no_force);
        builder.push(TurnAction::Switch { incoming: BENCH }, no_force);
        assert!(builder.is_standby(BENCH));
        assert!(!builder.is_standby(A));
    }
}
