use tracing::debug;

use crate::card::{Card, Rank};
use crate::error::ActionError;
use crate::events::RoundEvent;
use crate::hand::Hand;
use crate::payout::{OutcomeKind, Settlement};

use super::{Phase, Round};

impl Round {
    fn ensure_player_turn(&self) -> Result<(), ActionError> {
        if self.state.phase != Phase::PlayerTurn {
            debug!(phase = ?self.state.phase, "action rejected outside player turn");
            return Err(ActionError::InvalidState);
        }
        if self.state.active_hand >= self.state.hands.len() {
            return Err(ActionError::HandUnavailable);
        }
        Ok(())
    }

    /// Player action: hit the active hand.
    ///
    /// A bust settles the hand immediately and advances; an exact 21 also
    /// ends the hand's turn.
    ///
    /// # Errors
    ///
    /// Rejected outside the player turn, without an actionable hand, on a
    /// hand already at 21 or more, or when the shoe runs out (which aborts
    /// the round).
    pub fn hit(&mut self) -> Result<Card, ActionError> {
        self.ensure_player_turn()?;

        let index = self.state.active_hand;
        if self.state.hands[index].is_empty() {
            return Err(ActionError::HandUnavailable);
        }
        if self.state.hands[index].value() >= 21 {
            return Err(ActionError::HandComplete);
        }

        let Some(card) = self.draw_or_abort() else {
            return Err(ActionError::ShoeExhausted);
        };
        self.state.hands[index].push(card);
        self.emit(RoundEvent::Hit);

        if self.state.hands[index].is_busted() {
            self.settle_bust(index);
            self.advance_hand();
        } else if self.state.hands[index].value() == 21 {
            self.state.hands[index].set_standing();
            self.advance_hand();
        }

        self.persist();
        Ok(card)
    }

    /// Player action: stand on the active hand.
    ///
    /// # Errors
    ///
    /// Rejected outside the player turn or without an actionable hand.
    pub fn stand(&mut self) -> Result<(), ActionError> {
        self.ensure_player_turn()?;

        let index = self.state.active_hand;
        self.state.hands[index].set_standing();
        self.emit(RoundEvent::Stood);
        self.advance_hand();
        self.persist();
        Ok(())
    }

    /// Player action: double down on the active hand.
    ///
    /// Deducts a second stake, doubles the hand's bet, draws exactly one
    /// card, and advances whatever the outcome.
    ///
    /// # Errors
    ///
    /// Rejected outside the player turn, when doubling is disabled, on a
    /// hand that is not exactly two cards, without the funds to match the
    /// stake, or when the shoe runs out (which aborts the round).
    pub fn double_down(&mut self) -> Result<Card, ActionError> {
        self.ensure_player_turn()?;

        if !self.rules.allow_double_down {
            return Err(ActionError::CannotDouble);
        }
        let index = self.state.active_hand;
        if self.state.hands[index].len() != 2 {
            return Err(ActionError::CannotDouble);
        }
        let bet = self.state.hands[index].bet();
        if self.state.balance < bet {
            return Err(ActionError::InsufficientFunds);
        }

        let Some(card) = self.draw_or_abort() else {
            return Err(ActionError::ShoeExhausted);
        };

        self.state.balance -= bet;
        self.state.hands[index].double_bet();
        self.state.hands[index].push(card);
        self.emit(RoundEvent::DoubledDown);

        if self.state.hands[index].is_busted() {
            self.settle_bust(index);
        } else {
            self.state.hands[index].set_standing();
        }
        self.advance_hand();
        self.persist();
        Ok(card)
    }

    /// Player action: split the active pair into two hands.
    ///
    /// The second card seeds a new hand staked with a duplicate bet; the
    /// active hand draws its replacement card at once. Split aces complete
    /// both hands with a single card each and pass play straight onward;
    /// no further action is allowed on them.
    ///
    /// # Errors
    ///
    /// Rejected outside the player turn, when splitting is disabled or
    /// exhausted, on anything but a two-card pair, without the funds for
    /// the duplicate stake, or when the shoe runs out (which aborts the
    /// round).
    #[expect(
        clippy::missing_panics_doc,
        reason = "take_split_card always succeeds on a checked pair"
    )]
    pub fn split(&mut self) -> Result<(), ActionError> {
        self.ensure_player_turn()?;

        if !self.rules.allow_split {
            return Err(ActionError::CannotSplit);
        }
        if self.state.split_count >= self.rules.max_splits {
            return Err(ActionError::MaxSplitsReached);
        }
        let index = self.state.active_hand;
        if !self.state.hands[index].is_pair() {
            return Err(ActionError::CannotSplit);
        }
        let bet = self.state.hands[index].bet();
        if self.state.balance < bet {
            return Err(ActionError::InsufficientFunds);
        }

        let split_rank = self.state.hands[index].cards()[0].rank;
        let second = self.state.hands[index]
            .take_split_card()
            .expect("pair was checked above");
        self.state.hands.push(Hand::from_split(second, bet));
        self.state.balance -= bet;
        self.state.split_count += 1;
        self.emit(RoundEvent::Split);

        let Some(card) = self.draw_or_abort() else {
            return Err(ActionError::ShoeExhausted);
        };
        self.state.hands[index].push(card);

        if split_rank == Rank::Ace {
            // Split aces take one card each and are done.
            let last = self.state.hands.len() - 1;
            let Some(card) = self.draw_or_abort() else {
                return Err(ActionError::ShoeExhausted);
            };
            self.state.hands[last].push(card);
            self.state.hands[index].set_standing();
            self.state.hands[last].set_standing();
            self.advance_hand();
        } else if self.state.hands[index].value() == 21 {
            // A post-split 21 is not a natural; it just ends the hand.
            self.state.hands[index].set_standing();
            self.advance_hand();
        }

        self.persist();
        Ok(())
    }

    pub(super) fn settle_bust(&mut self, index: usize) {
        let settlement = Settlement {
            kind: OutcomeKind::Bust,
            amount: self.state.hands[index].bet(),
        };
        self.state.hands[index].settle(settlement);
        self.emit(RoundEvent::HandSettled { hand: index, settlement });
    }

    /// Moves play to the next unfinished hand, dealing its second card on
    /// activation, or hands over to the dealer when none remain. A table
    /// where every hand busted skips the dealer draw-out entirely.
    pub(super) fn advance_hand(&mut self) {
        if self.state.hands.iter().all(Hand::is_busted) {
            for index in 0..self.state.hands.len() {
                if !self.state.hands[index].is_settled() {
                    self.settle_bust(index);
                }
            }
            self.state.dealer.reveal_hole();
            self.resolve_round();
            return;
        }

        loop {
            let next = (self.state.active_hand + 1..self.state.hands.len()).find(|&index| {
                !self.state.hands[index].is_standing() && !self.state.hands[index].is_settled()
            });

            let Some(index) = next else {
                self.dealer_turn();
                return;
            };

            self.state.active_hand = index;

            if self.state.hands[index].len() == 1 {
                let Some(card) = self.draw_or_abort() else {
                    return;
                };
                self.state.hands[index].push(card);

                if self.state.hands[index].value() == 21 {
                    // Post-split 21: nothing left to decide on this hand.
                    self.state.hands[index].set_standing();
                    continue;
                }
            }

            return;
        }
    }
}
