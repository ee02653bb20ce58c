use crate::card::Rank;
use crate::events::RoundEvent;
use crate::hand::Hand;
use crate::payout::{OutcomeKind, Settlement};

use super::{BlackjackResult, Phase, Round};

impl Round {
    /// Deals the opening four cards in player, dealer-up, player, hole
    /// order, then either opens the insurance offer (dealer shows an ace)
    /// or runs the natural check.
    pub(super) fn deal_initial(&mut self) {
        let bet = self.state.current_bet;
        self.state.hands = vec![Hand::new(bet)];
        self.state.dealer.clear();
        self.state.active_hand = 0;
        self.state.split_count = 0;
        self.state.insurance_bet = 0;
        self.state.insurance_offered = false;
        self.state.insurance_accepted = false;
        self.state.blackjack_result = BlackjackResult::None;
        self.state.round_error = None;

        for step in 0..4 {
            let Some(card) = self.draw_or_abort() else {
                return;
            };
            if step % 2 == 0 {
                self.state.hands[0].push(card);
            } else {
                self.state.dealer.push(card);
            }
        }

        let upcard_is_ace = self
            .state
            .dealer
            .up_card()
            .is_some_and(|card| card.rank == Rank::Ace);

        if upcard_is_ace {
            // Wait for the insurance decision before peeking.
            self.state.insurance_offered = true;
        } else {
            self.check_naturals();
        }
    }

    /// Checks both opening hands for naturals once the deal (and the
    /// insurance decision, when one was offered) is complete.
    ///
    /// A player natural short-circuits the round: push against a dealer
    /// natural, otherwise paid at the configured premium. Failing that, a
    /// ten-or-ace upcard makes the dealer peek; a dealer natural ends the
    /// round before play, settling insurance first. Otherwise play begins.
    pub(super) fn check_naturals(&mut self) {
        let bet = self.state.hands[0].bet();

        if self.state.hands[0].is_blackjack() {
            self.state.dealer.reveal_hole();

            let settlement = if self.state.dealer.is_blackjack() {
                self.state.balance += bet;
                self.state.blackjack_result = BlackjackResult::Push;
                Settlement {
                    kind: OutcomeKind::Push,
                    amount: bet,
                }
            } else {
                let winnings = (f64::from(bet) * self.rules.blackjack_payout) as u32;
                self.state.balance += bet + winnings;
                self.state.blackjack_result = BlackjackResult::PlayerBlackjack;
                Settlement {
                    kind: OutcomeKind::Blackjack,
                    amount: winnings,
                }
            };

            self.state.hands[0].settle(settlement);
            self.emit(RoundEvent::HandSettled {
                hand: 0,
                settlement,
            });
            self.set_phase(Phase::Resolution);
            return;
        }

        let dealer_can_have_natural = self
            .state
            .dealer
            .up_card()
            .is_some_and(|card| card.rank == Rank::Ace || card.rank.is_ten_valued());

        if dealer_can_have_natural && self.state.dealer.is_blackjack() {
            if self.state.insurance_accepted {
                let payout = self.state.insurance_bet * 2;
                self.state.balance += payout;
                self.emit(RoundEvent::InsuranceSettled {
                    won: true,
                    amount: payout,
                });
            }

            self.state.dealer.reveal_hole();
            self.state.blackjack_result = BlackjackResult::DealerBlackjack;
            let settlement = Settlement {
                kind: OutcomeKind::DealerBlackjack,
                amount: bet,
            };
            self.state.hands[0].settle(settlement);
            self.emit(RoundEvent::HandSettled {
                hand: 0,
                settlement,
            });
            self.set_phase(Phase::Resolution);
            return;
        }

        if self.state.insurance_accepted {
            // No dealer natural: the insurance stake is simply gone.
            self.emit(RoundEvent::InsuranceSettled {
                won: false,
                amount: self.state.insurance_bet,
            });
        }
        self.set_phase(Phase::PlayerTurn);
    }
}
