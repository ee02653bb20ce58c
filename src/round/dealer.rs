use crate::events::RoundEvent;
use crate::hand::Hand;
use crate::payout;

use super::{Phase, Round};

impl Round {
    /// Plays out the dealer's hand and resolves the round.
    ///
    /// The hole card is revealed first. With no live player hand left the
    /// dealer draws nothing; otherwise the dealer draws to 17, re-hitting a
    /// soft 17 when the rules say so.
    pub(super) fn dealer_turn(&mut self) {
        self.set_phase(Phase::DealerTurn);
        self.state.dealer.reveal_hole();

        let any_live = self.state.hands.iter().any(|hand| !hand.is_busted());
        if any_live {
            loop {
                let value = self.state.dealer.value();
                let hits_soft_17 =
                    value == 17 && self.state.dealer.is_soft() && self.rules.dealer_hits_soft17;
                if value >= 17 && !hits_soft_17 {
                    break;
                }
                let Some(card) = self.draw_or_abort() else {
                    return;
                };
                self.state.dealer.push(card);
            }
        }

        self.resolve_round();
    }

    /// Settles every hand that does not already carry a settlement, credits
    /// the total payout, and enters resolution.
    pub(super) fn resolve_round(&mut self) {
        let dealer_value = self.state.dealer.value();
        let mut total: u32 = 0;

        for index in 0..self.state.hands.len() {
            if self.state.hands[index].is_settled() {
                continue;
            }
            let hand: &Hand = &self.state.hands[index];
            let (payout, settlement) = payout::settle(hand.value(), dealer_value, hand.bet());
            total += payout;
            self.state.hands[index].settle(settlement);
            self.emit(RoundEvent::HandSettled { hand: index, settlement });
        }

        self.state.balance += total;
        self.set_phase(Phase::Resolution);
    }
}
