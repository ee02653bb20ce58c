//! Settlement types and the payout comparator.

use serde::{Deserialize, Serialize};

/// How a settled hand came out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    /// Hand went over 21; the stake is forfeited.
    Bust,
    /// Hand beat the dealer.
    Won,
    /// Dealer beat the hand.
    Lost,
    /// Tie; the stake is returned.
    Push,
    /// Opening two-card 21, paid at the configured premium.
    Blackjack,
    /// Dealer's opening two-card 21; the hand loses before play starts.
    DealerBlackjack,
}

/// Structured outcome for one hand.
///
/// `amount` is the display magnitude: the profit on a win, the stake on a
/// loss, the returned stake on a push. Formatting it for the player is
/// entirely the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// The outcome classification.
    pub kind: OutcomeKind,
    /// The display amount for the outcome.
    pub amount: u32,
}

/// Compares a final player total against the dealer total and returns the
/// amount credited back to the balance along with the hand's settlement.
///
/// Opening naturals never reach this comparator; they are paid at the
/// configured blackjack premium before any turn is taken.
#[must_use]
pub fn settle(player_value: u8, dealer_value: u8, bet: u32) -> (u32, Settlement) {
    if player_value > 21 {
        return (
            0,
            Settlement {
                kind: OutcomeKind::Bust,
                amount: bet,
            },
        );
    }
    if dealer_value > 21 || player_value > dealer_value {
        return (
            bet * 2,
            Settlement {
                kind: OutcomeKind::Won,
                amount: bet,
            },
        );
    }
    if player_value == dealer_value {
        return (
            bet,
            Settlement {
                kind: OutcomeKind::Push,
                amount: bet,
            },
        );
    }
    (
        0,
        Settlement {
            kind: OutcomeKind::Lost,
            amount: bet,
        },
    )
}
