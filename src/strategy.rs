//! Basic-strategy advisor.
//!
//! A pure lookup over the standard chart, used for in-game hints and for
//! grading practice answers. Precedence is pairs, then soft totals, then
//! hard totals: a pair of aces splits even though it is also a soft 12.

use serde::{Deserialize, Serialize};

use crate::card::{Card, Rank};
use crate::hand;

/// Recommended play for a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Draw another card.
    Hit,
    /// Keep the current hand.
    Stand,
    /// Double the stake and draw exactly one card.
    Double,
    /// Split the pair into two hands.
    Split,
}

/// Returns the basic-strategy action for `player` against `dealer_upcard`.
///
/// `can_double` gates the chart's double entries; where doubling is not
/// available each table specifies its fallback (hit or stand) explicitly.
/// Hands of fewer than two cards recommend a hit.
#[must_use]
pub fn recommend(player: &[Card], dealer_upcard: Card, can_double: bool) -> Action {
    if player.len() < 2 {
        return Action::Hit;
    }

    let dealer = dealer_upcard.rank.value();

    if player.len() == 2 && player[0].rank == player[1].rank {
        if let Some(action) = pair_action(player[0].rank, dealer, can_double) {
            return action;
        }
    }

    if hand::is_soft(player) {
        if let Some(action) = soft_action(non_ace_total(player), dealer, can_double) {
            return action;
        }
    }

    hard_action(hand::value(player), dealer, can_double)
}

/// Pair table, keyed by the paired rank. Face-card pairs fall through to the
/// hard table (a standing 20 either way).
fn pair_action(rank: Rank, dealer: u8, can_double: bool) -> Option<Action> {
    let action = match rank {
        Rank::Ace | Rank::Eight => Action::Split,
        Rank::Ten => Action::Stand,
        Rank::Nine => {
            if (2..=6).contains(&dealer) || dealer == 8 || dealer == 9 {
                Action::Split
            } else {
                Action::Stand
            }
        }
        Rank::Seven | Rank::Three | Rank::Two => {
            if (2..=7).contains(&dealer) {
                Action::Split
            } else {
                Action::Hit
            }
        }
        Rank::Six => {
            if (2..=6).contains(&dealer) {
                Action::Split
            } else {
                Action::Hit
            }
        }
        Rank::Five => {
            if (2..=9).contains(&dealer) && can_double {
                Action::Double
            } else {
                Action::Hit
            }
        }
        Rank::Four => {
            if (5..=6).contains(&dealer) {
                Action::Split
            } else {
                Action::Hit
            }
        }
        Rank::Jack | Rank::Queen | Rank::King => return None,
    };
    Some(action)
}

/// Soft table, keyed by the total of the non-ace cards.
fn soft_action(non_ace: u8, dealer: u8, can_double: bool) -> Option<Action> {
    let action = match non_ace {
        9 | 8 => Action::Stand,
        7 => {
            if (3..=6).contains(&dealer) && can_double {
                Action::Double
            } else if (2..=8).contains(&dealer) {
                Action::Stand
            } else {
                Action::Hit
            }
        }
        6 => {
            if (3..=6).contains(&dealer) && can_double {
                Action::Double
            } else {
                Action::Hit
            }
        }
        5 | 4 => {
            if (4..=6).contains(&dealer) && can_double {
                Action::Double
            } else {
                Action::Hit
            }
        }
        3 | 2 => {
            if (5..=6).contains(&dealer) && can_double {
                Action::Double
            } else {
                Action::Hit
            }
        }
        _ => return None,
    };
    Some(action)
}

/// Hard table, keyed by the hand total.
fn hard_action(total: u8, dealer: u8, can_double: bool) -> Action {
    match total {
        17..=21 => Action::Stand,
        13..=16 => {
            if (2..=6).contains(&dealer) {
                Action::Stand
            } else {
                Action::Hit
            }
        }
        12 => {
            if (4..=6).contains(&dealer) {
                Action::Stand
            } else {
                Action::Hit
            }
        }
        11 => {
            if can_double {
                Action::Double
            } else {
                Action::Hit
            }
        }
        10 => {
            if (2..=9).contains(&dealer) && can_double {
                Action::Double
            } else {
                Action::Hit
            }
        }
        9 => {
            if (3..=6).contains(&dealer) && can_double {
                Action::Double
            } else {
                Action::Hit
            }
        }
        _ => Action::Hit,
    }
}

fn non_ace_total(player: &[Card]) -> u8 {
    player.iter().fold(0u8, |total, card| {
        if card.rank == Rank::Ace {
            total
        } else {
            total.saturating_add(card.rank.value())
        }
    })
}
