//! Round phases and the serializable state aggregate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hand::{DealerHand, Hand};

/// Default bankroll for a fresh (or broke) session.
pub const STARTING_BALANCE: u32 = 10_000;

/// Phase of the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Accepting a bet for the next round.
    Betting,
    /// Opening cards on the table; insurance may be pending.
    Dealing,
    /// Waiting for player actions on the active hand.
    PlayerTurn,
    /// Dealer plays out their hand.
    DealerTurn,
    /// Payouts applied; round results are on display.
    Resolution,
    /// Transient: round-scoped fields are being reset.
    ClearTable,
    /// Transient: the shoe is being replaced with a fresh shuffle.
    ShuffleDecks,
}

/// Natural (two-card 21) outcome of the opening deal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlackjackResult {
    /// No natural on either side.
    #[default]
    None,
    /// Player dealt a natural; paid at the configured premium.
    PlayerBlackjack,
    /// Dealer dealt a natural; the round ends before play.
    DealerBlackjack,
    /// Both sides dealt naturals; the stake is returned.
    Push,
}

/// Why a round was aborted to resolution without payouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RoundError {
    /// The shoe ran out of cards mid-round. The next round starts from a
    /// fresh shuffle.
    #[error("the shoe ran out of cards mid-round")]
    ShoeExhausted,
}

/// The full, serializable state of a round session.
///
/// Callers read it through [`Round::state`](crate::Round::state) to drive
/// their presentation; every mutation goes through an engine intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    /// Current phase.
    pub phase: Phase,
    /// Player hands; index 0 is the primary hand, later indexes exist only
    /// after splits.
    pub hands: Vec<Hand>,
    /// The dealer's hand.
    pub dealer: DealerHand,
    /// Which player hand currently receives actions.
    pub active_hand: usize,
    /// The bet being assembled or staked this round.
    pub current_bet: u32,
    /// The bet as confirmed at the start of the round.
    pub initial_bet: u32,
    /// Player bankroll. Unsigned: a bet that would overdraw is rejected
    /// before it is staked.
    pub balance: u32,
    /// Splits performed this round.
    pub split_count: u8,
    /// Staked insurance amount, zero when none.
    pub insurance_bet: u32,
    /// Whether the insurance side bet is currently on offer.
    pub insurance_offered: bool,
    /// Whether the player accepted insurance this round.
    pub insurance_accepted: bool,
    /// Natural outcome of the opening deal, if any.
    pub blackjack_result: BlackjackResult,
    /// Set when the round was aborted; no payouts were applied.
    pub round_error: Option<RoundError>,
    /// Hands resolved since the last bankroll bonus.
    pub hands_played: u32,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            phase: Phase::Betting,
            hands: Vec::new(),
            dealer: DealerHand::new(),
            active_hand: 0,
            current_bet: 0,
            initial_bet: 0,
            balance: STARTING_BALANCE,
            split_count: 0,
            insurance_bet: 0,
            insurance_offered: false,
            insurance_accepted: false,
            blackjack_result: BlackjackResult::None,
            round_error: None,
            hands_played: 0,
        }
    }
}
