//! A deterministic blackjack round engine.
//!
//! The crate provides a [`Round`] type that drives the full round flow:
//! betting, the opening deal, insurance, player actions (including splits),
//! dealer play, and payouts. A table-driven basic-strategy advisor sits
//! alongside it, and a [`PracticeSession`] trainer grades decisions
//! against the same chart.
//!
//! The engine is synchronous and single-threaded: each intent mutates the
//! observable [`RoundState`] atomically and returns, leaving animation and
//! pacing to the caller.
//!
//! # Example
//!
//! ```no_run
//! use vingtun::{Round, Rules};
//!
//! let mut round = Round::new(Rules::default(), 42);
//! let _ = round.confirm_bet(100);
//! println!("phase: {:?}", round.state().phase);
//! ```

pub mod card;
pub mod error;
pub mod events;
pub mod hand;
pub mod payout;
pub mod persist;
pub mod practice;
pub mod round;
pub mod rules;
pub mod shoe;
pub mod strategy;

// Re-export main types
pub use card::{Card, DECK_SIZE, Rank, Suit};
pub use error::{ActionError, BetError, InsuranceError, PracticeError, RulesError};
pub use events::{ActionTally, RoundEvent, RoundObserver};
pub use hand::{DealerHand, Hand};
pub use payout::{OutcomeKind, Settlement, settle};
pub use persist::{MemoryStore, NullStore, StateStore};
pub use practice::{
    Feedback, PRACTICE_BONUS, PracticePhase, PracticeSession, STREAK_TARGET,
};
pub use round::{
    BONUS_AMOUNT, BlackjackResult, HANDS_PER_BONUS, Phase, Round, RoundError, RoundState,
    STARTING_BALANCE,
};
pub use rules::Rules;
pub use shoe::{CardSource, InfiniteShoe, Shoe};
pub use strategy::{Action, recommend};
