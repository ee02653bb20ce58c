//! Error types for engine operations.

use thiserror::Error;

/// Errors surfaced when validating a rule set.
///
/// Validation failures are recovered by substituting the default rule set;
/// they never reach the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RulesError {
    /// Deck count outside 1 through 8.
    #[error("deck count must be between 1 and 8")]
    InvalidDeckCount,
    /// Split allowance above the supported table limit.
    #[error("max splits exceeds the supported table limit")]
    InvalidMaxSplits,
    /// Reshuffle threshold outside (0, 1].
    #[error("reshuffle threshold must be within (0, 1]")]
    InvalidReshuffleThreshold,
}

/// Errors that can occur while placing or re-staking a bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BetError {
    /// Invalid phase for betting.
    #[error("invalid phase for betting")]
    InvalidState,
    /// Bet amount is zero.
    #[error("bet amount is zero")]
    ZeroBet,
    /// Bet exceeds the player's balance.
    #[error("insufficient funds")]
    InsufficientFunds,
}

/// Errors that can occur during player actions.
///
/// A rejected action leaves the round state untouched; the caller decides
/// whether to log or ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Invalid phase for this action.
    #[error("invalid phase for this action")]
    InvalidState,
    /// No active hand to act on.
    #[error("no active hand to act on")]
    HandUnavailable,
    /// Hand already stands at 21 or better.
    #[error("hand cannot take another card")]
    HandComplete,
    /// Cannot double down on this hand.
    #[error("cannot double down on this hand")]
    CannotDouble,
    /// Cannot split this hand.
    #[error("cannot split this hand")]
    CannotSplit,
    /// Maximum splits reached.
    #[error("maximum splits reached")]
    MaxSplitsReached,
    /// Insufficient funds for this action.
    #[error("insufficient funds for this action")]
    InsufficientFunds,
    /// The shoe ran out of cards; the round was aborted.
    #[error("the shoe ran out of cards")]
    ShoeExhausted,
}

/// Errors that can occur around the insurance side bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InsuranceError {
    /// Insurance is not currently offered.
    #[error("insurance is not currently offered")]
    NotOffered,
    /// Amount is zero or above half the main bet.
    #[error("insurance amount must be between 1 and half the bet")]
    InvalidAmount,
    /// Insufficient funds for the insurance bet.
    #[error("insufficient funds for insurance")]
    InsufficientFunds,
}

/// Errors that can occur in a practice session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PracticeError {
    /// Invalid practice phase for this request.
    #[error("invalid practice phase for this request")]
    InvalidState,
    /// The card source ran out of cards.
    #[error("the card source ran out of cards")]
    SourceExhausted,
}
