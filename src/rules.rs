//! Table rules configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::RulesError;

/// Hands a single round can grow to, counting the original hand.
const MAX_TABLE_HANDS: u8 = 8;

/// Immutable rule set for a round engine instance.
///
/// Use the builder methods to customize:
///
/// ```
/// use vingtun::Rules;
///
/// let rules = Rules::default().with_num_decks(6).with_max_splits(3);
/// assert_eq!(rules.num_decks, 6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    /// Number of decks in the shoe (1 through 8).
    pub num_decks: u8,
    /// Premium paid on an opening natural, as a multiple of the bet.
    pub blackjack_payout: f64,
    /// Whether the dealer re-hits a soft 17.
    pub dealer_hits_soft17: bool,
    /// Whether doubling down is allowed.
    pub allow_double_down: bool,
    /// Whether splitting pairs is allowed.
    pub allow_split: bool,
    /// Maximum number of splits per round.
    pub max_splits: u8,
    /// Whether surrender is allowed. Configuration surface only; the engine
    /// exposes no surrender intent.
    pub allow_surrender: bool,
    /// Fraction of the shoe remaining that schedules a reshuffle, in (0, 1].
    pub reshuffle_threshold: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            num_decks: 4,
            blackjack_payout: 1.5,
            dealer_hits_soft17: false,
            allow_double_down: true,
            allow_split: true,
            max_splits: 1,
            allow_surrender: false,
            reshuffle_threshold: 0.25,
        }
    }
}

impl Rules {
    /// Sets the number of decks.
    #[must_use]
    pub const fn with_num_decks(mut self, num_decks: u8) -> Self {
        self.num_decks = num_decks;
        self
    }

    /// Sets the blackjack premium.
    ///
    /// ```
    /// use vingtun::Rules;
    ///
    /// let rules = Rules::default().with_blackjack_payout(1.2);
    /// assert_eq!(rules.blackjack_payout, 1.2);
    /// ```
    #[must_use]
    pub const fn with_blackjack_payout(mut self, payout: f64) -> Self {
        self.blackjack_payout = payout;
        self
    }

    /// Sets whether the dealer re-hits a soft 17.
    #[must_use]
    pub const fn with_dealer_hits_soft17(mut self, hits: bool) -> Self {
        self.dealer_hits_soft17 = hits;
        self
    }

    /// Sets whether doubling down is allowed.
    #[must_use]
    pub const fn with_allow_double_down(mut self, allowed: bool) -> Self {
        self.allow_double_down = allowed;
        self
    }

    /// Sets whether splitting is allowed.
    #[must_use]
    pub const fn with_allow_split(mut self, allowed: bool) -> Self {
        self.allow_split = allowed;
        self
    }

    /// Sets the maximum number of splits per round.
    #[must_use]
    pub const fn with_max_splits(mut self, max_splits: u8) -> Self {
        self.max_splits = max_splits;
        self
    }

    /// Sets whether surrender is allowed.
    #[must_use]
    pub const fn with_allow_surrender(mut self, allowed: bool) -> Self {
        self.allow_surrender = allowed;
        self
    }

    /// Sets the reshuffle threshold.
    #[must_use]
    pub const fn with_reshuffle_threshold(mut self, threshold: f64) -> Self {
        self.reshuffle_threshold = threshold;
        self
    }

    /// Validates the rule set.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint: deck count outside 1 through 8,
    /// more splits than the table can seat, or a reshuffle threshold outside
    /// (0, 1].
    pub fn validate(&self) -> Result<(), RulesError> {
        if !(1..=8).contains(&self.num_decks) {
            return Err(RulesError::InvalidDeckCount);
        }
        if self.max_splits >= MAX_TABLE_HANDS {
            return Err(RulesError::InvalidMaxSplits);
        }
        if !(self.reshuffle_threshold > 0.0 && self.reshuffle_threshold <= 1.0) {
            return Err(RulesError::InvalidReshuffleThreshold);
        }
        Ok(())
    }

    /// Returns the rule set if valid, otherwise the defaults.
    ///
    /// Configuration mistakes never reach the player; a bad rule set plays
    /// the house defaults.
    #[must_use]
    pub fn validated_or_default(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(error) => {
                warn!(%error, "rule validation failed, using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_are_valid() {
        assert_eq!(Rules::default().validate(), Ok(()));
    }

    #[test]
    fn out_of_range_fields_are_rejected() {
        assert_eq!(
            Rules::default().with_num_decks(0).validate(),
            Err(RulesError::InvalidDeckCount)
        );
        assert_eq!(
            Rules::default().with_num_decks(9).validate(),
            Err(RulesError::InvalidDeckCount)
        );
        assert_eq!(
            Rules::default().with_max_splits(8).validate(),
            Err(RulesError::InvalidMaxSplits)
        );
        assert_eq!(
            Rules::default().with_reshuffle_threshold(0.0).validate(),
            Err(RulesError::InvalidReshuffleThreshold)
        );
        assert_eq!(
            Rules::default().with_reshuffle_threshold(1.5).validate(),
            Err(RulesError::InvalidReshuffleThreshold)
        );
    }

    #[test]
    fn invalid_rules_fall_back_to_defaults() {
        let rules = Rules::default().with_num_decks(12).validated_or_default();
        assert_eq!(rules, Rules::default());

        let rules = Rules::default().with_num_decks(2).validated_or_default();
        assert_eq!(rules.num_decks, 2);
    }
}
