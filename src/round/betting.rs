use tracing::debug;

use crate::error::BetError;
use crate::events::RoundEvent;

use super::{Phase, Round};

impl Round {
    /// Adds chips to the pending bet while betting is open.
    ///
    /// # Errors
    ///
    /// Rejected outside the betting phase or when the raised bet would
    /// exceed the balance.
    pub fn add_to_bet(&mut self, amount: u32) -> Result<(), BetError> {
        if self.state.phase != Phase::Betting {
            debug!(phase = ?self.state.phase, "add_to_bet rejected");
            return Err(BetError::InvalidState);
        }

        let raised = self
            .state
            .current_bet
            .checked_add(amount)
            .ok_or(BetError::InsufficientFunds)?;
        if raised > self.state.balance {
            return Err(BetError::InsufficientFunds);
        }

        self.state.current_bet = raised;
        self.persist();
        Ok(())
    }

    /// Clears the pending bet.
    ///
    /// # Errors
    ///
    /// Rejected outside the betting phase.
    pub fn clear_bet(&mut self) -> Result<(), BetError> {
        if self.state.phase != Phase::Betting {
            return Err(BetError::InvalidState);
        }
        self.state.current_bet = 0;
        self.persist();
        Ok(())
    }

    /// Bets the whole balance.
    ///
    /// # Errors
    ///
    /// Rejected outside the betting phase.
    pub fn all_in(&mut self) -> Result<(), BetError> {
        if self.state.phase != Phase::Betting {
            return Err(BetError::InvalidState);
        }
        self.state.current_bet = self.state.balance;
        self.persist();
        Ok(())
    }

    /// Confirms a bet and deals the opening cards.
    ///
    /// The amount is deducted up front and snapshotted as the round's
    /// initial bet. A scheduled reshuffle runs before the deal.
    ///
    /// # Errors
    ///
    /// Rejected outside the betting phase, for a zero bet, or for a bet
    /// above the balance.
    pub fn confirm_bet(&mut self, amount: u32) -> Result<(), BetError> {
        if self.state.phase != Phase::Betting {
            debug!(phase = ?self.state.phase, "confirm_bet rejected");
            return Err(BetError::InvalidState);
        }
        if amount == 0 {
            return Err(BetError::ZeroBet);
        }
        if amount > self.state.balance {
            return Err(BetError::InsufficientFunds);
        }

        self.state.current_bet = amount;
        self.state.initial_bet = amount;
        self.state.balance -= amount;
        self.emit(RoundEvent::BetConfirmed { amount });

        if self.pending_shuffle {
            self.set_phase(Phase::ShuffleDecks);
            self.replace_shoe();
        }
        self.set_phase(Phase::Dealing);
        self.deal_initial();
        self.persist();
        Ok(())
    }

    /// Re-stakes the previous bet and deals the next round, clearing the
    /// table (and reshuffling when scheduled) on the way.
    ///
    /// # Errors
    ///
    /// Rejected outside the resolution phase, when no previous bet exists,
    /// or when the balance no longer covers it.
    pub fn repeat_bet(&mut self) -> Result<(), BetError> {
        if self.state.phase != Phase::Resolution {
            debug!(phase = ?self.state.phase, "repeat_bet rejected");
            return Err(BetError::InvalidState);
        }
        let amount = self.state.current_bet;
        if amount == 0 {
            return Err(BetError::ZeroBet);
        }
        if amount > self.state.balance {
            return Err(BetError::InsufficientFunds);
        }

        self.state.balance -= amount;
        self.pass_through_clear_table();
        self.set_phase(Phase::Dealing);
        self.deal_initial();
        self.persist();
        Ok(())
    }

    /// Clears the table back to betting so a different amount can be
    /// staked, reshuffling on the way when scheduled.
    ///
    /// # Errors
    ///
    /// Rejected outside the resolution phase.
    pub fn change_bet(&mut self) -> Result<(), BetError> {
        if self.state.phase != Phase::Resolution {
            debug!(phase = ?self.state.phase, "change_bet rejected");
            return Err(BetError::InvalidState);
        }

        self.pass_through_clear_table();
        self.set_phase(Phase::Betting);
        self.persist();
        Ok(())
    }
}
