use tracing::debug;

use crate::error::InsuranceError;

use super::Round;

impl Round {
    /// Maximum insurance stake for the current round: half the main bet.
    #[must_use]
    pub const fn max_insurance(&self) -> u32 {
        self.state.current_bet / 2
    }

    /// Accepts the insurance side bet for `amount`.
    ///
    /// The stake is deducted immediately; the offer closes and the dealer
    /// peeks for a natural.
    ///
    /// # Errors
    ///
    /// Rejected when no offer is open, when the amount is zero or above
    /// half the main bet, or when the balance cannot cover it.
    pub fn accept_insurance(&mut self, amount: u32) -> Result<(), InsuranceError> {
        if !self.state.insurance_offered {
            debug!("accept_insurance rejected: no open offer");
            return Err(InsuranceError::NotOffered);
        }
        if amount == 0 || amount > self.max_insurance() {
            return Err(InsuranceError::InvalidAmount);
        }
        if amount > self.state.balance {
            return Err(InsuranceError::InsufficientFunds);
        }

        self.state.insurance_bet = amount;
        self.state.balance -= amount;
        self.state.insurance_accepted = true;
        self.state.insurance_offered = false;

        self.check_naturals();
        self.persist();
        Ok(())
    }

    /// Declines the insurance offer; the dealer peeks for a natural.
    ///
    /// # Errors
    ///
    /// Rejected when no offer is open.
    pub fn decline_insurance(&mut self) -> Result<(), InsuranceError> {
        if !self.state.insurance_offered {
            debug!("decline_insurance rejected: no open offer");
            return Err(InsuranceError::NotOffered);
        }

        self.state.insurance_offered = false;
        self.state.insurance_accepted = false;

        self.check_naturals();
        self.persist();
        Ok(())
    }
}
