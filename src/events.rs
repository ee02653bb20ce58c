//! Engine events and the observer sink.
//!
//! The engine itself keeps no metrics. Anything a caller wants to count or
//! animate is emitted here as a typed event; [`ActionTally`] is a ready-made
//! observer that accumulates the usual session counters.

use std::cell::RefCell;
use std::rc::Rc;

use crate::payout::{OutcomeKind, Settlement};
use crate::round::{Phase, RoundError};

/// Something observable that happened inside the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundEvent {
    /// The round moved between phases. Transient phases (clearing the table,
    /// reshuffling) surface here even when an intent passes through them in
    /// one call.
    PhaseChanged {
        /// Phase the round left.
        from: Phase,
        /// Phase the round entered.
        to: Phase,
    },
    /// A bet was confirmed and deducted from the balance.
    BetConfirmed {
        /// The confirmed amount.
        amount: u32,
    },
    /// The active hand drew a card.
    Hit,
    /// The active hand stood.
    Stood,
    /// The active hand doubled down.
    DoubledDown,
    /// The active hand was split into two.
    Split,
    /// A hand received its settlement.
    HandSettled {
        /// Index of the settled hand.
        hand: usize,
        /// The settlement applied.
        settlement: Settlement,
    },
    /// The insurance side bet was resolved.
    InsuranceSettled {
        /// Whether the insurance bet won.
        won: bool,
        /// Amount credited on a win, or the lost stake otherwise.
        amount: u32,
    },
    /// A bankroll bonus was credited.
    BonusAwarded {
        /// The credited amount.
        amount: u32,
    },
    /// The shoe was replaced with a fresh shuffle.
    ShoeReshuffled {
        /// Cards in the fresh shoe.
        cards_remaining: usize,
    },
    /// The round was aborted and forced to resolution without payouts.
    RoundAborted {
        /// Why the round was aborted.
        error: RoundError,
    },
}

/// Receiver for engine events.
pub trait RoundObserver {
    /// Called once per event, in emission order.
    fn on_event(&mut self, event: &RoundEvent);
}

impl<T: RoundObserver + ?Sized> RoundObserver for Box<T> {
    fn on_event(&mut self, event: &RoundEvent) {
        (**self).on_event(event);
    }
}

impl<T: RoundObserver> RoundObserver for Rc<RefCell<T>> {
    fn on_event(&mut self, event: &RoundEvent) {
        self.borrow_mut().on_event(event);
    }
}

/// Running per-session counters, fed by engine events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionTally {
    /// Bets confirmed.
    pub bets: u32,
    /// Total amount wagered across confirmed bets.
    pub total_wagered: u64,
    /// Hits taken.
    pub hits: u32,
    /// Stands taken.
    pub stands: u32,
    /// Double downs taken.
    pub doubles: u32,
    /// Splits performed.
    pub splits: u32,
    /// Player naturals.
    pub player_blackjacks: u32,
    /// Dealer naturals.
    pub dealer_blackjacks: u32,
    /// Pushes.
    pub pushes: u32,
}

impl ActionTally {
    /// Creates an empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Average confirmed bet, or zero before the first bet.
    #[must_use]
    pub fn average_bet(&self) -> f64 {
        if self.bets == 0 {
            0.0
        } else {
            self.total_wagered as f64 / f64::from(self.bets)
        }
    }
}

impl RoundObserver for ActionTally {
    fn on_event(&mut self, event: &RoundEvent) {
        match event {
            RoundEvent::BetConfirmed { amount } => {
                self.bets += 1;
                self.total_wagered += u64::from(*amount);
            }
            RoundEvent::Hit => self.hits += 1,
            RoundEvent::Stood => self.stands += 1,
            RoundEvent::DoubledDown => self.doubles += 1,
            RoundEvent::Split => self.splits += 1,
            RoundEvent::HandSettled { settlement, .. } => match settlement.kind {
                OutcomeKind::Blackjack => self.player_blackjacks += 1,
                OutcomeKind::DealerBlackjack => self.dealer_blackjacks += 1,
                OutcomeKind::Push => self.pushes += 1,
                OutcomeKind::Bust | OutcomeKind::Won | OutcomeKind::Lost => {}
            },
            RoundEvent::PhaseChanged { .. }
            | RoundEvent::InsuranceSettled { .. }
            | RoundEvent::BonusAwarded { .. }
            | RoundEvent::ShoeReshuffled { .. }
            | RoundEvent::RoundAborted { .. } => {}
        }
    }
}
