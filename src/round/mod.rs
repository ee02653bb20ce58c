//! Round engine and state management.
//!
//! [`Round`] is the aggregate root: it owns the shoe, the rules, and the
//! serializable [`RoundState`], and advances them through caller intents.
//! Every intent runs to completion on the calling thread and leaves the
//! state fully consistent before returning; any pacing between dealing
//! steps is the presentation layer's business. A rejected intent returns a
//! typed error and leaves the state untouched.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::card::{Card, DECK_SIZE};
use crate::events::{RoundEvent, RoundObserver};
use crate::persist::{NullStore, StateStore};
use crate::rules::Rules;
use crate::shoe::Shoe;

mod actions;
mod betting;
mod dealer;
mod dealing;
mod insurance;
pub mod state;

pub use state::{BlackjackResult, Phase, RoundError, RoundState, STARTING_BALANCE};

/// Bankroll bonus credited every [`HANDS_PER_BONUS`] resolved hands.
pub const BONUS_AMOUNT: u32 = 25_000;

/// Resolved hands between bankroll bonuses.
pub const HANDS_PER_BONUS: u32 = 50;

/// A single-player blackjack round engine.
///
/// The engine is strictly single-threaded: one intent at a time, each
/// atomic. Hosts with real concurrency should put the whole engine behind
/// one lock, since every intent reads and writes the whole aggregate.
pub struct Round {
    state: RoundState,
    rules: Rules,
    shoe: Shoe,
    rng: ChaCha8Rng,
    store: Box<dyn StateStore>,
    observer: Option<Box<dyn RoundObserver>>,
    /// Whether a round is underway (dealing through resolution).
    round_active: bool,
    /// A reshuffle has been scheduled and runs before the next deal.
    pending_shuffle: bool,
}

impl Round {
    /// Creates an engine with no persistence.
    ///
    /// Invalid rules are replaced by the defaults rather than surfaced.
    #[must_use]
    pub fn new(rules: Rules, seed: u64) -> Self {
        Self::with_store(rules, seed, Box::new(NullStore))
    }

    /// Creates an engine restoring session state from `store`.
    ///
    /// An empty store means a fresh session with the starting balance. A
    /// restored session always resumes at the betting phase with a freshly
    /// shuffled shoe; the shoe's order is never part of the snapshot.
    #[must_use]
    #[expect(
        clippy::missing_panics_doc,
        reason = "validated rules always carry a buildable deck count"
    )]
    pub fn with_store(rules: Rules, seed: u64, store: Box<dyn StateStore>) -> Self {
        let rules = rules.validated_or_default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let shoe = Shoe::new(rules.num_decks, &mut rng)
            .expect("validated rules always build a shoe");

        let mut state = store.load().unwrap_or_default();
        if state.balance == 0 {
            state.balance = STARTING_BALANCE;
        }

        let mut round = Self {
            state,
            rules,
            shoe,
            rng,
            store,
            observer: None,
            round_active: false,
            pending_shuffle: false,
        };
        round.clear_round_fields();
        round.set_phase(Phase::Betting);
        round.persist();
        round
    }

    /// Registers the observer that receives engine events.
    pub fn set_observer(&mut self, observer: Box<dyn RoundObserver>) {
        self.observer = Some(observer);
    }

    /// Returns the observable round state.
    #[must_use]
    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Returns the rules in effect.
    #[must_use]
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Number of cards left in the shoe.
    #[must_use]
    pub fn cards_remaining(&self) -> usize {
        self.shoe.cards_remaining()
    }

    /// Replaces the shoe. Intended for pre-seeded deals and scripted tests;
    /// normal play replaces the shoe only through reshuffles.
    pub fn set_shoe(&mut self, shoe: Shoe) {
        self.shoe = shoe;
    }

    /// Credits an external bonus (e.g. a practice-mode award) to the
    /// balance.
    pub fn award_bonus(&mut self, amount: u32) {
        self.state.balance += amount;
        self.emit(RoundEvent::BonusAwarded { amount });
        self.persist();
    }

    /// Clears the table back to the betting phase.
    ///
    /// Restores the starting balance when the player is broke.
    ///
    /// # Errors
    ///
    /// Rejected outside the resolution and betting phases.
    pub fn reset_for_new_round(&mut self) -> Result<(), crate::error::BetError> {
        if !matches!(self.state.phase, Phase::Resolution | Phase::Betting) {
            debug!(phase = ?self.state.phase, "reset_for_new_round rejected");
            return Err(crate::error::BetError::InvalidState);
        }
        if self.state.balance == 0 {
            self.state.balance = STARTING_BALANCE;
        }
        self.clear_round_fields();
        self.set_phase(Phase::Betting);
        self.persist();
        Ok(())
    }

    /// Force-resets the bankroll to the starting balance and clears the
    /// table back to betting, abandoning any round in progress.
    pub fn reset_bankroll(&mut self) {
        self.state.balance = STARTING_BALANCE;
        self.state.hands_played = 0;
        self.round_active = false;
        self.pass_through_clear_table();
        self.set_phase(Phase::Betting);
        self.persist();
    }

    pub(super) fn emit(&mut self, event: RoundEvent) {
        if let Some(observer) = &mut self.observer {
            observer.on_event(&event);
        }
    }

    pub(super) fn persist(&mut self) {
        self.store.save(&self.state);
    }

    /// Moves to `to`, running the phase's entry bookkeeping and emitting the
    /// change.
    pub(super) fn set_phase(&mut self, to: Phase) {
        let from = self.state.phase;
        self.state.phase = to;

        match to {
            Phase::Betting => self.state.current_bet = 0,
            Phase::Dealing => self.round_active = true,
            Phase::Resolution => {
                if self.round_active && self.state.round_error.is_none() {
                    self.state.hands_played += 1;
                    if self.state.hands_played >= HANDS_PER_BONUS {
                        self.state.balance += BONUS_AMOUNT;
                        self.state.hands_played = 0;
                        info!(amount = BONUS_AMOUNT, "bankroll bonus awarded");
                        self.emit(RoundEvent::BonusAwarded {
                            amount: BONUS_AMOUNT,
                        });
                    }
                }
                self.round_active = false;
                self.check_reshuffle();
            }
            Phase::PlayerTurn | Phase::DealerTurn | Phase::ClearTable | Phase::ShuffleDecks => {}
        }

        if from != to {
            self.emit(RoundEvent::PhaseChanged { from, to });
        }
    }

    /// Draws one card, aborting the round on an empty shoe.
    pub(super) fn draw_or_abort(&mut self) -> Option<Card> {
        match self.shoe.draw() {
            Some(card) => Some(card),
            None => {
                self.abort_round(RoundError::ShoeExhausted);
                None
            }
        }
    }

    /// Aborts the round: no payouts, settlements dropped, straight to
    /// resolution. The next round starts from a fresh shuffle.
    fn abort_round(&mut self, error: RoundError) {
        warn!(%error, "round aborted");
        self.state.round_error = Some(error);
        for hand in &mut self.state.hands {
            hand.clear_settlement();
        }
        self.pending_shuffle = true;
        self.emit(RoundEvent::RoundAborted { error });
        self.set_phase(Phase::Resolution);
        self.persist();
    }

    /// Schedules a reshuffle when the shoe has reached the configured
    /// threshold. Runs on every entry to resolution.
    fn check_reshuffle(&mut self) {
        let total = self.rules.num_decks as usize * DECK_SIZE;
        let threshold = (total as f64 * self.rules.reshuffle_threshold) as usize;
        if self.shoe.cards_remaining() <= threshold {
            self.pending_shuffle = true;
            info!(
                remaining = self.shoe.cards_remaining(),
                threshold, "reshuffle scheduled"
            );
        }
    }

    /// Replaces the shoe with a fresh shuffle of the configured deck count.
    pub(super) fn replace_shoe(&mut self) {
        self.shoe = Shoe::new(self.rules.num_decks, &mut self.rng)
            .expect("validated rules always build a shoe");
        self.pending_shuffle = false;
        self.emit(RoundEvent::ShoeReshuffled {
            cards_remaining: self.shoe.cards_remaining(),
        });
    }

    /// Whether a reshuffle is scheduled to run before the next deal.
    #[must_use]
    pub const fn reshuffle_pending(&self) -> bool {
        self.pending_shuffle
    }

    /// Resets every round-scoped field. Balance, bet amounts, and the hands
    /// counter survive.
    pub(super) fn clear_round_fields(&mut self) {
        self.state.hands.clear();
        self.state.dealer.clear();
        self.state.active_hand = 0;
        self.state.split_count = 0;
        self.state.insurance_bet = 0;
        self.state.insurance_offered = false;
        self.state.insurance_accepted = false;
        self.state.blackjack_result = BlackjackResult::None;
        self.state.round_error = None;
    }

    /// Clears the table and runs a scheduled reshuffle, passing through the
    /// transient phases.
    pub(super) fn pass_through_clear_table(&mut self) {
        self.set_phase(Phase::ClearTable);
        self.clear_round_fields();
        if self.pending_shuffle {
            self.set_phase(Phase::ShuffleDecks);
            self.replace_shoe();
        }
    }
}
