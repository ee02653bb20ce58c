//! Basic-strategy practice trainer.
//!
//! Practice hands are graded, not wagered: the trainer deals from an
//! endless card source, asks for the correct basic-strategy action, and
//! tracks a consecutive-correct streak. A long enough streak earns a
//! bankroll bonus the caller credits to the real game via
//! [`Round::award_bonus`](crate::Round::award_bonus).

use tracing::debug;

use crate::card::{Card, Rank};
use crate::error::PracticeError;
use crate::shoe::{CardSource, InfiniteShoe};
use crate::strategy::{self, Action};

/// Bonus reported after [`STREAK_TARGET`] consecutive correct answers.
pub const PRACTICE_BONUS: u32 = 25_000;

/// Consecutive correct answers that earn the bonus.
pub const STREAK_TARGET: u32 = 25;

/// Phase of a practice hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticePhase {
    /// Cards are going on the table.
    Dealing,
    /// Waiting for the player's answer.
    PlayerChoice,
    /// Answer graded; feedback is on display.
    Feedback,
    /// Transient: the table is being cleared for the next hand.
    ClearTable,
}

/// Grade for one answered practice hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    /// Whether the answer matched the chart.
    pub correct: bool,
    /// The chart's action for the hand.
    pub expected: Action,
    /// Consecutive-correct streak after this answer.
    pub streak: u32,
    /// Bonus earned by this answer, if the streak target was reached.
    pub bonus: Option<u32>,
}

/// A practice session over any card source; defaults to the endless
/// [`InfiniteShoe`], which never exhausts.
#[derive(Debug)]
pub struct PracticeSession<S = InfiniteShoe> {
    phase: PracticePhase,
    player: Vec<Card>,
    dealer: Vec<Card>,
    source: S,
    streak: u32,
    hole_revealed: bool,
}

impl PracticeSession<InfiniteShoe> {
    /// Creates a session drawing from an endless source seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_source(InfiniteShoe::new(seed))
    }
}

impl<S: CardSource> PracticeSession<S> {
    /// Creates a session drawing from `source`.
    pub fn with_source(source: S) -> Self {
        Self {
            phase: PracticePhase::Dealing,
            player: Vec::new(),
            dealer: Vec::new(),
            source,
            streak: 0,
            hole_revealed: false,
        }
    }

    /// Deals a practice hand: player, dealer upcard, player, dealer hole.
    ///
    /// The trainer never deals an opening natural: a second player card
    /// that would complete one is thrown back and re-drawn.
    ///
    /// # Errors
    ///
    /// Rejected outside the dealing phase, or when the card source runs
    /// dry (impossible with the default source).
    pub fn deal(&mut self) -> Result<(), PracticeError> {
        if self.phase != PracticePhase::Dealing {
            debug!(phase = ?self.phase, "practice deal rejected");
            return Err(PracticeError::InvalidState);
        }

        self.player.clear();
        self.dealer.clear();
        self.hole_revealed = false;

        let first = self.draw()?;
        self.player.push(first);
        let upcard = self.draw()?;
        self.dealer.push(upcard);

        let second = loop {
            let card = self.draw()?;
            if !completes_natural(first, card) {
                break card;
            }
        };
        self.player.push(second);

        let hole = self.draw()?;
        self.dealer.push(hole);

        self.phase = PracticePhase::PlayerChoice;
        Ok(())
    }

    /// Grades `action` against the strategy chart for the dealt hand.
    ///
    /// A correct answer extends the streak; reaching the target reports the
    /// bonus and restarts the streak. A wrong answer resets it. The dealer
    /// hole card is revealed with the feedback.
    ///
    /// # Errors
    ///
    /// Rejected unless an answer is awaited.
    pub fn choose(&mut self, action: Action) -> Result<Feedback, PracticeError> {
        if self.phase != PracticePhase::PlayerChoice {
            debug!(phase = ?self.phase, "practice choice rejected");
            return Err(PracticeError::InvalidState);
        }

        let expected = strategy::recommend(&self.player, self.dealer[0], true);
        let correct = action == expected;

        let mut bonus = None;
        if correct {
            self.streak += 1;
            if self.streak >= STREAK_TARGET {
                bonus = Some(PRACTICE_BONUS);
                self.streak = 0;
            }
        } else {
            self.streak = 0;
        }

        self.phase = PracticePhase::Feedback;
        self.hole_revealed = true;

        Ok(Feedback {
            correct,
            expected,
            streak: self.streak,
            bonus,
        })
    }

    /// Clears the table and deals the next hand.
    ///
    /// # Errors
    ///
    /// Rejected before the current hand has been answered, or when the
    /// card source runs dry.
    pub fn next_hand(&mut self) -> Result<(), PracticeError> {
        if self.phase != PracticePhase::Feedback {
            return Err(PracticeError::InvalidState);
        }

        self.phase = PracticePhase::ClearTable;
        self.player.clear();
        self.dealer.clear();
        self.hole_revealed = false;

        self.phase = PracticePhase::Dealing;
        self.deal()
    }

    /// Current practice phase.
    #[must_use]
    pub const fn phase(&self) -> PracticePhase {
        self.phase
    }

    /// The player's dealt cards.
    #[must_use]
    pub fn player(&self) -> &[Card] {
        &self.player
    }

    /// The dealer's upcard, once dealt.
    #[must_use]
    pub fn dealer_upcard(&self) -> Option<&Card> {
        self.dealer.first()
    }

    /// The dealer's dealt cards. The hole card is only meaningful to show
    /// once [`hole_revealed`](Self::hole_revealed) is true.
    #[must_use]
    pub fn dealer(&self) -> &[Card] {
        &self.dealer
    }

    /// Whether the dealer hole card has been revealed.
    #[must_use]
    pub const fn hole_revealed(&self) -> bool {
        self.hole_revealed
    }

    /// Current consecutive-correct streak.
    #[must_use]
    pub const fn streak(&self) -> u32 {
        self.streak
    }

    fn draw(&mut self) -> Result<Card, PracticeError> {
        self.source.draw().ok_or(PracticeError::SourceExhausted)
    }
}

fn completes_natural(first: Card, second: Card) -> bool {
    (first.rank == Rank::Ace && second.rank.is_ten_valued())
        || (second.rank == Rank::Ace && first.rank.is_ten_valued())
}
