//! The dealing shoe and the practice-mode card source.

use rand::Rng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::card::{Card, DECK_SIZE, Rank, Suit};
use crate::error::RulesError;

/// Anything cards can be drawn from.
///
/// The finite [`Shoe`] and the practice trainer's [`InfiniteShoe`] both
/// implement this, so the practice deal routine works against either.
pub trait CardSource {
    /// Removes and returns one card, or `None` when the source is exhausted.
    fn draw(&mut self) -> Option<Card>;
}

/// A shoe of one or more shuffled standard decks.
///
/// Cards leave the shoe as they are drawn and never return; the only way to
/// restock is to replace the shoe with a fresh shuffle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shoe {
    cards: Vec<Card>,
}

impl Shoe {
    /// Builds `num_decks` full decks and shuffles them uniformly.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::InvalidDeckCount`] when `num_decks` is zero.
    pub fn new(num_decks: u8, rng: &mut ChaCha8Rng) -> Result<Self, RulesError> {
        if num_decks == 0 {
            return Err(RulesError::InvalidDeckCount);
        }

        let mut cards = Vec::with_capacity(num_decks as usize * DECK_SIZE);
        for _ in 0..num_decks {
            for suit in Suit::ALL {
                for rank in Rank::ALL {
                    cards.push(Card::new(suit, rank));
                }
            }
        }
        cards.shuffle(rng);

        Ok(Self { cards })
    }

    /// Builds a shoe holding exactly `cards`, unshuffled.
    ///
    /// Draws pop from the end of the slice. Intended for pre-seeded deals
    /// and scripted tests.
    #[must_use]
    pub const fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Removes and returns the top card, or `None` when the shoe is empty.
    ///
    /// An empty draw mid-round is unrecoverable for that round; the engine
    /// aborts to resolution rather than dealing short.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Number of cards left in the shoe.
    #[must_use]
    pub fn cards_remaining(&self) -> usize {
        self.cards.len()
    }

    /// Removes specific cards by value, one occurrence each. Cards not
    /// present in the shoe are skipped.
    pub fn remove(&mut self, cards: &[Card]) {
        for card in cards {
            if let Some(index) = self.cards.iter().position(|held| held == card) {
                self.cards.remove(index);
            }
        }
    }
}

impl CardSource for Shoe {
    fn draw(&mut self) -> Option<Card> {
        Self::draw(self)
    }
}

/// Endless uniform card source used by practice mode.
///
/// Draws are independent samples rather than removals from a finite pile, so
/// the source never exhausts and duplicates are expected.
#[derive(Debug, Clone)]
pub struct InfiniteShoe {
    rng: ChaCha8Rng,
}

impl InfiniteShoe {
    /// Creates a new source seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;

        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl CardSource for InfiniteShoe {
    fn draw(&mut self) -> Option<Card> {
        let suit = Suit::ALL[self.rng.random_range(0..Suit::ALL.len())];
        let rank = Rank::ALL[self.rng.random_range(0..Rank::ALL.len())];
        Some(Card::new(suit, rank))
    }
}
