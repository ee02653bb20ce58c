//! Player and dealer hand representations and hand valuation.

use serde::{Deserialize, Serialize};

use crate::card::{Card, Rank};
use crate::payout::Settlement;

fn evaluate(cards: &[Card]) -> (u8, bool) {
    let mut value: u8 = 0;
    let mut aces: u8 = 0;

    // Every ace starts at 1; promotion to 11 happens below.
    for card in cards {
        if card.rank == Rank::Ace {
            aces += 1;
            value = value.saturating_add(1);
        } else {
            value = value.saturating_add(card.rank.value());
        }
    }

    // Promote as many aces as fit without busting. At most one promotion can
    // ever apply, but the loop mirrors the per-ace rule.
    let mut soft = false;
    for _ in 0..aces {
        if value + 10 <= 21 {
            value += 10;
            soft = true;
        }
    }

    (value, soft)
}

/// Maximum non-busting total of the cards.
///
/// Aces count 1 and are promoted to 11 one at a time while the running total
/// stays at 21 or less.
#[must_use]
pub fn value(cards: &[Card]) -> u8 {
    evaluate(cards).0
}

/// Total with every ace counted as 1.
#[must_use]
pub fn hard_value(cards: &[Card]) -> u8 {
    cards.iter().fold(0u8, |total, card| {
        total.saturating_add(if card.rank == Rank::Ace {
            1
        } else {
            card.rank.value()
        })
    })
}

/// Whether the cards form a soft total (an ace currently counted as 11).
#[must_use]
pub fn is_soft(cards: &[Card]) -> bool {
    evaluate(cards).1
}

/// Whether the cards are a natural: exactly two cards totaling 21.
#[must_use]
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && value(cards) == 21
}

/// Whether the cards total more than 21.
#[must_use]
pub fn is_busted(cards: &[Card]) -> bool {
    value(cards) > 21
}

/// One player hand with its stake and, once resolved, its settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
    bet: u32,
    standing: bool,
    settlement: Option<Settlement>,
}

impl Hand {
    /// Creates an empty hand staked with `bet`.
    #[must_use]
    pub const fn new(bet: u32) -> Self {
        Self {
            cards: Vec::new(),
            bet,
            standing: false,
            settlement: None,
        }
    }

    /// Creates a one-card hand produced by a split, staked with `bet`.
    #[must_use]
    pub fn from_split(card: Card, bet: u32) -> Self {
        Self {
            cards: vec![card],
            bet,
            standing: false,
            settlement: None,
        }
    }

    /// Adds a card to the hand.
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Returns the cards in the hand.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Returns the stake on this hand.
    #[must_use]
    pub const fn bet(&self) -> u32 {
        self.bet
    }

    /// Doubles the stake (double down).
    pub const fn double_bet(&mut self) {
        self.bet *= 2;
    }

    /// Maximum non-busting total of the hand.
    #[must_use]
    pub fn value(&self) -> u8 {
        value(&self.cards)
    }

    /// Whether the hand is a soft total.
    #[must_use]
    pub fn is_soft(&self) -> bool {
        is_soft(&self.cards)
    }

    /// Whether the hand is busted.
    #[must_use]
    pub fn is_busted(&self) -> bool {
        is_busted(&self.cards)
    }

    /// Whether the hand is a natural.
    #[must_use]
    pub fn is_blackjack(&self) -> bool {
        is_blackjack(&self.cards)
    }

    /// Whether the hand is exactly two cards of equal rank.
    #[must_use]
    pub fn is_pair(&self) -> bool {
        self.cards.len() == 2 && self.cards[0].rank == self.cards[1].rank
    }

    /// Number of cards in the hand.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the hand holds no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Removes and returns the second card for a split. Returns `None`
    /// unless the hand holds exactly two cards.
    pub fn take_split_card(&mut self) -> Option<Card> {
        if self.cards.len() == 2 {
            self.cards.pop()
        } else {
            None
        }
    }

    /// Marks the hand as finished taking actions.
    pub const fn set_standing(&mut self) {
        self.standing = true;
    }

    /// Whether the hand has finished taking actions.
    #[must_use]
    pub const fn is_standing(&self) -> bool {
        self.standing
    }

    /// Records the settlement for this hand. The first settlement sticks;
    /// later calls are ignored.
    pub fn settle(&mut self, settlement: Settlement) {
        if self.settlement.is_none() {
            self.settlement = Some(settlement);
        }
    }

    /// Drops a recorded settlement (round-abort cleanup).
    pub const fn clear_settlement(&mut self) {
        self.settlement = None;
    }

    /// Returns the settlement, if the hand has been resolved.
    #[must_use]
    pub const fn settlement(&self) -> Option<Settlement> {
        self.settlement
    }

    /// Whether the hand has been resolved.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.settlement.is_some()
    }
}

/// The dealer's hand. The second card stays concealed until the reveal step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealerHand {
    cards: Vec<Card>,
    hole_revealed: bool,
}

impl DealerHand {
    /// Creates a new empty dealer hand.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cards: Vec::new(),
            hole_revealed: false,
        }
    }

    /// Adds a card to the hand.
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Returns all cards in the hand.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Returns the visible upcard (first card).
    #[must_use]
    pub fn up_card(&self) -> Option<&Card> {
        self.cards.first()
    }

    /// Whether the hole card has been revealed.
    #[must_use]
    pub const fn is_hole_revealed(&self) -> bool {
        self.hole_revealed
    }

    /// Reveals the hole card.
    pub const fn reveal_hole(&mut self) {
        self.hole_revealed = true;
    }

    /// Value visible to the player: the upcard alone until the reveal.
    #[must_use]
    pub fn visible_value(&self) -> u8 {
        if self.hole_revealed {
            self.value()
        } else {
            self.cards.first().map_or(0, |card| card.rank.value())
        }
    }

    /// Full value of the hand.
    #[must_use]
    pub fn value(&self) -> u8 {
        value(&self.cards)
    }

    /// Whether the hand is a soft total.
    #[must_use]
    pub fn is_soft(&self) -> bool {
        is_soft(&self.cards)
    }

    /// Whether the hand is a natural.
    #[must_use]
    pub fn is_blackjack(&self) -> bool {
        is_blackjack(&self.cards)
    }

    /// Whether the hand is busted.
    #[must_use]
    pub fn is_busted(&self) -> bool {
        is_busted(&self.cards)
    }

    /// Number of cards in the hand.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the hand holds no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Clears the hand and re-conceals the hole for the next round.
    pub fn clear(&mut self) {
        self.cards.clear();
        self.hole_revealed = false;
    }
}

impl Default for DealerHand {
    fn default() -> Self {
        Self::new()
    }
}
