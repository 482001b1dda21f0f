use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// Represents the suit of a playing card.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Suit::Hearts => "Hearts",
            Suit::Diamonds => "Diamonds",
            Suit::Clubs => "Clubs",
            Suit::Spades => "Spades",
        };
        write!(f, "{name}")
    }
}

/// Represents the rank of a playing card.
///
/// Serialized form matches the table wire contract: `"2"` through
/// `"10"`, then `"J"`, `"Q"`, `"K"`, `"A"`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "A")]
    Ace,
}

impl Rank {
    /// Base blackjack value of the rank: pip cards count as printed,
    /// face cards count 10. An Ace counts 11 here; the scoring rules in
    /// [`crate::hand`] decide when it hardens to 1.
    pub fn base_value(self) -> u32 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            Rank::Ace => 11,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single card in the shoe.
///
/// `face_up` is table state, not identity: cards of the same rank and
/// suit from different decks are interchangeable. The flag never
/// appears on the wire; serialized cards are `{rank, suit}` and hands
/// sent to clients mask face-down cards entirely.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    #[serde(skip_serializing, default = "face_up_default")]
    pub face_up: bool,
}

fn face_up_default() -> bool {
    true
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card {
            rank,
            suit,
            face_up: true,
        }
    }

    /// The same card turned face-down (the dealer's hole card).
    pub fn face_down(mut self) -> Self {
        self.face_up = false;
        self
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.rank, self.suit)
    }
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades]
}

pub fn all_ranks() -> [Rank; 13] {
    [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ]
}

/// One complete 52-card deck, all face-up, in construction order.
pub fn standard_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(52);
    for suit in all_suits() {
        for rank in all_ranks() {
            deck.push(Card::new(rank, suit));
        }
    }
    deck
}

/// `deck_count` standard decks concatenated into one unshuffled shoe.
/// Pure construction: no randomness, and the only failure is a zero
/// deck count.
pub fn build_shoe(deck_count: usize) -> Result<Vec<Card>, GameError> {
    if deck_count == 0 {
        return Err(GameError::InvalidDeckCount { decks: deck_count });
    }

    let mut cards = Vec::with_capacity(52 * deck_count);
    for _ in 0..deck_count {
        cards.extend(standard_deck());
    }
    Ok(cards)
}
