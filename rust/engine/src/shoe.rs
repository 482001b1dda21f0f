use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{build_shoe, standard_deck, Card};
use crate::errors::GameError;

/// A dealing shoe of one or more decks.
///
/// The shoe owns its ChaCha20 generator: a seeded shoe replays the same
/// shuffle stream across reshuffles, an unseeded one draws its seed from
/// process randomness. Cards leave from the tail and are never
/// returned; [`Shoe::shuffle`] rebuilds the full complement.
#[derive(Debug, Clone)]
pub struct Shoe {
    cards: Vec<Card>,
    deck_count: usize,
    rng: ChaCha20Rng,
}

impl Shoe {
    /// A fresh unshuffled shoe of `deck_count` decks. Pass a seed for a
    /// reproducible shuffle stream, `None` for process randomness.
    pub fn new(deck_count: usize, seed: Option<u64>) -> Result<Self, GameError> {
        let cards = build_shoe(deck_count)?;
        let rng = ChaCha20Rng::seed_from_u64(seed.unwrap_or_else(rand::random));
        Ok(Shoe {
            cards,
            deck_count,
            rng,
        })
    }

    /// A shoe with a predetermined card order, dealt as given from the
    /// tail. Tests use this to script exact deals; reshuffling one
    /// falls back to a standard single deck.
    pub fn stacked(cards: Vec<Card>) -> Self {
        Shoe {
            cards,
            deck_count: 1,
            rng: ChaCha20Rng::seed_from_u64(0),
        }
    }

    /// Rebuilds the full shoe and applies a Fisher-Yates permutation
    /// from the owned generator.
    pub fn shuffle(&mut self) {
        self.cards.clear();
        for _ in 0..self.deck_count {
            self.cards.extend(standard_deck());
        }
        self.cards.shuffle(&mut self.rng);
    }

    /// Deals one card from the tail of the shoe.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn deck_count(&self) -> usize {
        self.deck_count
    }

    /// The current card order, tail dealt first.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Consumes the shoe into its card sequence.
    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}
