use crate::cards::{Card, Rank};

/// The target total; anything above it is a bust.
pub const BLACKJACK: u32 = 21;

/// Computes the blackjack value of a hand.
///
/// Cards are accumulated in deal order. Pip cards add their face value
/// and court cards add 10. An Ace adds 11 and is remembered as soft
/// unless that would push the running total past 21, in which case it
/// adds 1 immediately. Once every card is in, soft Aces harden one at a
/// time (each dropping the total by 10) while the total still busts.
///
/// The soft-or-hard choice is made greedily against the running total,
/// so the order cards were dealt in matters to the intermediate sums
/// even though the final value is the same for any order.
///
/// # Examples
/// ```
/// use blackjack_engine::cards::{Card, Rank, Suit};
/// use blackjack_engine::hand::hand_value;
///
/// let soft = [
///     Card::new(Rank::Ace, Suit::Spades),
///     Card::new(Rank::Six, Suit::Hearts),
/// ];
/// assert_eq!(hand_value(&soft), 17);
///
/// let hardened = [
///     Card::new(Rank::Ace, Suit::Spades),
///     Card::new(Rank::Six, Suit::Hearts),
///     Card::new(Rank::Six, Suit::Clubs),
/// ];
/// assert_eq!(hand_value(&hardened), 13);
/// ```
pub fn hand_value(cards: &[Card]) -> u32 {
    let mut total = 0;
    let mut soft_aces = 0;

    for card in cards {
        match card.rank {
            Rank::Ace => {
                if total + 11 <= BLACKJACK {
                    total += 11;
                    soft_aces += 1;
                } else {
                    total += 1;
                }
            }
            rank => total += rank.base_value(),
        }
    }

    while total > BLACKJACK && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }

    total
}

/// A natural: exactly two cards totaling 21. Naturals resolve like any
/// other 21; the flag exists for display and logging.
pub fn is_natural(cards: &[Card]) -> bool {
    cards.len() == 2 && hand_value(cards) == BLACKJACK
}

/// Value of the face-up cards only, with the same soft-Ace rules over
/// the visible subset. This is what clients see while a hole card is
/// still down.
pub fn visible_value(cards: &[Card]) -> u32 {
    let visible: Vec<Card> = cards.iter().copied().filter(|card| card.face_up).collect();
    hand_value(&visible)
}

/// An ordered hand of cards for one seat. Order is deal order, which
/// the scoring above depends on for its soft-Ace bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Hand::default()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn value(&self) -> u32 {
        hand_value(&self.cards)
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// Turns every card face-up (the dealer's hole-card reveal).
    pub fn reveal_all(&mut self) {
        for card in &mut self.cards {
            card.face_up = true;
        }
    }
}
