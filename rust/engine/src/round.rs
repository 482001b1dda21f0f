use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;
use crate::hand::{Hand, BLACKJACK};
use crate::shoe::Shoe;

/// The dealer draws to 16 and stands on all 17s.
pub const DEALER_STAND_MIN: u32 = 17;

/// Two cards per seat to open a round.
const OPENING_DEAL: usize = 4;

/// Where a round currently is. `Resolved` is terminal: the only way
/// forward is dealing a fresh round.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Dealing,
    PlayerTurn,
    DealerTurn,
    Resolved,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Dealing => "dealing",
            Phase::PlayerTurn => "player turn",
            Phase::DealerTurn => "dealer turn",
            Phase::Resolved => "resolved",
        };
        write!(f, "{name}")
    }
}

/// One of the two seats at the table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    Player,
    Dealer,
}

/// Outcome of a resolved round.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Player,
    Dealer,
    Draw,
}

impl Winner {
    /// The seat whose tally this outcome increments; a draw pays
    /// nobody.
    pub fn winning_seat(self) -> Option<Seat> {
        match self {
            Winner::Player => Some(Seat::Player),
            Winner::Dealer => Some(Seat::Dealer),
            Winner::Draw => None,
        }
    }
}

/// Actions a client can submit against a round.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    Hit,
    Stand,
    NewRound,
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayerAction::Hit => "hit",
            PlayerAction::Stand => "stand",
            PlayerAction::NewRound => "start a new round",
        };
        write!(f, "{name}")
    }
}

/// A single round of blackjack from shuffle to resolution.
///
/// The round owns its shoe and both hands and walks the fixed phase
/// order `Dealing → PlayerTurn → DealerTurn → Resolved`. Player actions
/// are accepted only during `PlayerTurn`; the dealer plays out
/// synchronously inside [`Round::stand`] (or the automatic stand on a
/// made 21), so callers never observe `DealerTurn` between calls.
///
/// # Examples
/// ```
/// use blackjack_engine::round::{Phase, Round};
///
/// let mut round = Round::start(6, Some(42)).unwrap();
/// assert_eq!(round.phase(), Phase::PlayerTurn);
/// assert_eq!(round.player_cards().len(), 2);
///
/// round.stand().unwrap();
/// assert_eq!(round.phase(), Phase::Resolved);
/// assert!(round.winner().is_some());
/// ```
#[derive(Debug)]
pub struct Round {
    shoe: Shoe,
    player: Hand,
    dealer: Hand,
    phase: Phase,
    winner: Option<Winner>,
}

impl Round {
    /// Shuffles a fresh `deck_count`-deck shoe and deals the opening
    /// hands: two cards to the player face-up, then two to the dealer
    /// with the second kept as the face-down hole card.
    pub fn start(deck_count: usize, seed: Option<u64>) -> Result<Self, GameError> {
        let mut shoe = Shoe::new(deck_count, seed)?;
        shoe.shuffle();
        Self::deal(shoe)
    }

    /// Deals a round from an already prepared shoe. Combined with
    /// [`Shoe::stacked`] this pins down exact card sequences.
    pub fn deal(shoe: Shoe) -> Result<Self, GameError> {
        let mut round = Round {
            shoe,
            player: Hand::new(),
            dealer: Hand::new(),
            phase: Phase::Dealing,
            winner: None,
        };
        round.deal_hands()?;
        Ok(round)
    }

    /// Discards both hands, reshuffles a full shoe from the same
    /// generator, and deals again. Legal in any phase: starting over
    /// abandons whatever was in flight.
    pub fn redeal(&mut self) -> Result<(), GameError> {
        self.shoe.shuffle();
        self.player.clear();
        self.dealer.clear();
        self.winner = None;
        self.phase = Phase::Dealing;
        self.deal_hands()
    }

    /// Draws one card face-up to the player's hand.
    ///
    /// A hand going over 21 resolves the round for the dealer on the
    /// spot; landing exactly on 21 stands automatically. An empty shoe
    /// resolves the round as a draw rather than erroring.
    pub fn hit(&mut self) -> Result<(), GameError> {
        self.require_player_turn(PlayerAction::Hit)?;

        match self.shoe.draw() {
            None => self.resolve_exhausted(),
            Some(card) => {
                self.player.push(card);
                let total = self.player.value();
                if total > BLACKJACK {
                    // Bust ends the round at once; the dealer never
                    // plays and the hole card stays down.
                    self.winner = Some(Winner::Dealer);
                    self.phase = Phase::Resolved;
                } else if total == BLACKJACK {
                    self.play_dealer();
                }
            }
        }
        Ok(())
    }

    /// Ends the player's turn: reveals the hole card, plays out the
    /// dealer's fixed policy, and resolves the round.
    pub fn stand(&mut self) -> Result<(), GameError> {
        self.require_player_turn(PlayerAction::Stand)?;
        self.play_dealer();
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn player_cards(&self) -> &[Card] {
        self.player.cards()
    }

    pub fn dealer_cards(&self) -> &[Card] {
        self.dealer.cards()
    }

    pub fn player_value(&self) -> u32 {
        self.player.value()
    }

    pub fn dealer_value(&self) -> u32 {
        self.dealer.value()
    }

    pub fn shoe_remaining(&self) -> usize {
        self.shoe.remaining()
    }

    pub fn deck_count(&self) -> usize {
        self.shoe.deck_count()
    }

    fn deal_hands(&mut self) -> Result<(), GameError> {
        let remaining = self.shoe.remaining();
        if remaining < OPENING_DEAL {
            return Err(GameError::ShoeTooSmall { remaining });
        }
        let short = || GameError::ShoeTooSmall { remaining };

        for _ in 0..2 {
            let card = self.shoe.draw().ok_or_else(short)?;
            self.player.push(card);
        }
        let upcard = self.shoe.draw().ok_or_else(short)?;
        self.dealer.push(upcard);
        let hole = self.shoe.draw().ok_or_else(short)?.face_down();
        self.dealer.push(hole);

        self.phase = Phase::PlayerTurn;
        Ok(())
    }

    fn play_dealer(&mut self) {
        self.phase = Phase::DealerTurn;
        self.dealer.reveal_all();

        while self.dealer.value() < DEALER_STAND_MIN {
            match self.shoe.draw() {
                Some(card) => self.dealer.push(card),
                None => {
                    self.resolve_exhausted();
                    return;
                }
            }
        }
        self.resolve();
    }

    fn resolve(&mut self) {
        let p = self.player.value();
        let d = self.dealer.value();

        let winner = if p == d {
            Winner::Draw
        } else if p > BLACKJACK || (d <= BLACKJACK && d > p) {
            Winner::Dealer
        } else {
            // Remaining cases: the dealer busted, or the player sits
            // closer to 21.
            Winner::Player
        };

        self.winner = Some(winner);
        self.phase = Phase::Resolved;
    }

    fn resolve_exhausted(&mut self) {
        self.winner = Some(Winner::Draw);
        self.phase = Phase::Resolved;
    }

    fn require_player_turn(&self, action: PlayerAction) -> Result<(), GameError> {
        if self.phase == Phase::PlayerTurn {
            Ok(())
        } else {
            Err(GameError::InvalidActionForPhase {
                action,
                phase: self.phase,
            })
        }
    }
}
