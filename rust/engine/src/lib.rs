//! # blackjack-engine: Single-Table Blackjack Rules Core
//!
//! The complete rules of a one-player-versus-dealer blackjack round:
//! multi-deck shoe construction and shuffling, soft/hard hand scoring,
//! the deal → player turn → dealer turn → resolution sequence, and
//! outcome determination. The crate is pure logic with reproducible
//! RNG; persistence and transport live in the web crate.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and shoe construction
//! - [`shoe`] - Deterministic shoe shuffling with ChaCha20 RNG
//! - [`hand`] - Hand container and blackjack value scoring
//! - [`round`] - The round state machine: deal, hit, stand, resolve
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use blackjack_engine::round::{Phase, Round, Winner};
//!
//! // Six-deck shoe, seeded for a reproducible deal
//! let mut round = Round::start(6, Some(42)).unwrap();
//! assert_eq!(round.phase(), Phase::PlayerTurn);
//!
//! // Standing plays out the dealer and resolves the round
//! round.stand().unwrap();
//! assert_eq!(round.phase(), Phase::Resolved);
//! assert!(matches!(
//!     round.winner(),
//!     Some(Winner::Player) | Some(Winner::Dealer) | Some(Winner::Draw)
//! ));
//! ```
//!
//! ## Hand Scoring
//!
//! Aces count 11 while the hand can afford it and harden to 1 one at a
//! time once it cannot:
//!
//! ```rust
//! use blackjack_engine::cards::{Card, Rank, Suit};
//! use blackjack_engine::hand::hand_value;
//!
//! let hand = [
//!     Card::new(Rank::Ace, Suit::Spades),
//!     Card::new(Rank::Ace, Suit::Hearts),
//!     Card::new(Rank::Nine, Suit::Clubs),
//! ];
//! assert_eq!(hand_value(&hand), 21);
//! ```
//!
//! ## Deterministic Gameplay
//!
//! All shuffles are reproducible from a seed:
//!
//! ```rust
//! use blackjack_engine::shoe::Shoe;
//!
//! let mut first = Shoe::new(6, Some(7)).unwrap();
//! let mut second = Shoe::new(6, Some(7)).unwrap();
//! first.shuffle();
//! second.shuffle();
//! assert_eq!(first.cards(), second.cards());
//! ```

pub mod cards;
pub mod errors;
pub mod hand;
pub mod round;
pub mod shoe;
