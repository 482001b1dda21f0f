use thiserror::Error;

use crate::round::{Phase, PlayerAction};

/// Errors surfaced by the rules engine.
///
/// Running out of cards mid-round is deliberately not here: an
/// exhausted shoe forces a drawn round instead of failing the call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("deck count must be at least 1, got {decks}")]
    InvalidDeckCount { decks: usize },
    #[error("a shoe of {remaining} cards cannot cover the opening deal")]
    ShoeTooSmall { remaining: usize },
    #[error("cannot {action} while the round is in the {phase} phase")]
    InvalidActionForPhase { action: PlayerAction, phase: Phase },
}
