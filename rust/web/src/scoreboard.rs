use blackjack_engine::round::Seat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;
use thiserror::Error;

/// Cross-round win totals for the table
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scoreboard {
    pub player: u64,
    pub dealer: u64,
}

impl Scoreboard {
    fn credit(mut self, seat: Seat) -> Self {
        match seat {
            Seat::Player => self.player += 1,
            Seat::Dealer => self.dealer += 1,
        }
        self
    }
}

/// Win totals store, optionally backed by a JSON file on disk
///
/// Mutations write the new totals to disk before committing them to
/// memory, so a failed write leaves the in-memory totals untouched and
/// the caller sees the error.
#[derive(Debug)]
pub struct ScoreboardStore {
    scores: RwLock<Scoreboard>,
    path: Option<PathBuf>,
}

impl ScoreboardStore {
    /// Create a store with no disk backing
    pub fn in_memory() -> Self {
        Self {
            scores: RwLock::new(Scoreboard::default()),
            path: None,
        }
    }

    /// Open a file-backed store, loading existing totals if present
    ///
    /// A missing file is treated as a fresh scoreboard. A file that
    /// exists but does not parse is an error rather than silent data
    /// loss.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ScoreboardError> {
        let path = path.into();
        let scores = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Scoreboard::default(),
            Err(err) => return Err(ScoreboardError::Unavailable(err)),
        };
        Ok(Self {
            scores: RwLock::new(scores),
            path: Some(path),
        })
    }

    /// Get the current totals
    pub fn get(&self) -> Result<Scoreboard, ScoreboardError> {
        self.scores
            .read()
            .map(|guard| *guard)
            .map_err(|_| ScoreboardError::StoragePoisoned)
    }

    /// Credit a win to one seat and return the updated totals
    pub fn record_win(&self, seat: Seat) -> Result<Scoreboard, ScoreboardError> {
        let mut guard = self
            .scores
            .write()
            .map_err(|_| ScoreboardError::StoragePoisoned)?;
        let updated = guard.credit(seat);
        self.persist(&updated)?;
        *guard = updated;
        Ok(updated)
    }

    /// Replace the totals wholesale
    pub fn replace(&self, scores: Scoreboard) -> Result<Scoreboard, ScoreboardError> {
        let mut guard = self
            .scores
            .write()
            .map_err(|_| ScoreboardError::StoragePoisoned)?;
        self.persist(&scores)?;
        *guard = scores;
        Ok(scores)
    }

    /// Reset both totals to zero
    pub fn reset(&self) -> Result<Scoreboard, ScoreboardError> {
        self.replace(Scoreboard::default())
    }

    fn persist(&self, scores: &Scoreboard) -> Result<(), ScoreboardError> {
        if let Some(path) = &self.path {
            let contents = serde_json::to_string_pretty(scores)?;
            fs::write(path, contents)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ScoreboardError {
    #[error("Scoreboard storage poisoned")]
    StoragePoisoned,
    #[error("Scoreboard persistence unavailable: {0}")]
    Unavailable(#[from] std::io::Error),
    #[error("Scoreboard file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl crate::errors::IntoErrorResponse for ScoreboardError {
    fn status_code(&self) -> warp::http::StatusCode {
        use warp::http::StatusCode;
        match self {
            ScoreboardError::StoragePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
            ScoreboardError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ScoreboardError::Malformed(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ScoreboardError::StoragePoisoned => "scoreboard_storage_error",
            ScoreboardError::Unavailable(_) => "persistence_unavailable",
            ScoreboardError::Malformed(_) => "persistence_unavailable",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn severity(&self) -> crate::errors::ErrorSeverity {
        use crate::errors::ErrorSeverity;
        match self {
            ScoreboardError::StoragePoisoned => ErrorSeverity::Critical,
            ScoreboardError::Unavailable(_) => ErrorSeverity::Server,
            ScoreboardError::Malformed(_) => ErrorSeverity::Server,
        }
    }
}
