use crate::session::MAX_DECKS;
use blackjack_engine::shoe::Shoe;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::Reply;

#[derive(Debug, Default, Deserialize)]
pub struct DeckQuery {
    pub decks: Option<usize>,
    pub seed: Option<u64>,
}

/// Deals out a freshly shuffled shoe without opening a table.
///
/// # HTTP Method and Path
/// - **Method**: GET
/// - **Path**: `/api/deck?decks=6&seed=42`
///
/// # Purpose
/// Returns every card of a shuffled shoe in draw order, for clients
/// that want to inspect or replay a shuffle. Both query parameters are
/// optional: `decks` defaults to 6 and `seed` falls back to entropy.
///
/// # Response Format
/// - **Success (200 OK)**: JSON array of cards
/// ```json
/// [{"rank": "A", "suit": "Spades"}, {"rank": "10", "suit": "Hearts"}]
/// ```
/// - **Error (400 Bad Request)**: deck count outside the accepted range
///
/// # Error Cases
/// - `invalid_deck_count`: `decks` outside 1..=8
pub async fn get_deck(query: DeckQuery) -> Response {
    let decks = query.decks.unwrap_or(6);
    if decks < 1 || decks > MAX_DECKS {
        return deck_error(DeckError::InvalidDeckCount { decks });
    }

    let mut shoe = match Shoe::new(decks, query.seed) {
        Ok(shoe) => shoe,
        Err(_) => return deck_error(DeckError::InvalidDeckCount { decks }),
    };
    shoe.shuffle();

    success_response(StatusCode::OK, shoe.into_cards())
}

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("decks must be between 1 and 8, got {decks}")]
    InvalidDeckCount { decks: usize },
}

impl crate::errors::IntoErrorResponse for DeckError {
    fn status_code(&self) -> warp::http::StatusCode {
        match self {
            DeckError::InvalidDeckCount { .. } => StatusCode::BAD_REQUEST,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            DeckError::InvalidDeckCount { .. } => "invalid_deck_count",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            DeckError::InvalidDeckCount { decks } => Some(serde_json::json!({
                "decks": decks,
                "min": 1,
                "max": MAX_DECKS
            })),
        }
    }
}

fn success_response<T>(status: StatusCode, body: T) -> Response
where
    T: Serialize,
{
    reply::with_status(reply::json(&body), status).into_response()
}

fn deck_error(err: DeckError) -> Response {
    use crate::errors::IntoErrorResponse;
    err.into_http_response()
}
