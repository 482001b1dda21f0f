use crate::scoreboard::{Scoreboard, ScoreboardError, ScoreboardStore};
use serde::Serialize;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::Reply;

/// Get the current win totals
///
/// # HTTP Method and Path
/// - **Method**: GET
/// - **Path**: `/api/scoreboard`
///
/// # Response Format
/// - **Success (200 OK)**: `{"player": 3, "dealer": 5}`
/// - **Error (503 Service Unavailable)**: persistence cannot be read
pub async fn get_scoreboard(store: Arc<ScoreboardStore>) -> Response {
    match store.get() {
        Ok(scores) => success_response(StatusCode::OK, scores),
        Err(err) => scoreboard_error(err),
    }
}

/// Replace the win totals wholesale
///
/// # HTTP Method and Path
/// - **Method**: PUT
/// - **Path**: `/api/scoreboard`
///
/// # Request Format
/// `{"player": 3, "dealer": 5}` - both totals required
///
/// # Response Format
/// - **Success (200 OK)**: the totals as stored, echoed back
/// - **Error (503 Service Unavailable)**: persistence cannot be written
pub async fn put_scoreboard(store: Arc<ScoreboardStore>, scores: Scoreboard) -> Response {
    match store.replace(scores) {
        Ok(updated) => success_response(StatusCode::OK, updated),
        Err(err) => scoreboard_error(err),
    }
}

/// Reset both win totals to zero
///
/// # HTTP Method and Path
/// - **Method**: DELETE
/// - **Path**: `/api/scoreboard`
///
/// # Response Format
/// - **Success (200 OK)**: `{"player": 0, "dealer": 0}`
/// - **Error (503 Service Unavailable)**: persistence cannot be written
pub async fn delete_scoreboard(store: Arc<ScoreboardStore>) -> Response {
    match store.reset() {
        Ok(zeroed) => success_response(StatusCode::OK, zeroed),
        Err(err) => scoreboard_error(err),
    }
}

fn success_response<T>(status: StatusCode, body: T) -> Response
where
    T: Serialize,
{
    reply::with_status(reply::json(&body), status).into_response()
}

fn scoreboard_error(err: ScoreboardError) -> Response {
    use crate::errors::IntoErrorResponse;
    err.into_http_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack_engine::round::Seat;

    #[tokio::test]
    async fn get_scoreboard_returns_current_totals() {
        let store = Arc::new(ScoreboardStore::in_memory());
        let response = get_scoreboard(store).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn put_scoreboard_replaces_totals() {
        let store = Arc::new(ScoreboardStore::in_memory());

        let response = put_scoreboard(
            Arc::clone(&store),
            Scoreboard {
                player: 4,
                dealer: 2,
            },
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let scores = store.get().expect("get scores");
        assert_eq!(scores.player, 4);
        assert_eq!(scores.dealer, 2);
    }

    #[tokio::test]
    async fn delete_scoreboard_zeroes_totals() {
        let store = Arc::new(ScoreboardStore::in_memory());
        store.record_win(Seat::Player).expect("record win");
        store.record_win(Seat::Dealer).expect("record win");

        let response = delete_scoreboard(Arc::clone(&store)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let scores = store.get().expect("get scores");
        assert_eq!(scores, Scoreboard::default());
    }

    #[tokio::test]
    async fn unavailable_persistence_maps_to_service_unavailable() {
        // Writes fail because the parent directory is missing.
        let bad_path = std::env::temp_dir()
            .join(format!("blackjack-missing-{}", uuid::Uuid::new_v4()))
            .join("scores.json");
        let store = Arc::new(ScoreboardStore::open(bad_path).expect("open"));

        let response = put_scoreboard(
            store,
            Scoreboard {
                player: 1,
                dealer: 0,
            },
        )
        .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
