use crate::session::{RoundStateResponse, SessionError, SessionManager, TableConfig, TableId};
use blackjack_engine::round::PlayerAction;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::{self, StatusCode};
use warp::reply::{self, Response};
use warp::Reply;

#[derive(Debug, Deserialize)]
pub struct CreateTableRequest {
    pub deck_count: Option<usize>,
    pub countdown_seconds: Option<u64>,
    pub seed: Option<u64>,
}

impl CreateTableRequest {
    fn into_config(self) -> TableConfig {
        let mut config = TableConfig::default();
        if let Some(deck_count) = self.deck_count {
            config.deck_count = deck_count;
        }
        if let Some(countdown_seconds) = self.countdown_seconds {
            config.countdown_seconds = countdown_seconds;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        config
    }
}

#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub table_id: TableId,
    pub config: TableConfig,
    pub state: RoundStateResponse,
}

#[derive(Debug, Deserialize)]
pub struct PlayerActionRequest {
    pub action: PlayerAction,
}

/// Opens a new table and deals the opening round.
///
/// # HTTP Method and Path
/// - **Method**: POST
/// - **Path**: `/api/tables`
///
/// # Purpose
/// Creates a blackjack table with configurable shoe size, seed, and
/// between-round countdown hint, then deals the first round so the
/// response already shows a playable hand.
///
/// # Request Format
/// Expects JSON payload with optional fields:
/// ```json
/// {
///   "deck_count": 6,        // Optional: decks in the shoe (1-8)
///   "countdown_seconds": 5, // Optional: client-side countdown hint
///   "seed": 12345           // Optional: RNG seed for reproducibility
/// }
/// ```
///
/// # Response Format
/// - **Success (201 Created)**: JSON with the table id, its config, and
///   the opening round state
/// - **Error (400 Bad Request)**: deck count outside the accepted range
///
/// # Error Cases
/// - `invalid_table_config`: deck count outside 1..=8
/// - `table_storage_error`: internal table storage lock is corrupted
///
/// # Arguments
/// * `sessions` - Shared reference to the session manager
/// * `request` - Deserialized request containing table configuration
///
/// # Returns
/// HTTP response with status 201 and JSON body on success, or error
/// response on failure
pub async fn create_table(sessions: Arc<SessionManager>, request: CreateTableRequest) -> Response {
    let config = request.into_config();

    match sessions.create_table(config) {
        Ok(table_id) => match assemble_table_response(&sessions, &table_id) {
            Ok(response) => success_response(StatusCode::CREATED, response),
            Err(err) => session_error(err),
        },
        Err(err) => session_error(err),
    }
}

/// Retrieves table information including configuration and round state.
///
/// # HTTP Method and Path
/// - **Method**: GET
/// - **Path**: `/api/tables/{table_id}`
///
/// # Purpose
/// Fetches complete table details: both hands as the client may see
/// them, hand values, phase, and the shoe's remaining card count.
///
/// # Request Format
/// No request body. Table ID is provided as a URL path parameter.
///
/// # Response Format
/// - **Success (200 OK)**: JSON response with table data
/// ```json
/// {
///   "table_id": "uuid-string",
///   "config": { "deck_count": 6, "countdown_seconds": 5 },
///   "state": { ... }
/// }
/// ```
/// - **Error (404 Not Found)**: Table does not exist
/// - **Error (410 Gone)**: Table has expired
///
/// # Error Cases
/// - `table_not_found`: No table with the given ID exists
/// - `table_expired`: Table exceeded inactivity timeout
///
/// # Arguments
/// * `sessions` - Shared reference to the session manager
/// * `table_id` - Unique identifier for the table
///
/// # Returns
/// HTTP response with JSON body on success, or error response on failure
pub async fn get_table(sessions: Arc<SessionManager>, table_id: TableId) -> Response {
    match assemble_table_response(&sessions, &table_id) {
        Ok(response) => success_response(StatusCode::OK, response),
        Err(err) => session_error(err),
    }
}

pub async fn get_table_state(sessions: Arc<SessionManager>, table_id: TableId) -> Response {
    match sessions.state(&table_id) {
        Ok(state) => success_response(StatusCode::OK, state),
        Err(err) => session_error(err),
    }
}

/// Submits a player action against the table's current round.
///
/// # HTTP Method and Path
/// - **Method**: POST
/// - **Path**: `/api/tables/{table_id}/actions`
///
/// # Purpose
/// Processes a player's action (hit, stand, or new_round) and advances
/// the round synchronously. Standing plays the dealer out before the
/// response is built, and an action that resolves the round settles the
/// scoreboard, whose updated totals ride along in the response.
///
/// # Request Format
/// Expects JSON payload with the player action:
/// ```json
/// {
///   "action": "hit"
/// }
/// ```
///
/// # Response Format
/// - **Success (202 Accepted)**: JSON round state after the action,
///   including `winner` and `scoreboard` once the round is resolved
/// - **Error (400 Bad Request)**: Action not legal in the current phase
/// - **Error (404 Not Found)**: Table does not exist
/// - **Error (503 Service Unavailable)**: Scoreboard storage cannot be
///   written; the round outcome itself stands
///
/// # Error Cases
/// - `invalid_action_for_phase`: hit or stand outside the player's turn
/// - `table_not_found`: Table ID does not exist
/// - `table_expired`: Table has timed out
/// - `persistence_unavailable`: Win could not be recorded
///
/// # Arguments
/// * `sessions` - Shared reference to the session manager
/// * `table_id` - Unique identifier for the table
/// * `request` - Deserialized action request
///
/// # Returns
/// HTTP response with status 202 and round state JSON on success, or
/// error response on failure
pub async fn submit_action(
    sessions: Arc<SessionManager>,
    table_id: TableId,
    request: PlayerActionRequest,
) -> Response {
    match sessions.process_action(&table_id, request.action) {
        Ok(state) => success_response(StatusCode::ACCEPTED, state),
        Err(err) => session_error(err),
    }
}

/// Closes a table and discards its round.
///
/// # HTTP Method and Path
/// - **Method**: DELETE
/// - **Path**: `/api/tables/{table_id}`
///
/// # Purpose
/// Removes the table from the session manager's storage. Recorded wins
/// survive on the scoreboard; only the table and its in-flight round go
/// away.
///
/// # Request Format
/// No request body. Table ID is provided as a URL path parameter.
///
/// # Response Format
/// - **Success (204 No Content)**: Empty response body
/// - **Error (404 Not Found)**: Table does not exist
///
/// # Error Cases
/// - `table_not_found`: No table with the given ID exists
///
/// # Arguments
/// * `sessions` - Shared reference to the session manager
/// * `table_id` - Unique identifier for the table to close
///
/// # Returns
/// HTTP response with status 204 on success, or error response on failure
pub async fn delete_table(sessions: Arc<SessionManager>, table_id: TableId) -> Response {
    match sessions.delete_table(&table_id) {
        Ok(()) => empty_response(StatusCode::NO_CONTENT),
        Err(err) => session_error(err),
    }
}

fn assemble_table_response(
    sessions: &SessionManager,
    table_id: &TableId,
) -> Result<TableResponse, SessionError> {
    let config = sessions.config(table_id)?;
    let state = sessions.state(table_id)?;
    Ok(TableResponse {
        table_id: table_id.clone(),
        config,
        state,
    })
}

fn success_response<T>(status: StatusCode, body: T) -> Response
where
    T: Serialize,
{
    reply::with_status(reply::json(&body), status).into_response()
}

fn empty_response(status: StatusCode) -> Response {
    http::Response::builder()
        .status(status)
        .body(warp::hyper::Body::empty())
        .expect("build empty response")
}

fn session_error(err: SessionError) -> Response {
    use crate::errors::IntoErrorResponse;
    err.into_http_response()
}
