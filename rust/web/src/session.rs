use crate::errors::IntoErrorResponse;
use crate::scoreboard::{Scoreboard, ScoreboardError, ScoreboardStore};
use blackjack_engine::cards::{Card, Rank, Suit};
use blackjack_engine::errors::GameError;
use blackjack_engine::hand::visible_value;
use blackjack_engine::round::{Phase, PlayerAction, Round, Winner};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

pub type TableId = String;

const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Largest shoe the table will deal from.
pub const MAX_DECKS: usize = 8;

#[derive(Debug)]
pub struct SessionManager {
    sessions: RwLock<HashMap<TableId, Arc<TableSession>>>,
    scoreboard: Arc<ScoreboardStore>,
    session_ttl: Duration,
}

impl SessionManager {
    pub fn new(scoreboard: Arc<ScoreboardStore>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            scoreboard,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    pub fn with_ttl(scoreboard: Arc<ScoreboardStore>, ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            scoreboard,
            session_ttl: ttl,
        }
    }

    pub fn create_table(&self, config: TableConfig) -> Result<TableId, SessionError> {
        config.validate()?;
        let id = Uuid::new_v4().to_string();

        tracing::info!(
            table_id = %id,
            deck_count = config.deck_count,
            seed = ?config.seed,
            "creating new table"
        );

        let session = Arc::new(TableSession::new(id.clone(), config)?);

        {
            let mut guard = self
                .sessions
                .write()
                .map_err(|_| SessionError::StoragePoisoned)?;
            guard.insert(id.clone(), Arc::clone(&session));
        }

        tracing::debug!(table_id = %id, "table created and opening hands dealt");

        Ok(id)
    }

    pub fn get_table(&self, id: &TableId) -> Result<Arc<TableSession>, SessionError> {
        let guard = self
            .sessions
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }

    pub fn state(&self, table_id: &TableId) -> Result<RoundStateResponse, SessionError> {
        let session = self.checked_table(table_id)?;
        session.touch();
        session.state_snapshot(None)
    }

    pub fn config(&self, table_id: &TableId) -> Result<TableConfig, SessionError> {
        let session = self.get_table(table_id)?;
        Ok(session.config())
    }

    /// Apply one player action to a table's round and return the state
    /// after it.
    ///
    /// An action that resolves the round settles the scoreboard before
    /// the response is built: the winning seat (if any) is credited and
    /// the updated totals ride along in the response. A draw credits
    /// nobody. When the scoreboard write fails, the error is returned
    /// to the caller while the round itself stays resolved; the totals
    /// in memory are untouched.
    pub fn process_action(
        &self,
        table_id: &TableId,
        action: PlayerAction,
    ) -> Result<RoundStateResponse, SessionError> {
        let session = self.checked_table(table_id)?;
        session.touch();

        tracing::debug!(
            table_id = %table_id,
            action = %action,
            "processing table action"
        );

        let resolved = session.apply(action)?;

        let scores = match resolved {
            Some(winner) => {
                tracing::info!(table_id = %table_id, winner = ?winner, "round resolved");
                match winner.winning_seat() {
                    Some(seat) => Some(self.scoreboard.record_win(seat)?),
                    None => Some(self.scoreboard.get()?),
                }
            }
            None => None,
        };

        session.state_snapshot(scores)
    }

    pub fn delete_table(&self, table_id: &TableId) -> Result<(), SessionError> {
        match self.remove_table(table_id)? {
            Some(session) => {
                tracing::info!(
                    table_id = %table_id,
                    age_seconds = session.created_at.elapsed().as_secs(),
                    "table closed by request"
                );
                Ok(())
            }
            None => Err(SessionError::NotFound(table_id.clone())),
        }
    }

    pub fn cleanup_expired_sessions(&self) {
        let mut expired = Vec::new();
        {
            let mut guard = match self.sessions.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.retain(|id, session| {
                if session.is_expired(self.session_ttl) {
                    expired.push(id.clone());
                    false
                } else {
                    true
                }
            });
        }

        for id in expired {
            tracing::info!(table_id = %id, "table expired due to inactivity");
        }
    }

    pub fn active_tables(&self) -> Vec<TableId> {
        match self.sessions.read() {
            Ok(guard) => guard.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn scoreboard(&self) -> Arc<ScoreboardStore> {
        Arc::clone(&self.scoreboard)
    }

    fn checked_table(&self, table_id: &TableId) -> Result<Arc<TableSession>, SessionError> {
        let session = self.get_table(table_id)?;
        if session.is_expired(self.session_ttl) {
            self.expire_table(table_id, "expired due to inactivity")?;
            return Err(SessionError::Expired(table_id.clone()));
        }
        Ok(session)
    }

    fn expire_table(&self, table_id: &TableId, reason: &str) -> Result<(), SessionError> {
        if self.remove_table(table_id)?.is_some() {
            tracing::info!(table_id = %table_id, reason = %reason, "table removed");
        }
        Ok(())
    }

    fn remove_table(
        &self,
        table_id: &TableId,
    ) -> Result<Option<Arc<TableSession>>, SessionError> {
        match self.sessions.write() {
            Ok(mut guard) => Ok(guard.remove(table_id)),
            Err(_) => Err(SessionError::StoragePoisoned),
        }
    }
}

/// One blackjack table bound to a single client session.
///
/// The table owns exactly one round at a time; starting a new round
/// replaces it in place using the same shoe configuration.
#[derive(Debug)]
pub struct TableSession {
    id: TableId,
    round: Mutex<Round>,
    config: TableConfig,
    created_at: Instant,
    last_active: Mutex<Instant>,
}

impl TableSession {
    fn new(id: TableId, config: TableConfig) -> Result<Self, SessionError> {
        let round = Round::start(config.deck_count, config.seed)?;
        let now = Instant::now();
        Ok(Self {
            id,
            round: Mutex::new(round),
            config,
            created_at: now,
            last_active: Mutex::new(now),
        })
    }

    /// Apply one action to the round. Returns the outcome when this
    /// particular action resolved the round, so each resolution is
    /// reported exactly once; later calls on a resolved round are
    /// rejected by the round itself.
    fn apply(&self, action: PlayerAction) -> Result<Option<Winner>, SessionError> {
        let mut round = self
            .round
            .lock()
            .map_err(|_| SessionError::StoragePoisoned)?;

        match action {
            PlayerAction::Hit => round.hit()?,
            PlayerAction::Stand => round.stand()?,
            PlayerAction::NewRound => {
                round.redeal()?;
                return Ok(None);
            }
        }

        Ok(match round.phase() {
            Phase::Resolved => round.winner(),
            _ => None,
        })
    }

    fn state_snapshot(
        &self,
        scoreboard: Option<Scoreboard>,
    ) -> Result<RoundStateResponse, SessionError> {
        let round = self
            .round
            .lock()
            .map_err(|_| SessionError::StoragePoisoned)?;

        Ok(RoundStateResponse {
            table_id: self.id.clone(),
            phase: round.phase(),
            player_hand: view_hand(round.player_cards()),
            dealer_hand: view_hand(round.dealer_cards()),
            player_value: round.player_value(),
            dealer_value: visible_value(round.dealer_cards()),
            winner: round.winner(),
            cards_remaining: round.shoe_remaining(),
            countdown_seconds: self.config.countdown_seconds,
            scoreboard,
        })
    }

    fn config(&self) -> TableConfig {
        self.config
    }

    fn touch(&self) {
        if let Ok(mut guard) = self.last_active.lock() {
            *guard = Instant::now();
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        match self.last_active.lock() {
            Ok(last) => last.elapsed() >= ttl,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
impl TableSession {
    fn force_last_active(&self, instant: Instant) {
        if let Ok(mut guard) = self.last_active.lock() {
            *guard = instant;
        }
    }
}

fn view_hand(cards: &[Card]) -> Vec<CardView> {
    cards.iter().map(CardView::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    fn test_manager() -> SessionManager {
        SessionManager::with_ttl(Arc::new(ScoreboardStore::in_memory()), Duration::from_secs(60))
    }

    #[test]
    fn creates_table_and_deals_the_opening_round() {
        let manager = test_manager();
        let id = manager
            .create_table(TableConfig::default())
            .expect("create table");

        let state = manager.state(&id).expect("table state");
        assert_eq!(state.table_id, id);
        assert_eq!(state.phase, Phase::PlayerTurn);
        assert!(state.winner.is_none());
        assert!(state.scoreboard.is_none());

        assert_eq!(state.player_hand.len(), 2);
        assert!(state
            .player_hand
            .iter()
            .all(|card| matches!(card, CardView::FaceUp { .. })));

        assert_eq!(state.dealer_hand.len(), 2);
        assert!(matches!(state.dealer_hand[0], CardView::FaceUp { .. }));
        assert_eq!(state.dealer_hand[1], CardView::Hidden { hidden: true });

        assert!((4..=21).contains(&state.player_value));
        assert!((2..=11).contains(&state.dealer_value));
        assert_eq!(state.cards_remaining, 6 * 52 - 4);
        assert_eq!(state.countdown_seconds, 5);

        let session = manager.get_table(&id).expect("get table");
        assert!(!session.is_expired(Duration::from_secs(60)));
    }

    #[test]
    fn hitting_either_continues_the_turn_or_resolves_the_round() {
        let manager = test_manager();
        let id = manager
            .create_table(TableConfig::default())
            .expect("create table");

        let state = manager
            .process_action(&id, PlayerAction::Hit)
            .expect("process hit");

        match state.phase {
            Phase::PlayerTurn => {
                assert_eq!(state.player_hand.len(), 3);
                assert!(state.winner.is_none());
                assert!(state.scoreboard.is_none());
            }
            Phase::Resolved => {
                // Bust or a made 21 ends the round on the spot.
                assert!(state.winner.is_some());
                assert!(state.scoreboard.is_some());
            }
            other => panic!("unexpected phase after hit: {:?}", other),
        }
    }

    #[test]
    fn standing_resolves_the_round_and_settles_the_scoreboard() {
        let scoreboard = Arc::new(ScoreboardStore::in_memory());
        let manager = SessionManager::with_ttl(Arc::clone(&scoreboard), Duration::from_secs(60));
        let id = manager
            .create_table(TableConfig::default())
            .expect("create table");

        let state = manager
            .process_action(&id, PlayerAction::Stand)
            .expect("process stand");

        assert_eq!(state.phase, Phase::Resolved);
        let winner = state.winner.expect("winner");

        // The hole card comes up and the dealer finishes at 17 or more.
        assert!(state
            .dealer_hand
            .iter()
            .all(|card| matches!(card, CardView::FaceUp { .. })));
        assert!(state.dealer_value >= 17);

        let scores = state.scoreboard.expect("scoreboard in response");
        match winner {
            Winner::Player => {
                assert_eq!(scores.player, 1);
                assert_eq!(scores.dealer, 0);
            }
            Winner::Dealer => {
                assert_eq!(scores.player, 0);
                assert_eq!(scores.dealer, 1);
            }
            Winner::Draw => {
                assert_eq!(scores.player, 0);
                assert_eq!(scores.dealer, 0);
            }
        }
        assert_eq!(scoreboard.get().expect("get"), scores);
    }

    #[test]
    fn resolved_rounds_reject_further_actions_and_record_once() {
        let scoreboard = Arc::new(ScoreboardStore::in_memory());
        let manager = SessionManager::with_ttl(Arc::clone(&scoreboard), Duration::from_secs(60));
        let id = manager
            .create_table(TableConfig::default())
            .expect("create table");

        let resolved = manager
            .process_action(&id, PlayerAction::Stand)
            .expect("process stand");
        let recorded = scoreboard.get().expect("get");
        let expected_total = match resolved.winner.expect("winner") {
            Winner::Draw => 0,
            _ => 1,
        };
        assert_eq!(recorded.player + recorded.dealer, expected_total);

        for action in [PlayerAction::Hit, PlayerAction::Stand] {
            match manager.process_action(&id, action) {
                Err(SessionError::Game(GameError::InvalidActionForPhase { .. })) => {}
                other => panic!("expected phase rejection, got {:?}", other),
            }
        }

        assert_eq!(scoreboard.get().expect("get"), recorded);
    }

    #[test]
    fn new_round_is_legal_in_any_phase() {
        let manager = test_manager();
        let id = manager
            .create_table(TableConfig {
                deck_count: 2,
                ..Default::default()
            })
            .expect("create table");

        // Mid-round: abandon the hand in flight.
        let state = manager
            .process_action(&id, PlayerAction::NewRound)
            .expect("new round mid-hand");
        assert_eq!(state.phase, Phase::PlayerTurn);
        assert_eq!(state.cards_remaining, 2 * 52 - 4);
        assert!(state.scoreboard.is_none());

        // After resolution: the usual path back to play.
        manager
            .process_action(&id, PlayerAction::Stand)
            .expect("process stand");
        let state = manager
            .process_action(&id, PlayerAction::NewRound)
            .expect("new round after resolution");
        assert_eq!(state.phase, Phase::PlayerTurn);
        assert!(state.winner.is_none());
        assert_eq!(state.player_hand.len(), 2);
        assert_eq!(state.dealer_hand.len(), 2);
        assert_eq!(state.cards_remaining, 2 * 52 - 4);
    }

    #[test]
    fn seeded_tables_deal_identical_opening_hands() {
        let manager = test_manager();
        let config = TableConfig {
            seed: Some(42),
            ..Default::default()
        };
        let first = manager.create_table(config).expect("create table");
        let second = manager.create_table(config).expect("create table");

        let a = manager.state(&first).expect("state");
        let b = manager.state(&second).expect("state");
        assert_eq!(a.player_hand, b.player_hand);
        assert_eq!(a.dealer_hand, b.dealer_hand);
        assert_eq!(a.player_value, b.player_value);
    }

    #[test]
    fn rejects_deck_counts_outside_the_allowed_range() {
        let manager = test_manager();

        for decks in [0, MAX_DECKS + 1] {
            let config = TableConfig {
                deck_count: decks,
                ..Default::default()
            };
            match manager.create_table(config) {
                Err(SessionError::InvalidConfig(_)) => {}
                other => panic!("expected invalid config for {} decks, got {:?}", decks, other),
            }
        }
    }

    #[test]
    fn expired_table_is_removed_and_reported_gone() {
        let manager = test_manager();
        let id = manager
            .create_table(TableConfig::default())
            .expect("create table");
        let session = manager.get_table(&id).expect("get table");

        session.force_last_active(Instant::now() - Duration::from_secs(3600));

        match manager.state(&id) {
            Err(SessionError::Expired(_)) => {}
            other => panic!("expected expired, got {:?}", other),
        }
        match manager.get_table(&id) {
            Err(SessionError::NotFound(_)) => {}
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[test]
    fn cleanup_expired_sessions_removes_stale_entries() {
        let manager = SessionManager::with_ttl(
            Arc::new(ScoreboardStore::in_memory()),
            Duration::from_secs(1),
        );
        let id = manager
            .create_table(TableConfig::default())
            .expect("create table");
        let session = manager.get_table(&id).expect("get table");

        session.force_last_active(Instant::now() - Duration::from_secs(5));
        manager.cleanup_expired_sessions();

        match manager.get_table(&id) {
            Err(SessionError::NotFound(_)) => {}
            other => panic!("expected not found, got {:?}", other),
        }
        assert!(manager.active_tables().is_empty());
    }

    #[test]
    fn concurrent_table_creation_is_safe() {
        let manager = Arc::new(test_manager());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let manager = Arc::clone(&manager);
            handles.push(thread::spawn(move || {
                let mut ids = Vec::new();
                for _ in 0..32 {
                    let id = manager
                        .create_table(TableConfig::default())
                        .expect("create table");
                    ids.push(id);
                }
                ids
            }));
        }

        let mut unique = HashSet::new();
        for handle in handles {
            for id in handle.join().expect("join thread") {
                assert!(unique.insert(id));
            }
        }

        let active = manager.active_tables();
        assert_eq!(active.len(), unique.len());
    }

    #[test]
    fn deleting_a_table_removes_it() {
        let manager = test_manager();
        let id = manager
            .create_table(TableConfig::default())
            .expect("create table");

        manager.delete_table(&id).expect("delete table");

        match manager.get_table(&id) {
            Err(SessionError::NotFound(_)) => {}
            other => panic!("expected not found, got {:?}", other),
        }
        match manager.delete_table(&id) {
            Err(SessionError::NotFound(_)) => {}
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[test]
    fn persistence_failure_surfaces_without_unresolving_the_round() {
        // Parent directory does not exist, so recording a win fails at
        // the write while reads of the fresh scoreboard still work.
        let bad_path = std::env::temp_dir()
            .join(format!("blackjack-missing-{}", Uuid::new_v4()))
            .join("scores.json");

        for seed in 0..50 {
            let scoreboard = Arc::new(ScoreboardStore::open(&bad_path).expect("open"));
            let manager =
                SessionManager::with_ttl(Arc::clone(&scoreboard), Duration::from_secs(60));
            let config = TableConfig {
                seed: Some(seed),
                ..Default::default()
            };
            let id = manager.create_table(config).expect("create table");

            match manager.process_action(&id, PlayerAction::Stand) {
                Err(SessionError::Scoreboard(_)) => {
                    // The write failed after resolution; the outcome stands
                    // and the in-memory totals are untouched.
                    let state = manager.state(&id).expect("state");
                    assert_eq!(state.phase, Phase::Resolved);
                    assert!(state.winner.is_some());
                    assert_ne!(state.winner, Some(Winner::Draw));
                    assert_eq!(scoreboard.get().expect("get"), Scoreboard::default());
                    return;
                }
                Ok(state) => {
                    // A draw records nothing, so nothing could fail.
                    assert_eq!(state.winner, Some(Winner::Draw));
                }
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }
        panic!("expected at least one decisive round across 50 seeds");
    }

    #[test]
    fn card_views_mask_only_face_down_cards() {
        let up = Card::new(Rank::Ace, Suit::Spades);
        let down = Card::new(Rank::King, Suit::Hearts).face_down();

        assert_eq!(
            serde_json::to_value(CardView::from(&up)).expect("serialize"),
            serde_json::json!({"rank": "A", "suit": "Spades"})
        );
        assert_eq!(
            serde_json::to_value(CardView::from(&down)).expect("serialize"),
            serde_json::json!({"hidden": true})
        );
    }

    #[test]
    fn state_response_omits_empty_fields() {
        let manager = test_manager();
        let id = manager
            .create_table(TableConfig::default())
            .expect("create table");

        let state = manager.state(&id).expect("state");
        let json = serde_json::to_value(&state).expect("serialize");

        assert!(json.get("winner").is_none());
        assert!(json.get("scoreboard").is_none());
        assert_eq!(json["phase"], "player_turn");
        assert_eq!(json["dealer_hand"][1], serde_json::json!({"hidden": true}));
    }

    #[test]
    fn table_config_defaults_apply_to_missing_fields() {
        let config: TableConfig = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(config, TableConfig::default());
        assert_eq!(config.deck_count, 6);
        assert_eq!(config.countdown_seconds, 5);
        assert_eq!(config.seed, None);

        let config: TableConfig =
            serde_json::from_str(r#"{"deck_count": 2, "seed": 9}"#).expect("deserialize");
        assert_eq!(config.deck_count, 2);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.countdown_seconds, 5);
    }
}

/// Shoe and pacing options for a table.
///
/// `countdown_seconds` is a display hint for clients that show a timer
/// between rounds; the server never schedules anything off it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableConfig {
    pub deck_count: usize,
    pub countdown_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            deck_count: 6,
            countdown_seconds: 5,
            seed: None,
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.deck_count < 1 || self.deck_count > MAX_DECKS {
            return Err(SessionError::InvalidConfig(format!(
                "deck_count must be between 1 and {}, got {}",
                MAX_DECKS, self.deck_count
            )));
        }
        Ok(())
    }
}

/// A card as clients see it: face-up cards carry their rank and suit,
/// the dealer's hole card is a placeholder until the round reveals it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CardView {
    FaceUp { rank: Rank, suit: Suit },
    Hidden { hidden: bool },
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        if card.face_up {
            CardView::FaceUp {
                rank: card.rank,
                suit: card.suit,
            }
        } else {
            CardView::Hidden { hidden: true }
        }
    }
}

/// Snapshot of a table's round as served to clients.
///
/// `dealer_value` counts face-up cards only, so it never leaks the
/// hole card while the player is still deciding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundStateResponse {
    pub table_id: TableId,
    pub phase: Phase,
    pub player_hand: Vec<CardView>,
    pub dealer_hand: Vec<CardView>,
    pub player_value: u32,
    pub dealer_value: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
    pub cards_remaining: usize,
    pub countdown_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoreboard: Option<Scoreboard>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Table not found: {0}")]
    NotFound(TableId),
    #[error("Table expired: {0}")]
    Expired(TableId),
    #[error("Invalid table configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Scoreboard(#[from] ScoreboardError),
    #[error("Table storage poisoned")]
    StoragePoisoned,
}

impl IntoErrorResponse for SessionError {
    fn status_code(&self) -> warp::http::StatusCode {
        use warp::http::StatusCode;
        match self {
            SessionError::NotFound(_) => StatusCode::NOT_FOUND,
            SessionError::Expired(_) => StatusCode::GONE,
            SessionError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            SessionError::Game(_) => StatusCode::BAD_REQUEST,
            SessionError::Scoreboard(err) => err.status_code(),
            SessionError::StoragePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SessionError::NotFound(_) => "table_not_found",
            SessionError::Expired(_) => "table_expired",
            SessionError::InvalidConfig(_) => "invalid_table_config",
            SessionError::Game(GameError::InvalidActionForPhase { .. }) => {
                "invalid_action_for_phase"
            }
            SessionError::Game(GameError::InvalidDeckCount { .. }) => "invalid_deck_count",
            SessionError::Game(GameError::ShoeTooSmall { .. }) => "shoe_too_small",
            SessionError::Scoreboard(err) => err.error_code(),
            SessionError::StoragePoisoned => "table_storage_error",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            SessionError::NotFound(id) => Some(serde_json::json!({
                "table_id": id
            })),
            SessionError::Expired(id) => Some(serde_json::json!({
                "table_id": id,
                "reason": "Table expired due to inactivity"
            })),
            SessionError::Game(GameError::InvalidActionForPhase { action, phase }) => {
                Some(serde_json::json!({
                    "action": action,
                    "phase": phase
                }))
            }
            _ => None,
        }
    }

    fn severity(&self) -> crate::errors::ErrorSeverity {
        use crate::errors::ErrorSeverity;
        match self {
            SessionError::StoragePoisoned => ErrorSeverity::Critical,
            SessionError::Scoreboard(err) => err.severity(),
            _ => ErrorSeverity::Client,
        }
    }
}
