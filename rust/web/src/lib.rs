pub mod errors;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod scoreboard;
pub mod server;
pub mod session;
pub mod static_handler;

pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use logging::{LogEntry, TestLogSubscriber, init_logging, init_test_logging};
pub use middleware::with_request_logging;
pub use scoreboard::{Scoreboard, ScoreboardError, ScoreboardStore};
pub use server::{AppContext, ServerConfig, ServerError, ServerHandle, WebServer};
pub use session::{
    CardView, MAX_DECKS, RoundStateResponse, SessionError, SessionManager, TableConfig, TableId,
    TableSession,
};
pub use static_handler::{StaticError, StaticHandler};
