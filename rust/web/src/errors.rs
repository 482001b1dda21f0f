//! The JSON error envelope shared by every API endpoint, and the trait
//! that maps domain errors onto it with severity-aware logging.

use serde::{Deserialize, Serialize};
use std::fmt;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::Reply;

/// Wire format for errors: `{"error", "message", "details"?}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "table_not_found")
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured context, omitted from the body when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Attaches structured context to the envelope.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Renders the envelope as a JSON response with the given status.
    pub fn into_response(self, status: StatusCode) -> Response {
        reply::with_status(reply::json(&self), status).into_response()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// How an error should be treated in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// The caller's fault (4xx); expected during normal operation
    Client,
    /// Our fault (5xx); somebody should look at it
    Server,
    /// State may be corrupted; somebody should look at it now
    Critical,
}

/// Maps a domain error onto the shared envelope.
///
/// Implementors supply the status, code, and message; `details` and
/// `severity` have defaults, with severity derived from the status
/// class. [`IntoErrorResponse::into_http_response`] is the only entry
/// point handlers need.
pub trait IntoErrorResponse {
    fn status_code(&self) -> StatusCode;

    /// Machine-readable code, stable across releases.
    fn error_code(&self) -> &'static str;

    fn error_message(&self) -> String;

    /// Structured context for the `details` field.
    fn error_details(&self) -> Option<serde_json::Value> {
        None
    }

    fn severity(&self) -> ErrorSeverity {
        if self.status_code().is_server_error() {
            ErrorSeverity::Server
        } else {
            ErrorSeverity::Client
        }
    }

    fn to_error_response(&self) -> ErrorResponse {
        let response = ErrorResponse::new(self.error_code(), self.error_message());
        match self.error_details() {
            Some(details) => response.with_details(details),
            None => response,
        }
    }

    /// Logs the error at a level matching its severity, then renders
    /// the envelope.
    fn into_http_response(self) -> Response
    where
        Self: Sized,
    {
        let status = self.status_code();
        let severity = self.severity();
        let response = self.to_error_response();

        match severity {
            ErrorSeverity::Client => {
                tracing::info!(
                    code = %response.error,
                    status = status.as_u16(),
                    "request rejected"
                );
            }
            ErrorSeverity::Server => {
                tracing::error!(
                    code = %response.error,
                    message = %response.message,
                    "request failed"
                );
            }
            ErrorSeverity::Critical => {
                tracing::error!(
                    code = %response.error,
                    message = %response.message,
                    "critical failure"
                );
            }
        }

        response.into_response(status)
    }
}
