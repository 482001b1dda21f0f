use std::time::Instant;

use warp::http::Method;
use warp::path::FullPath;
use warp::reject::Rejection;
use warp::reply::{Reply, Response};
use warp::Filter;

/// Wraps a route tree with arrival and completion logging.
///
/// Arrival logs the method and path. Completion logs the response
/// status and elapsed time, raised to `warn` for client errors and
/// `error` for server errors so failures stand out in a scan of the
/// log without the response bodies.
pub fn with_request_logging<F, T>(
    filter: F,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone
where
    F: Filter<Extract = (T,), Error = Rejection> + Clone + Send + Sync + 'static,
    T: Reply,
{
    warp::method()
        .and(warp::path::full())
        .map(|method: Method, path: FullPath| {
            tracing::info!(method = %method, path = path.as_str(), "incoming request");
            (method, path, Instant::now())
        })
        .and(filter)
        .map(|(method, path, start): (Method, FullPath, Instant), reply: T| {
            let response = reply.into_response();
            log_completion(&method, path.as_str(), &response, start);
            response
        })
}

fn log_completion(method: &Method, path: &str, response: &Response, start: Instant) {
    let status = response.status();
    let duration_ms = start.elapsed().as_millis();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path,
            status = status.as_u16(),
            duration_ms,
            "request completed"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            path,
            status = status.as_u16(),
            duration_ms,
            "request completed"
        );
    } else {
        tracing::info!(
            method = %method,
            path,
            status = status.as_u16(),
            duration_ms,
            "request completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::TestLogSubscriber;
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;
    use warp::http::StatusCode;

    fn capture() -> (TestLogSubscriber, tracing::subscriber::DefaultGuard) {
        let capture = TestLogSubscriber::new();
        let registry = Registry::default().with(capture.clone().into_layer::<Registry>());
        let guard = tracing::subscriber::set_default(registry);
        (capture, guard)
    }

    #[tokio::test]
    async fn logs_arrival_and_completion_with_status() {
        let (capture, _guard) = capture();

        let route = warp::path!("api" / "health")
            .and(warp::get())
            .map(|| warp::reply::json(&"ok"));

        let response = warp::test::request()
            .method("GET")
            .path("/api/health")
            .reply(&with_request_logging(route))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let entries = capture.entries();
        let arrival = entries
            .iter()
            .find(|entry| entry.message == "incoming request")
            .expect("arrival entry");
        assert_eq!(arrival.level, Level::INFO);
        assert_eq!(arrival.field("method"), Some("GET"));
        assert_eq!(arrival.field("path"), Some("/api/health"));

        let completion = entries
            .iter()
            .find(|entry| entry.message == "request completed")
            .expect("completion entry");
        assert_eq!(completion.level, Level::INFO);
        assert_eq!(completion.field("status"), Some("200"));
        assert!(completion.field("duration_ms").is_some());
    }

    #[tokio::test]
    async fn client_errors_complete_at_warn_level() {
        let (capture, _guard) = capture();

        let route = warp::path!("api" / "tables" / String)
            .and(warp::get())
            .map(|_id: String| {
                warp::reply::with_status(warp::reply::json(&"missing"), StatusCode::NOT_FOUND)
            });

        let response = warp::test::request()
            .method("GET")
            .path("/api/tables/absent")
            .reply(&with_request_logging(route))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let completion = capture
            .entries()
            .into_iter()
            .find(|entry| entry.message == "request completed")
            .expect("completion entry");
        assert_eq!(completion.level, Level::WARN);
        assert_eq!(completion.field("status"), Some("404"));
        assert_eq!(completion.field("path"), Some("/api/tables/absent"));
    }
}
