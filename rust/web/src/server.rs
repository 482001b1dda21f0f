//! HTTP server assembly: configuration, shared state, route wiring, and the
//! handle used to shut a running server down.

use std::convert::Infallible;
use std::fs;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;
use warp::filters::BoxedFilter;
use warp::reply::Reply;
use warp::Filter;

use crate::handlers;
use crate::middleware;
use crate::scoreboard::{Scoreboard, ScoreboardError, ScoreboardStore};
use crate::session::SessionManager;
use crate::static_handler::StaticHandler;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
    static_dir: PathBuf,
    scoreboard_path: Option<PathBuf>,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            port,
            static_dir: static_dir.into(),
            scoreboard_path: None,
        }
    }

    /// Persists win totals at `path` instead of keeping them in memory.
    pub fn with_scoreboard_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.scoreboard_path = Some(path.into());
        self
    }

    pub fn for_tests() -> Self {
        Self::new("127.0.0.1", 0, std::env::temp_dir().join("blackjack_web_static"))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    pub fn scoreboard_path(&self) -> Option<&Path> {
        self.scoreboard_path.as_deref()
    }
}

/// Shared handles threaded through every route.
#[derive(Debug, Clone)]
pub struct AppContext {
    config: ServerConfig,
    scoreboard: Arc<ScoreboardStore>,
    sessions: Arc<SessionManager>,
    static_handler: Arc<StaticHandler>,
}

impl AppContext {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        fs::create_dir_all(config.static_dir()).map_err(|err| {
            ServerError::ConfigError(format!("could not create static directory: {err}"))
        })?;

        let scoreboard = match config.scoreboard_path() {
            Some(path) => Arc::new(ScoreboardStore::open(path)?),
            None => Arc::new(ScoreboardStore::in_memory()),
        };
        let sessions = Arc::new(SessionManager::new(Arc::clone(&scoreboard)));
        let static_handler = Arc::new(StaticHandler::new(config.static_dir().to_path_buf()));

        Ok(Self {
            config,
            scoreboard,
            sessions,
            static_handler,
        })
    }

    pub fn new_for_tests() -> Self {
        Self::new(ServerConfig::for_tests()).expect("test context")
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn scoreboard(&self) -> Arc<ScoreboardStore> {
        Arc::clone(&self.scoreboard)
    }

    pub fn sessions(&self) -> Arc<SessionManager> {
        Arc::clone(&self.sessions)
    }

    pub fn static_handler(&self) -> Arc<StaticHandler> {
        Arc::clone(&self.static_handler)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not bind server address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Invalid server configuration: {0}")]
    ConfigError(String),
    #[error("Could not open scoreboard storage: {0}")]
    ScoreboardError(#[from] ScoreboardError),
}

#[derive(Debug, Clone)]
pub struct WebServer {
    context: AppContext,
}

impl WebServer {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let context = AppContext::new(config)?;
        Ok(Self { context })
    }

    /// Binds the configured address and serves until the returned handle is
    /// shut down or dropped.
    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let context = self.context;
        let bind_addr = Self::resolve_bind_addr(context.config())?;

        // Probe the port up front so an in-use address fails with an error
        // the caller can match on. Port 0 is left for warp to claim.
        if bind_addr.port() != 0 {
            std::net::TcpListener::bind(bind_addr)?;
        }

        let routes = middleware::with_request_logging(Self::routes(&context));
        let (stop_tx, stop_rx) = oneshot::channel();

        let (addr, serving) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(bind_addr, async move {
                let _ = stop_rx.await;
            })
            .map_err(Self::map_warp_error)?;

        info!(address = %addr, "accepting connections");

        let task = tokio::spawn(async move {
            serving.await;
            Ok(())
        });

        Ok(ServerHandle::new(addr, stop_tx, task))
    }

    fn resolve_bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        if let Ok(addr) = config.host().parse::<SocketAddr>() {
            return Ok(addr);
        }

        if let Ok(ip) = config.host().parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port()));
        }

        let authority = format!("{}:{}", config.host(), config.port());
        authority
            .to_socket_addrs()
            .map_err(|err| {
                ServerError::ConfigError(format!("cannot resolve `{authority}`: {err}"))
            })?
            .next()
            .ok_or_else(|| {
                ServerError::ConfigError(format!("`{authority}` resolved to no addresses"))
            })
    }

    // warp reports bind failures as opaque errors; recover the io::Error so
    // callers see BindError for an occupied port.
    fn map_warp_error(err: warp::Error) -> ServerError {
        use std::error::Error as StdError;

        match err.source().and_then(|source| source.downcast_ref::<std::io::Error>()) {
            Some(io_err) => {
                ServerError::BindError(std::io::Error::new(io_err.kind(), io_err.to_string()))
            }
            None => ServerError::ConfigError(err.to_string()),
        }
    }

    fn routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let health = Self::health_route();
        let static_routes = Self::static_routes(context);
        let deck = Self::deck_route();
        let scoreboard_routes = Self::scoreboard_routes(context);
        let table_routes = Self::table_routes(context);

        health
            .or(static_routes)
            .unify()
            .or(deck)
            .unify()
            .or(scoreboard_routes)
            .unify()
            .or(table_routes)
            .unify()
            .boxed()
    }

    fn health_route() -> BoxedFilter<(warp::reply::Response,)> {
        warp::path("health")
            .and(warp::path::end())
            .and(warp::get())
            .map(|| handlers::health::health().into_response())
            .boxed()
    }

    fn static_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let files = context.static_handler();

        let index = warp::path::end()
            .and(warp::get())
            .and(Self::inject(files.clone()))
            .and_then(|files: Arc<StaticHandler>| async move {
                let response = files
                    .index()
                    .await
                    .unwrap_or_else(|err| files.error_response(err));
                Ok::<_, Infallible>(response)
            });

        let assets = warp::path("static")
            .and(warp::get())
            .and(warp::path::tail())
            .and(Self::inject(files))
            .and_then(
                |tail: warp::path::Tail, files: Arc<StaticHandler>| async move {
                    let response = files
                        .asset(tail.as_str())
                        .await
                        .unwrap_or_else(|err| files.error_response(err));
                    Ok::<_, Infallible>(response)
                },
            );

        index.or(assets).unify().boxed()
    }

    fn deck_route() -> BoxedFilter<(warp::reply::Response,)> {
        warp::path!("api" / "deck")
            .and(warp::get())
            .and(warp::query::<handlers::DeckQuery>())
            .and_then(|query: handlers::DeckQuery| async move {
                let response = handlers::get_deck(query).await;
                Ok::<_, Infallible>(response)
            })
            .boxed()
    }

    fn scoreboard_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let store = context.scoreboard();

        let totals = warp::path!("api" / "scoreboard")
            .and(warp::get())
            .and(Self::inject(store.clone()))
            .and_then(|store: Arc<ScoreboardStore>| async move {
                let response = handlers::get_scoreboard(store).await;
                Ok::<_, Infallible>(response)
            });

        let replace = warp::path!("api" / "scoreboard")
            .and(warp::put())
            .and(Self::inject(store.clone()))
            .and(warp::body::json())
            .and_then(|store: Arc<ScoreboardStore>, scores: Scoreboard| async move {
                let response = handlers::put_scoreboard(store, scores).await;
                Ok::<_, Infallible>(response)
            });

        let reset = warp::path!("api" / "scoreboard")
            .and(warp::delete())
            .and(Self::inject(store))
            .and_then(|store: Arc<ScoreboardStore>| async move {
                let response = handlers::delete_scoreboard(store).await;
                Ok::<_, Infallible>(response)
            });

        totals.or(replace).unify().or(reset).unify().boxed()
    }

    fn table_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let manager = context.sessions();

        let create = warp::path!("api" / "tables")
            .and(warp::post())
            .and(Self::inject(manager.clone()))
            .and(warp::body::json())
            .and_then(
                |manager: Arc<SessionManager>,
                 request: handlers::CreateTableRequest| async move {
                    let response = handlers::create_table(manager, request).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let info = warp::path!("api" / "tables" / String)
            .and(warp::get())
            .and(Self::inject(manager.clone()))
            .and_then(
                |table_id: String, manager: Arc<SessionManager>| async move {
                    let response = handlers::get_table(manager, table_id).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let state = warp::path!("api" / "tables" / String / "state")
            .and(warp::get())
            .and(Self::inject(manager.clone()))
            .and_then(
                |table_id: String, manager: Arc<SessionManager>| async move {
                    let response = handlers::get_table_state(manager, table_id).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let actions = warp::path!("api" / "tables" / String / "actions")
            .and(warp::post())
            .and(Self::inject(manager.clone()))
            .and(warp::body::json())
            .and_then(
                |table_id: String,
                 manager: Arc<SessionManager>,
                 request: handlers::PlayerActionRequest| async move {
                    let response = handlers::submit_action(manager, table_id, request).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let delete = warp::path!("api" / "tables" / String)
            .and(warp::delete())
            .and(Self::inject(manager))
            .and_then(
                |table_id: String, manager: Arc<SessionManager>| async move {
                    let response = handlers::delete_table(manager, table_id).await;
                    Ok::<_, Infallible>(response)
                },
            );

        create
            .or(state)
            .unify()
            .or(actions)
            .unify()
            .or(info)
            .unify()
            .or(delete)
            .unify()
            .boxed()
    }

    /// Makes a shared handle available to a route closure.
    fn inject<T>(value: Arc<T>) -> impl Filter<Extract = (Arc<T>,), Error = Infallible> + Clone
    where
        T: Send + Sync + 'static,
    {
        warp::any().map(move || Arc::clone(&value))
    }
}

#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ServerError>>>,
}

impl ServerHandle {
    fn new(
        addr: SocketAddr,
        stop: oneshot::Sender<()>,
        task: JoinHandle<Result<(), ServerError>>,
    ) -> Self {
        Self {
            addr,
            stop: Some(stop),
            task: Some(task),
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    /// Signals the server to stop accepting connections and waits for the
    /// serve task to finish in-flight requests.
    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }

        let Some(task) = self.task.take() else {
            return Ok(());
        };

        task.await
            .map_err(|err| ServerError::ConfigError(format!("server task failed: {err}")))?
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }

        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
