use std::path::{Component, Path, PathBuf};

use mime_guess::{mime, MimeGuess};
use tokio::fs;
use warp::http::header::{HeaderValue, CACHE_CONTROL, CONTENT_TYPE};
use warp::http::{Response, StatusCode};
use warp::hyper::Body;

#[derive(Debug, thiserror::Error)]
pub enum StaticError {
    #[error("asset not found")]
    NotFound,
    #[error("failed to read asset: {0}")]
    Io(#[from] std::io::Error),
}

/// Serves the table UI and its assets from a directory on disk.
///
/// Request paths are rebuilt component by component, so `..` segments
/// and absolute paths can never escape the configured root.
#[derive(Debug, Clone)]
pub struct StaticHandler {
    root: PathBuf,
    cache_control: HeaderValue,
}

impl StaticHandler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache_control: HeaderValue::from_static("public, max-age=86400"),
        }
    }

    pub async fn index(&self) -> Result<warp::reply::Response, StaticError> {
        self.deliver("index.html").await
    }

    pub async fn asset(&self, path: &str) -> Result<warp::reply::Response, StaticError> {
        if path.is_empty() {
            return Err(StaticError::NotFound);
        }
        self.deliver(path).await
    }

    pub fn error_response(&self, error: StaticError) -> warp::reply::Response {
        match error {
            StaticError::NotFound => Self::text_response(StatusCode::NOT_FOUND, "Not Found"),
            StaticError::Io(err) => {
                tracing::warn!(error = %err, "failed to serve static asset");
                Self::text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }

    async fn deliver(&self, request_path: &str) -> Result<warp::reply::Response, StaticError> {
        let target = self.disk_path(request_path)?;
        let bytes = fs::read(&target).await.map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => StaticError::NotFound,
            _ => StaticError::Io(err),
        })?;

        Ok(self.file_response(&target, bytes))
    }

    fn file_response(&self, path: &Path, bytes: Vec<u8>) -> warp::reply::Response {
        let mime = MimeGuess::from_path(path).first_or_octet_stream();
        let content_type = if mime.type_() == mime::TEXT {
            format!("{}; charset=utf-8", mime.essence_str())
        } else {
            mime.essence_str().to_string()
        };

        let mut response = Response::new(Body::from(bytes));
        let headers = response.headers_mut();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(&content_type)
                .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
        );
        headers.insert(CACHE_CONTROL, self.cache_control.clone());
        response
    }

    fn text_response(status: StatusCode, body: &'static str) -> warp::reply::Response {
        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        response
    }

    fn disk_path(&self, request_path: &str) -> Result<PathBuf, StaticError> {
        let mut below_root = PathBuf::new();
        for component in Path::new(request_path).components() {
            match component {
                Component::Normal(segment) => below_root.push(segment),
                Component::CurDir | Component::RootDir => {}
                Component::ParentDir | Component::Prefix(_) => return Err(StaticError::NotFound),
            }
        }

        if below_root.as_os_str().is_empty() {
            return Err(StaticError::NotFound);
        }

        Ok(self.root.join(below_root))
    }
}
