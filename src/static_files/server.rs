//! Static file serving with single-page-application fallback.
//!
//! Every request reads from disk; nothing is cached between requests so a
//! redeployed bundle is picked up immediately.

use std::io;
use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;
use thiserror::Error;
use tokio::fs;

use crate::config::StaticFilesConfig;
use crate::static_files::cache::CachePolicy;
use crate::static_files::mime;

/// Errors that can occur when serving static files.
#[derive(Debug, Error)]
pub enum StaticFileError {
    /// Neither the asset nor the default document exists.
    #[error("not found: {0}")]
    NotFound(String),

    /// Only GET and HEAD are served.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// I/O error other than "not found".
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StaticFileError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StaticFileError {
    fn into_response(self) -> Response {
        let content_type = [(header::CONTENT_TYPE, "text/plain; charset=utf-8")];
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, content_type, "Not Found").into_response(),
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                [
                    (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                    (header::ALLOW, "GET, HEAD"),
                ],
                "Method Not Allowed",
            )
                .into_response(),
            Self::Io { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                content_type,
                "Internal Server Error",
            )
                .into_response(),
        }
    }
}

/// A file ready to be sent.
#[derive(Debug)]
pub struct ServedAsset {
    pub path: PathBuf,
    pub body: Vec<u8>,
    pub content_type: &'static str,
    pub cache: CachePolicy,
    /// Served in place of an unmatched path.
    pub fallback: bool,
}

impl IntoResponse for ServedAsset {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, self.content_type.to_string()),
                (header::CACHE_CONTROL, self.cache.to_header_value()),
            ],
            Body::from(self.body),
        )
            .into_response()
    }
}

/// Serves the compiled SPA bundle from a root directory.
#[derive(Debug, Clone)]
pub struct StaticFileServer {
    root: PathBuf,
    index_file: String,
    asset_max_age_secs: u64,
}

impl StaticFileServer {
    pub fn new(config: &StaticFilesConfig) -> Self {
        Self {
            root: config.root.clone(),
            index_file: config.index_file.clone(),
            asset_max_age_secs: config.asset_max_age_secs,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load the file for a request, falling back to the default document.
    pub async fn serve(&self, method: &Method, path: &str) -> Result<ServedAsset, StaticFileError> {
        if *method != Method::GET && *method != Method::HEAD {
            return Err(StaticFileError::MethodNotAllowed);
        }

        if let Some(file) = self.resolve(path) {
            if let Some(body) = read_regular_file(&file).await? {
                let content_type = mime::content_type_for(&file);
                return Ok(ServedAsset {
                    cache: CachePolicy::for_content_type(content_type, self.asset_max_age_secs),
                    path: file,
                    body,
                    content_type,
                    fallback: false,
                });
            }
        }

        let index = self.root.join(&self.index_file);
        match read_regular_file(&index).await? {
            Some(body) => Ok(ServedAsset {
                path: index,
                body,
                content_type: mime::HTML,
                cache: CachePolicy::NoCache,
                fallback: true,
            }),
            None => Err(StaticFileError::NotFound(path.to_string())),
        }
    }

    /// Map a request path to a file under the root.
    ///
    /// Segments are percent-decoded one at a time. Returns `None` for paths
    /// that could escape the root or that are not UTF-8 once decoded; those are
    /// handled like any other unmatched path.
    pub fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let relative = match request_path.trim_start_matches('/') {
            "" => self.index_file.as_str(),
            rest => rest,
        };

        let mut resolved = self.root.clone();
        for raw in relative.split('/') {
            let segment = percent_decode_str(raw).decode_utf8().ok()?;
            match &*segment {
                "" | "." => continue,
                ".." => return None,
                s if s.contains(['/', '\\', '\0']) => return None,
                s => resolved.push(s),
            }
        }

        (resolved != self.root).then_some(resolved)
    }
}

/// `Ok(None)` when the path is missing or not a regular file.
async fn read_regular_file(path: &Path) -> Result<Option<Vec<u8>>, StaticFileError> {
    let io_error = |source| StaticFileError::Io {
        path: path.to_path_buf(),
        source,
    };

    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Ok(None),
        Err(e) if is_missing(&e) => return Ok(None),
        Err(e) => return Err(io_error(e)),
    }

    match fs::read(path).await {
        Ok(body) => Ok(Some(body)),
        Err(e) if is_missing(&e) => Ok(None),
        Err(e) => Err(io_error(e)),
    }
}

fn is_missing(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}
