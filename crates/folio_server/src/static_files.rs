//! Static site serving with app-shell fallback

use crate::app::AppState;
use crate::meta::{self, PreviewMeta};
use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StaticError {
    #[error("Invalid path: {0}")]
    Traversal(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StaticError {
    pub fn status(&self) -> StatusCode {
        match self {
            StaticError::Traversal(_) => StatusCode::BAD_REQUEST,
            StaticError::NotFound(_) => StatusCode::NOT_FOUND,
            StaticError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StaticError {
    fn into_response(self) -> Response {
        match &self {
            StaticError::Io(e) => tracing::warn!("Static file error: {}", e),
            other => tracing::debug!("{}", other),
        }
        (self.status(), self.to_string()).into_response()
    }
}

/// What a request path maps to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// An existing file under the static root
    File(PathBuf),
    /// The app shell, rewritten for the given request path
    Shell(String),
}

/// Map a request path onto the static root
///
/// Percent-escapes are decoded before checking segments, so `%2e%2e` is
/// rejected like `..`.
pub fn resolve(root: &Path, request_path: &str) -> Result<Target, StaticError> {
    let decoded = percent_decode_str(request_path)
        .decode_utf8()
        .map_err(|_| StaticError::Traversal(request_path.to_string()))?;

    let mut path = root.to_path_buf();
    let mut last = "";
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => continue,
            ".." => return Err(StaticError::Traversal(request_path.to_string())),
            s => {
                path.push(s);
                last = s;
            }
        }
    }

    if path != root && path.is_file() {
        return Ok(Target::File(path));
    }

    // Paths naming a file that does not exist are not app routes
    if last.contains('.') {
        return Err(StaticError::NotFound(decoded.into_owned()));
    }

    Ok(Target::Shell(decoded.into_owned()))
}

/// Content type for a file extension
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        Some("woff") => "font/woff",
        Some("txt") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Read the shell and rewrite its preview tags when `path` is a content page
pub async fn render_shell(state: &AppState, path: &str) -> Result<String, StaticError> {
    let index = state.config.server.static_dir.join(&state.config.server.index);
    let shell = match tokio::fs::read_to_string(&index).await {
        Ok(shell) => shell,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StaticError::NotFound(index.display().to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    Ok(match state.config.page_for_path(path) {
        Some(page) => {
            tracing::debug!(slug = %page.slug, "rewriting preview meta");
            meta::rewrite(&shell, &PreviewMeta::for_page(page, &state.config.site))
        }
        None => shell,
    })
}

pub async fn serve_static(State(state): State<AppState>, uri: Uri) -> Result<Response, StaticError> {
    match resolve(&state.config.server.static_dir, uri.path())? {
        Target::File(path) => {
            let bytes = tokio::fs::read(&path).await?;
            tracing::trace!(path = %path.display(), "static file");
            Ok(([(header::CONTENT_TYPE, content_type(&path))], bytes).into_response())
        }
        Target::Shell(path) => Ok(Html(render_shell(&state, &path).await?).into_response()),
    }
}
