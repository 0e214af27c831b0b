//! HTTP handlers: the confined static file fallback and health checks.

use axum::body::{Body, HttpBody};
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{debug, error, instrument, warn};

use crate::content_type::content_type_for;
use crate::resolver::Resolution;
use crate::state::AppState;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub uptime_secs: u64,
    pub default_document: String,
}

fn plain(status: StatusCode, body: &'static str) -> Response {
    (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], body).into_response()
}

fn internal_error() -> Response {
    plain(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
}

/// Same status and headers as the GET response, with the body dropped.
fn head_only(response: Response) -> Response {
    let (mut parts, body) = response.into_parts();
    if let Some(len) = body.size_hint().exact() {
        parts.headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    }
    Response::from_parts(parts, Body::empty())
}

/// Serve any request path from the public directory.
///
/// Every path goes through the resolver; nothing outside the root is ever
/// opened.
#[instrument(skip_all, fields(method = %method, path = %uri))]
pub async fn serve_static(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET, HEAD"), (header::CONTENT_TYPE, TEXT_PLAIN)],
            "405 Method Not Allowed",
        )
            .into_response();
    }

    let response = resolve_and_read(state, uri).await;
    if method == Method::HEAD {
        return head_only(response);
    }
    response
}

async fn resolve_and_read(state: AppState, uri: Uri) -> Response {
    let raw = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let resolver = state.resolver().clone();
    let resolution = match tokio::task::spawn_blocking(move || resolver.resolve(&raw)).await {
        Ok(resolution) => resolution,
        Err(e) => {
            error!(error = %e, "path resolution task failed");
            return internal_error();
        }
    };

    match resolution {
        Resolution::Forbidden => {
            warn!("blocked request outside public directory");
            plain(StatusCode::FORBIDDEN, "403 Forbidden")
        }
        Resolution::NotFound(_) => {
            debug!("not found");
            plain(StatusCode::NOT_FOUND, "404 Not Found")
        }
        Resolution::Found(path) => match tokio::fs::read(&path).await {
            Ok(bytes) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, content_type_for(&path))],
                bytes,
            )
                .into_response(),
            Err(e) => {
                error!(file = %path.display(), error = %e, "failed to read file");
                internal_error()
            }
        },
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Lightweight liveness check.
pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        uptime_secs: state.uptime_secs(),
        default_document: state.resolver().default_document().to_string(),
    })
}
