//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use serde::Serialize;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tracing::{error, warn};

use crate::codec::CodecError;
use crate::lookup::LookupError;
use crate::pagination::{AnchorError, QueryParams, build_relations};
use crate::store::{ConnectionStore, StoreError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<S: ConnectionStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/connections", get(list_connections::<S>))
        // Identifiers are base64 and may contain `/`.
        .route("/connections/*id", get(get_connection::<S>))
        .route("/catalog", get(not_supported_yet))
        .route("/stops", get(not_supported_yet))
        .route("/stops/:id", get(not_supported_yet))
        .route("/routes", get(not_supported_yet))
        .route("/routes/:id", get(not_supported_yet))
        .fallback(not_found)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Check whether the request accepts JSON-LD.
///
/// A missing `Accept` header accepts anything.
fn accepts_json_ld(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(header::ACCEPT) else {
        return true;
    };
    let Ok(accept) = accept.to_str() else {
        return false;
    };

    accept.split(',').any(|range| {
        let mut parts = range.split(';');
        let media = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
        let refused = parts.any(|p| {
            p.trim()
                .strip_prefix("q=")
                .and_then(|q| q.trim().parse::<f32>().ok())
                .is_some_and(|q| q <= 0.0)
        });
        !refused && matches!(media.as_str(), JSON_LD | "application/*" | "*/*")
    })
}

fn require_json_ld(headers: &HeaderMap) -> Result<(), AppError> {
    if accepts_json_ld(headers) {
        Ok(())
    } else {
        Err(AppError::NotAcceptable {
            message: format!("not acceptable, only {JSON_LD} is supported"),
        })
    }
}

fn json_ld<T: Serialize>(body: T) -> Response {
    (
        [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_LD))],
        Json(body),
    )
        .into_response()
}

/// One page of the connections feed.
async fn list_connections<S: ConnectionStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    require_json_ld(&headers)?;

    let params = QueryParams::parse(query.as_deref().unwrap_or_default())?;
    let anchor = state.resolver.resolve(&params, Utc::now())?;
    let page = state.fetcher.fetch(&anchor).await?;
    let relations = build_relations(&page, &anchor);

    let view = ConnectionsPageView::new(&state.base_url, &params, &page, &relations)?;
    Ok(json_ld(view))
}

/// A single connection by identifier.
async fn get_connection<S: ConnectionStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    require_json_ld(&headers)?;

    let connection = state.lookup.get(&id).await?;
    Ok(json_ld(ConnectionView::from_connection(
        &connection,
        &state.base_url,
    )?))
}

/// Endpoints not implemented by this server.
async fn not_supported_yet(headers: HeaderMap) -> AppError {
    match require_json_ld(&headers) {
        Err(e) => e,
        Ok(()) => AppError::NotImplemented {
            message: "not supported yet".to_string(),
        },
    }
}

async fn not_found() -> AppError {
    AppError::NotFound {
        message: "not found".to_string(),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    NotAcceptable { message: String },
    NotImplemented { message: String },
    Internal { message: String },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::NotAcceptable { .. } => StatusCode::NOT_ACCEPTABLE,
            AppError::NotImplemented { .. } => StatusCode::NOT_IMPLEMENTED,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AnchorError> for AppError {
    fn from(e: AnchorError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<CodecError> for AppError {
    fn from(e: CodecError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<LookupError> for AppError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::InvalidId(e) => e.into(),
            LookupError::NotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            LookupError::Integrity { .. } => AppError::Internal {
                message: e.to_string(),
            },
            LookupError::Store(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::NotAcceptable { message }
            | AppError::NotImplemented { message }
            | AppError::Internal { message } => message,
        };

        if status.is_server_error() {
            error!(%status, "{message}");
        } else {
            warn!(%status, "{message}");
        }

        let body = Json(ErrorResponse { ok: false, message });
        (status, body).into_response()
    }
}
