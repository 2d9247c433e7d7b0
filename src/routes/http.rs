// GET handlers: version, system-info snapshot, formatted status

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::AppState;
use crate::dashboard::{PanelState, StatusPanel, UNAVAILABLE_MESSAGE};
use crate::sampler::SampleError;

/// Package name and version (from Cargo.toml at build time).
const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SampleQuery {
    interval_ms: Option<u64>,
}

pub(super) enum ApiError {
    BadInterval { got: u64, max: u64 },
    Unavailable,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadInterval { got, max } => (
                StatusCode::BAD_REQUEST,
                format!("intervalMs must be between 1 and {}, got {}", max, got),
            ),
            ApiError::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                UNAVAILABLE_MESSAGE.to_string(),
            ),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl SampleQuery {
    fn interval(&self, state: &AppState) -> Result<u64, ApiError> {
        let max = state.config.sampling.max_interval_ms;
        match self.interval_ms {
            None => Ok(state.config.sampling.interval_ms),
            Some(ms) if ms == 0 || ms > max => Err(ApiError::BadInterval { got: ms, max }),
            Some(ms) => Ok(ms),
        }
    }
}

/// GET /version — returns service name and version.
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/system-info — samples the host and returns one SystemSnapshot.
/// A dropped request cancels the pending wait through the drop guard.
pub(super) async fn system_info_handler(
    State(state): State<AppState>,
    Query(query): Query<SampleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let interval = query.interval(&state)?;
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();
    match state.sampler.sample(interval, &cancel).await {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(e) => {
            if !matches!(e, SampleError::Cancelled) {
                tracing::warn!(error = %e, operation = "system_info", "sampling failed");
            }
            Err(ApiError::Unavailable)
        }
    }
}

/// GET /api/status — the status panel's cards, formatted for display.
pub(super) async fn status_handler(
    State(state): State<AppState>,
    Query(query): Query<SampleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let interval = query.interval(&state)?;
    let mut panel = StatusPanel::mount(state.sampler.clone(), interval);
    match panel.rendered().await {
        PanelState::Ready(view) => Ok(Json(*view)),
        _ => Err(ApiError::Unavailable),
    }
}
