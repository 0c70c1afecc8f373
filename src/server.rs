//! Read-only data endpoint.
//!
//! `GET /api/population` re-reads the configured CSV on every request and
//! returns the parsed records. No request parameters, no server-side state.
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::dataset::{self, Record};
use crate::error::RaceError;

#[derive(Clone)]
pub struct AppState {
    csv_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: Arc::new(csv_path.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PopulationResponse {
    pub success: bool,
    pub data: Vec<Record>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/population", get(handle_population))
        .with_state(state)
}

/// Serve the API on `0.0.0.0:{port}` until `shutdown` is cancelled.
pub async fn run(port: u16, state: AppState, shutdown: CancellationToken) -> Result<(), RaceError> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .map_err(|e| RaceError::General(format!("bind api :{port}: {e}")))?;
    tracing::info!(port, csv = %state.csv_path.display(), "population API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| RaceError::General(format!("axum serve: {e}")))?;

    Ok(())
}

// --- REST: GET /api/population ---

pub async fn handle_population(State(state): State<AppState>) -> Response {
    let path = state.csv_path.as_ref().clone();
    let loaded = tokio::task::spawn_blocking(move || dataset::load_csv_file(path))
        .await
        .unwrap_or_else(|e| Err(RaceError::General(format!("load task: {e}"))));

    match loaded {
        Ok(data) => {
            let count = data.len();
            tracing::debug!(count, "served population records");
            Json(PopulationResponse {
                success: true,
                data,
                count,
            })
            .into_response()
        }
        Err(RaceError::NotFound(path)) => {
            tracing::warn!(%path, "CSV file not found");
            (
                StatusCode::NOT_FOUND,
                Json(ErrorBody {
                    error: "CSV file not found",
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "error processing CSV");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "Failed to process CSV file",
                }),
            )
                .into_response()
        }
    }
}
