//! HTTP surface for the web clicker.
//!
//! The web caller carries no player identity: `/api/state` reports the
//! whole ledger and `/api/click` credits every player at once.

use crate::{error::GameError, store::PlayerStore, types::{Coins, GameState}};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PlayerStore>,
}

impl AppState {
    pub fn new(store: Arc<PlayerStore>) -> Self {
        Self { store }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClickResponse {
    /// New sum of all balances.
    pub balance: Coins,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Create the HTTP router with all routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api/state", get(game_state))
        .route("/api/click", post(click))
        .with_state(state)
}

/// The client page. A `?ref=` query is read by the page, not the server.
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn game_state(State(state): State<AppState>) -> Result<Json<GameState>, ApiError> {
    Ok(Json(state.store.aggregate()?))
}

async fn click(State(state): State<AppState>) -> Result<Json<ClickResponse>, ApiError> {
    let balance = state.store.click()?;
    log::debug!("click: ledger total now {balance}");
    Ok(Json(ClickResponse { balance }))
}

/// Store failures surface as a 500 with a JSON error body.
pub struct ApiError(GameError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::error!("request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": self.0.to_string()
            })),
        )
            .into_response()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<GameError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
