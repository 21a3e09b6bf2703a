//! Operational HTTP endpoints.
//!
//! - `/` : liveness banner

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::app_state::AppState;

pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, state.banner().to_string())
}
