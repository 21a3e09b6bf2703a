//! Axum router wiring.
//!
//! `/` answers the liveness banner, `/{script_name}` serves the collector
//! script, and everything else falls through to the asset directory.
//! Any origin may fetch these assets.

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::{app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    let script = ServeFile::new(state.script_path());
    let assets = ServeDir::new(state.asset_dir());

    Router::new()
        .route("/", get(ops::root))
        .route_service(&state.script_route(), script)
        .fallback_service(assets)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
