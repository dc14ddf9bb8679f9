use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::modules::archiving::use_cases::run_archive::inbound::http as archive_http;
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/archive", get(archive_http::handle))
        .route("/archive.php", get(archive_http::handle))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
