use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::state::AppState;

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/state", get(api::get_state).post(api::post_state))
        .route("/api/lesson/visit", post(api::lesson_visit))
        .route("/api/progress/{module}", post(api::module_progress))
        .route("/api/practice/record", post(api::practice_record))
        .route("/api/reset", post(api::reset))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
