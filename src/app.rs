use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/index.html", get(handlers::index))
        .route("/styles.css", get(handlers::styles))
        .route("/app.js", get(handlers::app_js))
        .route("/manifest.webmanifest", get(handlers::manifest))
        .route("/icons/icon-192.svg", get(handlers::icon_192))
        .route("/icons/icon-512.svg", get(handlers::icon_512))
        .route("/toggle", post(handlers::toggle))
        .route("/tasks", post(handlers::add_task))
        .route("/notify", post(handlers::notify))
        .route("/view-mode", post(handlers::toggle_view_mode))
        .route("/api/grid", get(handlers::get_grid))
        .route("/api/toggle", post(handlers::api_toggle))
        .route("/api/tasks", post(handlers::api_add_task))
        .with_state(state)
}
