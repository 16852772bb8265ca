//! Route definitions for the dashboard.

use crate::auth;
use crate::handlers;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Create the dashboard router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        // Session
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/logout", post(auth::logout))
        // Owner pages
        .route("/dashboard", get(handlers::dashboard))
        .route("/jobs", get(handlers::jobs_list).post(handlers::job_create))
        .route("/jobs/new", get(handlers::job_new))
        .route("/jobs/{id}", get(handlers::job_detail))
        .route(
            "/jobs/{id}/assign",
            get(handlers::job_assign_page).post(handlers::job_assign_submit),
        )
        .route("/users", get(handlers::users_list).post(handlers::user_create))
        .route("/users/new", get(handlers::user_new))
        .route("/users/{id}/delete", post(handlers::user_delete))
        .route("/reports", get(handlers::reports))
        // Worker pages
        .route("/worker/tasks", get(handlers::worker_tasks))
        .route(
            "/worker/tasks/{transaction_id}/complete",
            post(handlers::task_complete),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth::form_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
