mod api;
mod auth;
mod error;
mod pages;

pub use api::{create_submission, healthz, record_action, submission_status};
pub use auth::CurrentActor;
pub use error::{notice, AppError};
pub use pages::{
    my_submissions, resubmit_submission, review_dashboard, review_submission, submission_detail,
};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/review-dashboard", get(review_dashboard))
        .route("/my-submissions", get(my_submissions))
        .route("/submission/:submission_id", get(submission_detail))
        .route("/submission/:submission_id/review", post(review_submission))
        .route("/submission/:submission_id/resubmit", post(resubmit_submission))
        .route("/api/submissions", post(create_submission))
        .route("/api/submissions/:submission_id/status", get(submission_status))
        .route("/api/submissions/:submission_id/actions", post(record_action))
        .route("/healthz", get(healthz))
        .nest_service("/static", tower_http::services::ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
