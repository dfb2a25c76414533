pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::auth;
use crate::resume::handlers::{
    delete_resume, download_resume, upload_resume, MAX_UPLOAD_BODY_BYTES,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Resume lifecycle, all behind the identity gate
        .route("/api/resume/upload", post(upload_resume))
        .route("/api/resume/delete", delete(delete_resume))
        .route("/api/resume", get(download_resume))
        .layer(from_fn_with_state(state.clone(), auth::authenticate))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES))
        // Probes stay open
        .route("/health", get(health::health_handler))
        .with_state(state)
}
