pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::auth::handlers as auth;
use crate::errors::AppError;
use crate::render::handlers as render;
use crate::resumes::handlers as resumes;
use crate::resumes::photo::MAX_REQUEST_BYTES;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/health", get(health::health_handler))
        // Accounts
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/me", get(auth::handle_me))
        // Resumes
        .route(
            "/api/resumes",
            get(resumes::handle_list).post(resumes::handle_create),
        )
        .route(
            "/api/resumes/:id",
            get(resumes::handle_get)
                .put(resumes::handle_update)
                .delete(resumes::handle_delete),
        )
        .route(
            "/api/resumes/:id/sections/:section",
            put(resumes::handle_replace_section),
        )
        .route("/api/resumes/:id/draft", put(resumes::handle_save_draft))
        .route("/api/resumes/:id/photo", post(resumes::handle_upload_photo))
        .route(
            "/api/resumes/:id/preview",
            get(resumes::handle_preview_stored),
        )
        // Templates and live preview
        .route("/api/templates", get(render::handle_list_templates))
        .route("/api/templates/:id", get(render::handle_get_template))
        .route("/api/preview", post(render::handle_preview))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .with_state(state)
}
