use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::resumes::autosave::AutosaveScheduler;
use crate::resumes::photo::PhotoStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub tokens: TokenIssuer,
    /// S3 in production, in-memory in tests.
    pub photos: Arc<dyn PhotoStore>,
    pub autosave: AutosaveScheduler,
}
