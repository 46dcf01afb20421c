//! Axum route handlers for registration, login and the current session.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::users::{find_by_email, find_by_id, insert_user};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

pub const MIN_PASSWORD_LEN: usize = 6;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_registration(req: &RegisterRequest) -> Result<(), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    let email = req.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    validate_registration(&req)?;

    let email = normalize_email(&req.email);
    let password_hash = hash_password(req.password).await?;
    let row = insert_user(&state.db, req.name.trim(), &email, &password_hash).await?;
    let token = state.tokens.issue(row.id)?;

    info!("Registered user {}", row.id);
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: row.into(),
        }),
    ))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let email = normalize_email(&req.email);
    let Some(row) = find_by_email(&state.db, &email).await? else {
        warn!("Login attempt for unknown email");
        return Err(AppError::Unauthorized);
    };
    if !verify_password(req.password, row.password_hash.clone()).await? {
        warn!("Failed login for user {}", row.id);
        return Err(AppError::Unauthorized);
    }

    let token = state.tokens.issue(row.id)?;
    info!("User {} logged in", row.id);
    Ok(Json(AuthResponse {
        token,
        user: row.into(),
    }))
}

/// GET /api/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<User>, AppError> {
    let row = find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(row.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(validate_registration(&request("Ada", "ada@example.com", "secret1")).is_ok());
    }

    #[test]
    fn test_registration_requires_name() {
        let err = validate_registration(&request("  ", "ada@example.com", "secret1")).unwrap_err();
        assert!(err.to_string().contains("Name"));
    }

    #[test]
    fn test_registration_requires_email_shape() {
        assert!(validate_registration(&request("Ada", "ada.example.com", "secret1")).is_err());
        assert!(validate_registration(&request("Ada", "", "secret1")).is_err());
    }

    #[test]
    fn test_registration_password_length() {
        assert!(validate_registration(&request("Ada", "ada@example.com", "12345")).is_err());
        assert!(validate_registration(&request("Ada", "ada@example.com", "123456")).is_ok());
    }

    #[test]
    fn test_email_normalized() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
