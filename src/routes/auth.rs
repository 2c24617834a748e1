// SPDX-License-Identifier: MIT

//! Signup, login, and password-reset routes.

use axum::{extract::State, routing::get, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::models::User;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/logout", get(logout))
}

/// Derive the stable user key from an email address.
///
/// SHA-256 of the lowercased, trimmed email, truncated to 28 hex chars:
/// short enough for a document ID, long enough to never collide in
/// practice.
pub fn uid_from_email(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let digest = Sha256::digest(normalized.as_bytes());
    hex::encode(digest)[..28].to_string()
}

/// SHA-256 hex digest of a password.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Generate a temporary password for the reset flow.
///
/// Derived from the uid and the current time, so it differs per request.
fn temp_password(uid: &str) -> String {
    let now = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let digest = Sha256::digest(format!("{}:{}", uid, now).as_bytes());
    format!("Cp-{}", &hex::encode(digest)[..8])
}

// ─── Signup ──────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub uid: String,
    pub name: String,
}

/// Sign up a new user with all aggregate fields zeroed.
async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<SessionResponse>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let email = req.email.trim().to_lowercase();
    let uid = uid_from_email(&email);

    if state.db.get_user(&uid).await?.is_some() {
        return Err(AppError::BadRequest("email already registered".to_string()));
    }

    let user = User::new(
        req.name.trim().to_string(),
        email,
        hash_password(&req.password),
        chrono::Utc::now().to_rfc3339(),
    );
    state.db.upsert_user(&uid, &user).await?;

    tracing::info!(uid, "New user registered");

    let token = create_jwt(&uid, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    Ok(Json(SessionResponse {
        token,
        uid,
        name: user.name,
    }))
}

// ─── Login ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Log in by matching the stored password digest.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "email and password are required".to_string(),
        ));
    }

    let uid = uid_from_email(&req.email);

    // Same error for unknown user and wrong password
    let user = state
        .db
        .get_user(&uid)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if user.password != hash_password(&req.password) {
        return Err(AppError::Unauthorized);
    }

    let token = create_jwt(&uid, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    tracing::info!(uid, "User logged in");

    Ok(Json(SessionResponse {
        token,
        uid,
        name: user.name,
    }))
}

// ─── Password Reset ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct ForgotPasswordResponse {
    pub temporary_password: String,
}

/// Reset a forgotten password to a generated temporary one.
async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>> {
    if req.email.trim().is_empty() {
        return Err(AppError::BadRequest("email is required".to_string()));
    }

    let uid = uid_from_email(&req.email);
    let mut user = state
        .db
        .get_user(&uid)
        .await?
        .ok_or_else(|| AppError::NotFound("email not registered".to_string()))?;

    let temporary = temp_password(&uid);
    user.password = hash_password(&temporary);
    state.db.update_user_password(&uid, &user).await?;

    tracing::info!(uid, "Temporary password issued");

    Ok(Json(ForgotPasswordResponse {
        temporary_password: temporary,
    }))
}

/// Logout - the client clears its token; nothing to do server-side.
async fn logout() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uid_is_deterministic_and_normalized() {
        let a = uid_from_email("Alice@Example.com ");
        let b = uid_from_email("alice@example.com");
        assert_eq!(a, b);
        assert_eq!(a.len(), 28);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_uid_differs_per_email() {
        assert_ne!(
            uid_from_email("alice@example.com"),
            uid_from_email("bob@example.com")
        );
    }

    #[test]
    fn test_hash_password_is_sha256_hex() {
        let digest = hash_password("secret1");
        assert_eq!(digest.len(), 64);
        assert_ne!(digest, hash_password("secret2"));
    }

    #[test]
    fn test_temp_password_shape() {
        let uid = uid_from_email("alice@example.com");
        let pw = temp_password(&uid);
        assert!(pw.starts_with("Cp-"));
        assert_eq!(pw.len(), 11);
    }

    #[test]
    fn test_signup_request_validation() {
        let bad_email = SignupRequest {
            name: "Alice".to_string(),
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = SignupRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "abc".to_string(),
        };
        assert!(short_password.validate().is_err());

        let ok = SignupRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(ok.validate().is_ok());
    }
}
