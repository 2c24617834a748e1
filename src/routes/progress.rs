// SPDX-License-Identifier: MIT

//! Resource progress tracking and quiz submission routes.
//!
//! These are the write paths that feed the gamification aggregates: the
//! handler persists the primary record, then triggers the background XP
//! award and/or overall-progress recompute.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{QuizAttempt, ResourceQuizAttempt, ResourceRecord};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/resources", get(list_resources))
        .route("/api/resources/start", post(start_resource))
        .route("/api/resources/complete", post(complete_resource))
        .route("/api/resources/quiz", post(submit_resource_quiz))
        .route(
            "/api/resources/progress",
            get(get_resource_progress).post(update_resource_progress),
        )
        .route("/api/quiz/submit", post(submit_quiz))
}

// ─── Resource Listing ────────────────────────────────────────

#[derive(Serialize)]
pub struct ResourceListResponse {
    pub resources: Vec<ResourceRecord>,
}

async fn list_resources(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ResourceListResponse>> {
    let resources = state.db.list_resources(&user.uid).await?;
    Ok(Json(ResourceListResponse { resources }))
}

// ─── Start / Complete ────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResourceActionRequest {
    pub title: Option<String>,
    pub progress: Option<i64>,
}

#[derive(Serialize)]
pub struct ResourceActionResponse {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_xp: Option<u32>,
}

/// Mark a resource as started at an initial progress (default 40).
async fn start_resource(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ResourceActionRequest>,
) -> Result<Json<ResourceActionResponse>> {
    let title = required_title(req.title)?;
    let progress = req.progress.unwrap_or(40).clamp(0, 100);

    let record = ResourceRecord::started(title.clone(), progress, chrono::Utc::now().timestamp());
    state.db.set_resource(&user.uid, &record).await?;

    state.progress.recompute_overall_progress(&user.uid).await;

    Ok(Json(ResourceActionResponse {
        ok: true,
        message: format!("Started {}", title),
        new_xp: None,
    }))
}

/// Mark a resource complete and award the completion XP.
///
/// Completing a resource that was never started creates its record.
/// Repeated completions re-award the XP; see the gamification engine.
async fn complete_resource(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ResourceActionRequest>,
) -> Result<Json<ResourceActionResponse>> {
    let title = required_title(req.title)?;
    let progress = req.progress.unwrap_or(100).clamp(0, 100);

    let mut record = match state.db.get_resource(&user.uid, &title).await? {
        Some(existing) => existing,
        None => ResourceRecord::started(title.clone(), 0, chrono::Utc::now().timestamp()),
    };
    record.progress = progress;
    record.completed = true;
    state.db.set_resource(&user.uid, &record).await?;

    state.progress.recompute_overall_progress(&user.uid).await;
    let new_xp = state.gamification.award_resource_completion_xp(&user.uid).await;

    Ok(Json(ResourceActionResponse {
        ok: true,
        message: format!("Completed {}", title),
        new_xp,
    }))
}

fn required_title(title: Option<String>) -> Result<String> {
    title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("title is required".to_string()))
}

// ─── Resource Progress ───────────────────────────────────────

#[derive(Deserialize)]
pub struct ResourceProgressRequest {
    pub resource_id: Option<String>,
    pub progress: i64,
}

#[derive(Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// All saved resource progress for the user, keyed by resource name.
async fn get_resource_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<HashMap<String, ResourceRecord>>> {
    let records = state.db.list_resources(&user.uid).await?;
    let map = records.into_iter().map(|r| (r.name.clone(), r)).collect();
    Ok(Json(map))
}

/// Update one resource's progress percentage without touching the
/// overall-progress aggregate; the next start/complete recomputes it.
async fn update_resource_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ResourceProgressRequest>,
) -> Result<Json<OkResponse>> {
    let name = required_resource_id(req.resource_id)?;
    let progress = req.progress.clamp(0, 100);

    let mut record = state
        .db
        .get_resource(&user.uid, &name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resource {} not found", name)))?;
    record.progress = progress;
    state.db.update_resource_progress(&user.uid, &record).await?;

    Ok(Json(OkResponse { ok: true }))
}

fn required_resource_id(id: Option<String>) -> Result<String> {
    id.map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest("resource_id is required".to_string()))
}

// ─── Quiz Submission ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResourceQuizRequest {
    pub resource_id: Option<String>,
    pub score: u32,
}

#[derive(Serialize)]
pub struct QuizSubmitResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_xp: Option<u32>,
}

/// Record a per-resource quiz attempt and award half the score as XP.
///
/// The score range is the quiz producer's responsibility; nothing here
/// rejects out-of-range values.
async fn submit_resource_quiz(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ResourceQuizRequest>,
) -> Result<Json<QuizSubmitResponse>> {
    let name = required_resource_id(req.resource_id)?;

    let attempt = ResourceQuizAttempt {
        score: req.score,
        timestamp: chrono::Utc::now().timestamp(),
    };
    state.db.push_resource_quiz(&user.uid, &name, &attempt).await?;

    let new_xp = state
        .gamification
        .award_resource_quiz_xp(&user.uid, req.score)
        .await;

    Ok(Json(QuizSubmitResponse { ok: true, new_xp }))
}

#[derive(Deserialize)]
pub struct QuizSubmitRequest {
    pub score: u32,
    pub stream: Option<String>,
}

/// Record a career-track quiz attempt and award score * 10 XP.
/// The score range is not checked here either.
async fn submit_quiz(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<QuizSubmitRequest>,
) -> Result<Json<QuizSubmitResponse>> {
    let attempt = QuizAttempt {
        score: req.score,
        stream: req.stream.unwrap_or_default(),
        timestamp: chrono::Utc::now().timestamp(),
    };
    state.db.push_quiz_attempt(&user.uid, &attempt).await?;

    let new_xp = state.gamification.award_quiz_xp(&user.uid, req.score).await;

    Ok(Json(QuizSubmitResponse { ok: true, new_xp }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_title() {
        assert!(required_title(None).is_err());
        assert!(required_title(Some("  ".to_string())).is_err());
        assert_eq!(required_title(Some(" Rust ".to_string())).unwrap(), "Rust");
    }

    #[test]
    fn test_required_resource_id() {
        assert!(required_resource_id(None).is_err());
        assert_eq!(
            required_resource_id(Some("docker-basics".to_string())).unwrap(),
            "docker-basics"
        );
    }
}
