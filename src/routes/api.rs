// SPDX-License-Identifier: MIT

//! Profile and dashboard routes for authenticated users.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::services::gamification::classify_badge;
use crate::services::round1;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Fallback motivational tip when the AI collaborator is unavailable.
const DEFAULT_TIP: &str = "Keep learning and challenging yourself daily!";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/profile", put(update_profile))
}

// ─── Dashboard ───────────────────────────────────────────────

/// Dashboard response: profile plus the derived gamification state.
#[derive(Serialize)]
pub struct DashboardResponse {
    pub name: String,
    pub career: String,
    pub skill_level: String,
    pub xp: u32,
    pub progress: f64,
    pub quiz_score: u32,
    pub badge: String,
    pub message: String,
    pub ai_tip: String,
    /// Percentage of resource records fully completed (progress == 100)
    pub resources_completed: f64,
    pub interview_preparedness: u32,
}

/// Get the current user's dashboard.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardResponse>> {
    let profile = state
        .db
        .get_user(&user.uid)
        .await?
        .ok_or_else(|| crate::error::AppError::NotFound(format!("User {} not found", user.uid)))?;

    let badge = classify_badge(profile.xp);

    // AI tip is cosmetic; any failure falls back to the fixed message
    let tip_prompt = format!(
        "Write one motivational sentence for a {} student with {} XP points.",
        if profile.career.is_empty() {
            "General"
        } else {
            &profile.career
        },
        profile.xp
    );
    let ai_tip = state
        .ai
        .complete(&tip_prompt)
        .await
        .unwrap_or_else(|_| DEFAULT_TIP.to_string());

    // Share of resources at 100%, as a percentage
    let resources_completed = match state.db.list_resources(&user.uid).await {
        Ok(records) if !records.is_empty() => {
            let completed = records.iter().filter(|r| r.progress == 100).count();
            round1(completed as f64 / records.len() as f64 * 100.0)
        }
        Ok(_) => 0.0,
        Err(e) => {
            tracing::warn!(uid = %user.uid, error = %e, "Resource completion fetch failed");
            0.0
        }
    };

    let interview_preparedness = match state.db.get_interview_preparedness(&user.uid).await {
        Ok(metric) => metric.map(|m| m.score).unwrap_or(0),
        Err(e) => {
            tracing::warn!(uid = %user.uid, error = %e, "Preparedness fetch failed");
            0
        }
    };

    Ok(Json(DashboardResponse {
        name: profile.name,
        career: profile.career,
        skill_level: profile.skill_level,
        xp: profile.xp,
        progress: profile.progress,
        quiz_score: profile.quiz_score,
        badge: badge.tier.to_string(),
        message: badge.message.to_string(),
        ai_tip,
        resources_completed,
        interview_preparedness,
    }))
}

// ─── Profile ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub career: Option<String>,
    pub skill: Option<String>,
}

#[derive(Serialize)]
pub struct ProfileUpdateResponse {
    pub ok: bool,
    pub name: String,
    pub career: String,
    pub skill_level: String,
}

/// Update profile fields (onboarding and profile edits).
///
/// Only the provided fields are merged; omitted fields keep their value.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ProfileUpdateRequest>,
) -> Result<Json<ProfileUpdateResponse>> {
    let mut profile = state
        .db
        .get_user(&user.uid)
        .await?
        .ok_or_else(|| crate::error::AppError::NotFound(format!("User {} not found", user.uid)))?;

    if let Some(name) = req.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
        profile.name = name;
    }
    if let Some(career) = req.career.map(|c| c.trim().to_string()) {
        profile.career = career;
    }
    if let Some(skill) = req.skill.map(|s| s.trim().to_string()) {
        profile.skill_level = skill;
    }

    state.db.update_user_profile(&user.uid, &profile).await?;

    tracing::info!(uid = %user.uid, career = %profile.career, "Profile updated");

    Ok(Json(ProfileUpdateResponse {
        ok: true,
        name: profile.name,
        career: profile.career,
        skill_level: profile.skill_level,
    }))
}
