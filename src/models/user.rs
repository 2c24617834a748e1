//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
///
/// The document ID is a stable key derived from the user's email
/// (see `routes::auth::uid_from_email`). The numeric fields are
/// gamification aggregates recomputed from event records; they are not a
/// primary source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Display name
    pub name: String,
    /// Email address (lowercased, trimmed)
    pub email: String,
    /// SHA-256 hex digest of the password
    pub password: String,
    /// Chosen career track (empty until onboarding)
    #[serde(default)]
    pub career: String,
    /// Self-reported skill level (empty until onboarding)
    #[serde(default)]
    pub skill_level: String,
    /// Accumulated XP (monotonically non-decreasing)
    #[serde(default)]
    pub xp: u32,
    /// Overall completion percentage (0-100, one decimal)
    #[serde(default)]
    pub progress: f64,
    /// Most recent quiz or interview score
    #[serde(default)]
    pub quiz_score: u32,
    /// When the account was created (ISO 8601)
    pub created_at: String,
}

impl User {
    /// Create a new user with all aggregate fields zeroed.
    pub fn new(name: String, email: String, password_digest: String, created_at: String) -> Self {
        Self {
            name,
            email,
            password: password_digest,
            career: String::new(),
            skill_level: String::new(),
            xp: 0,
            progress: 0.0,
            quiz_score: 0,
            created_at,
        }
    }
}
