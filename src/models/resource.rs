//! Learning-resource progress records.

use serde::{Deserialize, Serialize};

/// Per-resource progress, stored at `users/{uid}/resources/{name}`.
///
/// `completed == true` implies `progress == 100`; the reverse is not
/// enforced, so a resource can sit at 100 without being marked complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Resource/skill name (also used as document ID)
    pub name: String,
    /// Completion percentage (0-100)
    pub progress: i64,
    /// Whether the resource was explicitly marked complete
    #[serde(default)]
    pub completed: bool,
    /// When the resource was started (Unix seconds)
    pub timestamp: i64,
}

impl ResourceRecord {
    pub fn started(name: String, progress: i64, now: i64) -> Self {
        Self {
            name,
            progress,
            completed: false,
            timestamp: now,
        }
    }
}

/// Quiz attempt attached to a single resource (append-only history).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceQuizAttempt {
    pub score: u32,
    pub timestamp: i64,
}

/// Career-track quiz attempt (append-only history).
///
/// History only; the `User.quiz_score` aggregate is latest-write-wins and
/// never derived from this log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub score: u32,
    pub stream: String,
    pub timestamp: i64,
}

/// Parameters of the most recently generated roadmap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastRoadmap {
    pub career_path: String,
    pub skill_level: String,
}
