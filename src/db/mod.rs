//! Database layer (Firestore).

pub mod firestore;

pub use firestore::LearnDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Per-user resource records (subcollection of a user document)
    pub const RESOURCES: &str = "resources";
    /// Append-only quiz attempt logs (under a user or a resource)
    pub const QUIZZES: &str = "quizzes";
    /// Append-only interview feedback (subcollection of a user document)
    pub const INTERVIEW_FEEDBACK: &str = "interview_feedback";
    /// Per-user scalar metrics, keyed by metric name
    pub const METRICS: &str = "metrics";
    /// Miscellaneous per-user documents (last roadmap parameters)
    pub const META: &str = "meta";

    /// Document ID of the preparedness metric within `METRICS`.
    pub const INTERVIEW_PREPAREDNESS: &str = "interview_preparedness";
    /// Document ID of the last-roadmap record within `META`.
    pub const LAST_ROADMAP: &str = "last_roadmap";
}
