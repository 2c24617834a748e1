//! Mock-interview feedback records and the preparedness aggregate.

use serde::{Deserialize, Serialize};

/// One interview round, stored append-only under
/// `users/{uid}/interview_feedback` with a generated document ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewFeedbackRecord {
    /// Career track at the time of the answer
    pub career: String,
    pub question: String,
    pub answer: String,
    pub feedback: String,
    /// Score 0-100 as produced by the evaluator (not clamped here)
    pub score: u32,
}

/// Rolling preparedness metric, stored at
/// `users/{uid}/metrics/interview_preparedness`.
///
/// Recomputed in full from the feedback history on every new round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewPreparedness {
    /// Rounded mean of all feedback scores
    pub score: u32,
    /// Last update timestamp (ISO 8601)
    pub updated_at: String,
}
