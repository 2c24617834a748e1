// SPDX-License-Identifier: MIT

//! Interview scoring pipeline.
//!
//! Persists each interview round, recomputes the rolling preparedness
//! average over the full history, and converts the round's score into XP
//! and progress deltas on the user aggregate. Unlike the background
//! awards, failures here surface to the HTTP layer: the pipeline is the
//! direct response to a user-initiated request.

use crate::db::LearnDb;
use crate::error::AppError;
use crate::models::{InterviewFeedbackRecord, InterviewPreparedness, User};
use crate::services::{round1, user_lock, AggregateLocks};

/// XP for one interview round: floor(score * 1.5).
pub fn interview_xp_gain(score: u32) -> u32 {
    score * 3 / 2
}

/// Progress for one interview round: round(score / 50, 1).
pub fn interview_progress_gain(score: u32) -> f64 {
    round1(score as f64 / 50.0)
}

/// Rounded mean of all feedback scores; 0 for an empty history.
pub fn preparedness(scores: &[u32]) -> u32 {
    if scores.is_empty() {
        return 0;
    }
    let sum: u32 = scores.iter().sum();
    (sum as f64 / scores.len() as f64).round() as u32
}

/// Apply one round's deltas to the user aggregate.
///
/// Progress is clamped at 100; XP has no upper bound. The score also
/// overwrites the last-score field (latest wins).
pub fn apply_interview_result(user: &mut User, score: u32) {
    user.xp += interview_xp_gain(score);
    user.progress = (user.progress + interview_progress_gain(score)).min(100.0);
    user.quiz_score = score;
}

/// Persists interview rounds and maintains the preparedness metric.
#[derive(Clone)]
pub struct InterviewPipeline {
    db: LearnDb,
    locks: AggregateLocks,
}

impl InterviewPipeline {
    pub fn new(db: LearnDb, locks: AggregateLocks) -> Self {
        Self { db, locks }
    }

    /// Record one interview round and update the derived aggregates.
    ///
    /// Returns the recomputed preparedness metric. Any store failure is
    /// surfaced to the caller as an error.
    pub async fn record_feedback(
        &self,
        uid: &str,
        record: InterviewFeedbackRecord,
    ) -> Result<u32, AppError> {
        let lock = user_lock(&self.locks, uid);
        let _guard = lock.lock().await;

        let score = record.score;
        self.db.push_interview_feedback(uid, &record).await?;

        // Full-history recompute, O(n) in past rounds
        let history = self.db.list_interview_feedback(uid).await?;
        let scores: Vec<u32> = history.iter().map(|r| r.score).collect();
        let average = preparedness(&scores);

        let metric = InterviewPreparedness {
            score: average,
            updated_at: chrono::Utc::now().to_rfc3339(),
        };
        self.db.set_interview_preparedness(uid, &metric).await?;

        let mut user = self
            .db
            .get_user(uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {}", uid)))?;
        apply_interview_result(&mut user, score);
        self.db.update_user_aggregates(uid, &user).await?;

        tracing::info!(
            uid,
            score,
            preparedness = average,
            xp = user.xp,
            progress = user.progress,
            "Interview round recorded"
        );

        Ok(average)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(xp: u32, progress: f64) -> User {
        let mut user = User::new(
            "Test".to_string(),
            "test@example.com".to_string(),
            "digest".to_string(),
            "2024-01-15T12:00:00Z".to_string(),
        );
        user.xp = xp;
        user.progress = progress;
        user
    }

    #[test]
    fn test_xp_gain_floors() {
        assert_eq!(interview_xp_gain(90), 135);
        assert_eq!(interview_xp_gain(85), 127); // 127.5 floored
        assert_eq!(interview_xp_gain(0), 0);
    }

    #[test]
    fn test_progress_gain() {
        assert_eq!(interview_progress_gain(80), 1.6);
        assert_eq!(interview_progress_gain(100), 2.0);
        assert_eq!(interview_progress_gain(0), 0.0);
    }

    #[test]
    fn test_preparedness_mean() {
        assert_eq!(preparedness(&[60, 80, 100]), 80);
    }

    #[test]
    fn test_preparedness_rounds() {
        // 70.5 rounds away from zero -> 71
        assert_eq!(preparedness(&[70, 71]), 71);
        assert_eq!(preparedness(&[]), 0);
    }

    #[test]
    fn test_progress_clamped_at_100() {
        let mut user = test_user(0, 99.0);

        apply_interview_result(&mut user, 100);
        assert_eq!(user.progress, 100.0);

        // Stays pinned on every subsequent round
        apply_interview_result(&mut user, 100);
        assert_eq!(user.progress, 100.0);
    }

    #[test]
    fn test_xp_unbounded() {
        let mut user = test_user(0, 100.0);
        for _ in 0..5 {
            apply_interview_result(&mut user, 100);
        }
        assert_eq!(user.xp, 5 * 150);
        assert_eq!(user.progress, 100.0);
    }

    #[test]
    fn test_score_overwrites_last_score() {
        let mut user = test_user(0, 0.0);
        apply_interview_result(&mut user, 90);
        apply_interview_result(&mut user, 40);
        assert_eq!(user.quiz_score, 40);
    }
}
