// SPDX-License-Identifier: MIT

//! Overall-progress aggregation.
//!
//! `User.progress` is the mean of all per-resource progress values,
//! recomputed in full from the current snapshot on every resource event.
//! The recompute is fire-and-forget: it must never fail the user action
//! (starting or completing a resource) that triggered it.

use crate::db::LearnDb;
use crate::error::AppError;
use crate::services::{round1, user_lock, AggregateLocks};

/// Mean of resource progress values, rounded to one decimal place.
///
/// An empty slice yields exactly 0, never an unset value.
pub fn overall_progress(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: i64 = values.iter().sum();
    round1(sum as f64 / values.len() as f64)
}

/// Recomputes `User.progress` from the resource records in the store.
#[derive(Clone)]
pub struct ProgressAggregator {
    db: LearnDb,
    locks: AggregateLocks,
}

impl ProgressAggregator {
    pub fn new(db: LearnDb, locks: AggregateLocks) -> Self {
        Self { db, locks }
    }

    /// Recompute and store the user's overall progress.
    ///
    /// No-op for an empty uid. Store failures are logged and swallowed;
    /// on failure nothing is written and the aggregate stays stale.
    pub async fn recompute_overall_progress(&self, uid: &str) {
        if uid.is_empty() {
            return;
        }

        let lock = user_lock(&self.locks, uid);
        let _guard = lock.lock().await;

        if let Err(e) = self.recompute(uid).await {
            tracing::warn!(uid, error = %e, "Overall progress recompute failed, aggregate left stale");
        }
    }

    async fn recompute(&self, uid: &str) -> Result<(), AppError> {
        let records = self.db.list_resources(uid).await?;
        let values: Vec<i64> = records.iter().map(|r| r.progress).collect();
        let overall = overall_progress(&values);

        let mut user = self
            .db
            .get_user(uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {}", uid)))?;
        user.progress = overall;

        self.db.update_user_progress(uid, &user).await?;
        tracing::debug!(uid, overall, resources = values.len(), "Overall progress updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_progress_is_mean() {
        assert_eq!(overall_progress(&[40, 100, 70]), 70.0);
    }

    #[test]
    fn test_overall_progress_empty_is_zero() {
        assert_eq!(overall_progress(&[]), 0.0);
    }

    #[test]
    fn test_overall_progress_rounds_one_decimal() {
        // 100 / 3 = 33.333... -> 33.3
        assert_eq!(overall_progress(&[33, 33, 34]), 33.3);
        // 1.5 stays representable at one decimal
        assert_eq!(overall_progress(&[1, 2]), 1.5);
    }

    #[test]
    fn test_overall_progress_half_rounds_away_from_zero() {
        // 40.25 -> 40.3 with half-away-from-zero
        assert_eq!(overall_progress(&[40, 40, 40, 41]), 40.3);
    }

    #[test]
    fn test_overall_progress_single_record() {
        assert_eq!(overall_progress(&[40]), 40.0);
    }
}
