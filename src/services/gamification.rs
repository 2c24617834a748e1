// SPDX-License-Identifier: MIT

//! XP awards and badge classification.
//!
//! Awards are background side effects of a user action (completing a
//! resource, submitting a quiz): store failures are logged and swallowed
//! so the triggering action still succeeds, leaving the aggregate stale
//! rather than failing the request.

use crate::db::LearnDb;
use crate::error::AppError;
use crate::models::User;
use crate::services::{user_lock, AggregateLocks};

/// XP awarded for marking a resource complete.
pub const RESOURCE_COMPLETION_XP: u32 = 150;
/// XP per point of a career-track quiz score.
pub const QUIZ_XP_PER_POINT: u32 = 10;
/// Divisor applied to a resource quiz score for its XP award.
pub const RESOURCE_QUIZ_XP_DIVISOR: u32 = 2;

/// Badge tier derived purely from XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Badge {
    pub tier: &'static str,
    pub message: &'static str,
}

/// Classify a user's XP into a badge tier.
///
/// Boundaries are inclusive-lower/exclusive-upper; a value exactly at a
/// boundary belongs to the higher tier (1000 XP is already Silver).
pub fn classify_badge(xp: u32) -> Badge {
    if xp < 1000 {
        Badge {
            tier: "Bronze Learner",
            message: "Keep going — you're off to a great start!",
        }
    } else if xp < 2000 {
        Badge {
            tier: "Silver Coder",
            message: "Nice work! You're leveling up fast!",
        }
    } else if xp < 3500 {
        Badge {
            tier: "Gold Achiever",
            message: "Excellent consistency — you're becoming a pro!",
        }
    } else {
        Badge {
            tier: "Diamond Master",
            message: "Outstanding! You're at the top of your learning journey!",
        }
    }
}

/// XP for a career-track quiz score.
pub fn quiz_xp(score: u32) -> u32 {
    score * QUIZ_XP_PER_POINT
}

/// XP for a per-resource quiz score (floor of half the score).
pub fn resource_quiz_xp(score: u32) -> u32 {
    score / RESOURCE_QUIZ_XP_DIVISOR
}

/// Apply one award's deltas to the user aggregate.
///
/// Nothing here inspects prior state (no completed-resource check, no
/// per-resource dedup), so repeated awards stack.
pub fn apply_xp_award(user: &mut User, amount: u32, quiz_score: Option<u32>) {
    user.xp += amount;
    if let Some(score) = quiz_score {
        user.quiz_score = score;
    }
}

/// XP awarding engine backed by the store.
#[derive(Clone)]
pub struct GamificationEngine {
    db: LearnDb,
    locks: AggregateLocks,
}

impl GamificationEngine {
    pub fn new(db: LearnDb, locks: AggregateLocks) -> Self {
        Self { db, locks }
    }

    /// Award the fixed XP for completing a resource.
    ///
    /// Not idempotent: marking the same resource complete twice awards the
    /// XP twice. The completion state is intentionally not checked first.
    ///
    /// Returns the new XP total, or `None` if the award was dropped.
    pub async fn award_resource_completion_xp(&self, uid: &str) -> Option<u32> {
        self.award(uid, RESOURCE_COMPLETION_XP, None).await
    }

    /// Award quiz XP and overwrite the last quiz score (latest wins).
    pub async fn award_quiz_xp(&self, uid: &str, score: u32) -> Option<u32> {
        self.award(uid, quiz_xp(score), Some(score)).await
    }

    /// Award XP for a per-resource quiz attempt.
    pub async fn award_resource_quiz_xp(&self, uid: &str, score: u32) -> Option<u32> {
        self.award(uid, resource_quiz_xp(score), Some(score)).await
    }

    /// Read-modify-write XP (and optionally the last quiz score) under the
    /// per-user lock. Failures are logged and swallowed.
    async fn award(&self, uid: &str, amount: u32, quiz_score: Option<u32>) -> Option<u32> {
        if uid.is_empty() {
            return None;
        }

        let lock = user_lock(&self.locks, uid);
        let _guard = lock.lock().await;

        match self.apply_award(uid, amount, quiz_score).await {
            Ok(new_xp) => {
                tracing::info!(uid, amount, new_xp, "XP awarded");
                Some(new_xp)
            }
            Err(e) => {
                tracing::warn!(uid, amount, error = %e, "XP award dropped, aggregate left stale");
                None
            }
        }
    }

    async fn apply_award(
        &self,
        uid: &str,
        amount: u32,
        quiz_score: Option<u32>,
    ) -> Result<u32, AppError> {
        let mut user = self
            .db
            .get_user(uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {}", uid)))?;

        apply_xp_award(&mut user, amount, quiz_score);

        self.db.update_user_aggregates(uid, &user).await?;
        Ok(user.xp)
    }
}
