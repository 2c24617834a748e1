// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod gamification;
pub mod gemini;
pub mod interview;
pub mod progress;

pub use gamification::GamificationEngine;
pub use gemini::GeminiClient;
pub use interview::InterviewPipeline;
pub use progress::ProgressAggregator;

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Per-user locks serializing aggregate read-modify-write cycles.
///
/// Firestore offers no atomic increment in this design, so every aggregate
/// update is a plain read-then-write. Within one server instance these
/// locks prevent two concurrent events for the same user from losing an
/// update; cross-instance races remain accepted eventual consistency for
/// these engagement counters.
pub type AggregateLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

pub fn new_aggregate_locks() -> AggregateLocks {
    Arc::new(DashMap::new())
}

/// Get (or create) the lock for one user.
pub(crate) fn user_lock(locks: &AggregateLocks, uid: &str) -> Arc<Mutex<()>> {
    locks
        .entry(uid.to_string())
        .or_insert_with(|| Arc::new(Mutex::new(())))
        .clone()
}

/// Round to one decimal place (half away from zero).
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
