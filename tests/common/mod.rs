// SPDX-License-Identifier: MIT

use codepath_api::config::Config;
use codepath_api::db::LearnDb;
use codepath_api::routes::create_router;
use codepath_api::services::{
    new_aggregate_locks, GamificationEngine, GeminiClient, InterviewPipeline, ProgressAggregator,
};
use codepath_api::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> LearnDb {
    LearnDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> LearnDb {
    LearnDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();
    let ai = GeminiClient::new_mock();

    let locks = new_aggregate_locks();
    let progress = ProgressAggregator::new(db.clone(), locks.clone());
    let gamification = GamificationEngine::new(db.clone(), locks.clone());
    let interview = InterviewPipeline::new(db.clone(), locks);

    let state = Arc::new(AppState {
        config,
        db,
        ai,
        progress,
        gamification,
        interview,
    });

    (create_router(state.clone()), state)
}

/// Create a test JWT for the given uid, signed with the test key.
#[allow(dead_code)]
pub fn create_test_jwt(uid: &str, signing_key: &[u8]) -> String {
    codepath_api::middleware::auth::create_jwt(uid, signing_key).unwrap()
}
