// SPDX-License-Identifier: MIT

//! CodePath API Server
//!
//! Tracks learner progress through careers, resources, quizzes, and mock
//! interviews, with XP/badge gamification backed by Firestore and the
//! Gemini text model.

use codepath_api::{
    config::Config,
    db::LearnDb,
    services::{
        new_aggregate_locks, GamificationEngine, GeminiClient, InterviewPipeline,
        ProgressAggregator,
    },
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting CodePath API");

    // Initialize Firestore database
    let db = LearnDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize Gemini client
    let ai = GeminiClient::new(config.gemini_api_key.clone(), config.gemini_model.clone());
    tracing::info!(model = %config.gemini_model, "Gemini client initialized");

    // Per-user locks shared by every aggregate writer within this instance
    let aggregate_locks = new_aggregate_locks();

    let progress = ProgressAggregator::new(db.clone(), aggregate_locks.clone());
    let gamification = GamificationEngine::new(db.clone(), aggregate_locks.clone());
    let interview = InterviewPipeline::new(db.clone(), aggregate_locks);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        ai,
        progress,
        gamification,
        interview,
    });

    // Build router
    let app = codepath_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("codepath_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
