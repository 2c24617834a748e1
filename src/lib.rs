// SPDX-License-Identifier: MIT

//! CodePath: learning-platform backend API.
//!
//! This crate provides the backend for tracking learner progress, awarding
//! XP and badges, and proxying prompts to a generative AI model for
//! roadmaps, quizzes, interview practice, and resource recommendations.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::LearnDb;
use services::{GamificationEngine, GeminiClient, InterviewPipeline, ProgressAggregator};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: LearnDb,
    pub ai: GeminiClient,
    pub progress: ProgressAggregator,
    pub gamification: GamificationEngine,
    pub interview: InterviewPipeline,
}
