// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile + gamification aggregates)
//! - Resource records and quiz attempt logs
//! - Interview feedback (append-only) and the preparedness metric
//!
//! The store contract the services rely on: `get` returns `Option`,
//! `update` is a shallow merge of named fields, and pushes insert with a
//! generated document ID. Every failure is surfaced as an error.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{
    InterviewFeedbackRecord, InterviewPreparedness, LastRoadmap, QuizAttempt, ResourceQuizAttempt,
    ResourceRecord, User,
};

/// Firestore database client.
#[derive(Clone)]
pub struct LearnDb {
    client: Option<firestore::FirestoreDb>,
}

impl LearnDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Parent path for a user's subcollections.
    fn user_path(&self, uid: &str) -> Result<firestore::ParentPathBuilder, AppError> {
        self.get_client()?
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by their derived uid.
    pub async fn get_user(&self, uid: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or fully overwrite a user document.
    pub async fn upsert_user(&self, uid: &str, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(uid)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Shallow-merge the gamification aggregates (xp, progress, quiz_score).
    pub async fn update_user_aggregates(&self, uid: &str, user: &User) -> Result<(), AppError> {
        self.update_user_fields(uid, user, firestore::paths!(User::{xp, progress, quiz_score}))
            .await
    }

    /// Shallow-merge only the overall progress field.
    pub async fn update_user_progress(&self, uid: &str, user: &User) -> Result<(), AppError> {
        self.update_user_fields(uid, user, firestore::paths!(User::progress))
            .await
    }

    /// Shallow-merge the profile fields (name, career, skill level).
    pub async fn update_user_profile(&self, uid: &str, user: &User) -> Result<(), AppError> {
        self.update_user_fields(uid, user, firestore::paths!(User::{name, career, skill_level}))
            .await
    }

    /// Shallow-merge only the password digest.
    pub async fn update_user_password(&self, uid: &str, user: &User) -> Result<(), AppError> {
        self.update_user_fields(uid, user, firestore::paths!(User::password))
            .await
    }

    async fn update_user_fields(
        &self,
        uid: &str,
        user: &User,
        fields: Vec<String>,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(fields)
            .in_col(collections::USERS)
            .document_id(uid)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Resource Operations ─────────────────────────────────────

    /// Get a single resource record by name.
    pub async fn get_resource(
        &self,
        uid: &str,
        name: &str,
    ) -> Result<Option<ResourceRecord>, AppError> {
        let parent = self.user_path(uid)?;
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::RESOURCES)
            .parent(&parent)
            .obj()
            .one(name)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or fully overwrite a resource record.
    pub async fn set_resource(&self, uid: &str, record: &ResourceRecord) -> Result<(), AppError> {
        let parent = self.user_path(uid)?;
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::RESOURCES)
            .document_id(&record.name)
            .parent(&parent)
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Shallow-merge a resource's progress and completion flag.
    pub async fn update_resource_progress(
        &self,
        uid: &str,
        record: &ResourceRecord,
    ) -> Result<(), AppError> {
        let parent = self.user_path(uid)?;
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(firestore::paths!(ResourceRecord::{progress, completed}))
            .in_col(collections::RESOURCES)
            .document_id(&record.name)
            .parent(&parent)
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List all resource records for a user.
    pub async fn list_resources(&self, uid: &str) -> Result<Vec<ResourceRecord>, AppError> {
        let parent = self.user_path(uid)?;
        self.get_client()?
            .fluent()
            .select()
            .from(collections::RESOURCES)
            .parent(&parent)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Append a quiz attempt to a resource's history (generated key).
    pub async fn push_resource_quiz(
        &self,
        uid: &str,
        resource_name: &str,
        attempt: &ResourceQuizAttempt,
    ) -> Result<(), AppError> {
        let parent = self
            .user_path(uid)?
            .at(collections::RESOURCES, resource_name)
            .map_err(|e| AppError::Database(e.to_string()))?;
        let _: ResourceQuizAttempt = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::QUIZZES)
            .generate_document_id()
            .parent(&parent)
            .object(attempt)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Append a career-track quiz attempt (generated key).
    pub async fn push_quiz_attempt(
        &self,
        uid: &str,
        attempt: &QuizAttempt,
    ) -> Result<(), AppError> {
        let parent = self.user_path(uid)?;
        let _: QuizAttempt = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::QUIZZES)
            .generate_document_id()
            .parent(&parent)
            .object(attempt)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Interview Operations ────────────────────────────────────

    /// Append an interview feedback record (generated key).
    ///
    /// The insert with a generated ID is atomic, so concurrent submissions
    /// never clobber each other's records.
    pub async fn push_interview_feedback(
        &self,
        uid: &str,
        record: &InterviewFeedbackRecord,
    ) -> Result<(), AppError> {
        let parent = self.user_path(uid)?;
        let _: InterviewFeedbackRecord = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::INTERVIEW_FEEDBACK)
            .generate_document_id()
            .parent(&parent)
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Fetch the full interview feedback history for a user.
    pub async fn list_interview_feedback(
        &self,
        uid: &str,
    ) -> Result<Vec<InterviewFeedbackRecord>, AppError> {
        let parent = self.user_path(uid)?;
        self.get_client()?
            .fluent()
            .select()
            .from(collections::INTERVIEW_FEEDBACK)
            .parent(&parent)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the preparedness metric, if any rounds were ever recorded.
    pub async fn get_interview_preparedness(
        &self,
        uid: &str,
    ) -> Result<Option<InterviewPreparedness>, AppError> {
        let parent = self.user_path(uid)?;
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::METRICS)
            .parent(&parent)
            .obj()
            .one(collections::INTERVIEW_PREPAREDNESS)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Overwrite the preparedness metric.
    pub async fn set_interview_preparedness(
        &self,
        uid: &str,
        metric: &InterviewPreparedness,
    ) -> Result<(), AppError> {
        let parent = self.user_path(uid)?;
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::METRICS)
            .document_id(collections::INTERVIEW_PREPAREDNESS)
            .parent(&parent)
            .object(metric)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Roadmap Metadata ────────────────────────────────────────

    /// Store the parameters of the most recently generated roadmap.
    pub async fn set_last_roadmap(
        &self,
        uid: &str,
        roadmap: &LastRoadmap,
    ) -> Result<(), AppError> {
        let parent = self.user_path(uid)?;
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::META)
            .document_id(collections::LAST_ROADMAP)
            .parent(&parent)
            .object(roadmap)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
