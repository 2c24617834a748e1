// SPDX-License-Identifier: MIT

//! Mock interview routes: question generation, answer evaluation, and
//! the feedback submission that drives the preparedness metric.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::InterviewFeedbackRecord;
use crate::services::gemini::{
    extract_payload, InterviewEvaluation, InterviewQuestion, InterviewQuestions,
};
use crate::AppState;
use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/interview/question", post(single_question))
        .route("/api/interview/questions", post(question_set))
        .route("/api/interview/feedback", post(submit_feedback))
}

/// Career for interview prompts: stored profile or "General".
async fn interview_career(state: &AppState, uid: &str) -> String {
    match state.db.get_user(uid).await {
        Ok(Some(user)) if !user.career.trim().is_empty() => user.career,
        Ok(_) => "General".to_string(),
        Err(e) => {
            tracing::warn!(uid, error = %e, "Profile read failed, using General track");
            "General".to_string()
        }
    }
}

// ─── Question Generation ─────────────────────────────────────

#[derive(Serialize)]
pub struct SingleQuestionResponse {
    pub career: String,
    pub question: String,
}

/// One interview question tailored to the user's career.
async fn single_question(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SingleQuestionResponse>> {
    let career = interview_career(&state, &user.uid).await;

    let prompt = format!(
        "Generate ONE challenging interview question for a {} role.\n\
         Return only the question text, no numbering, no preamble.",
        career
    );

    let question = state
        .ai
        .complete(&prompt)
        .await
        .map(|q| q.trim().to_string())
        .unwrap_or_else(|_| {
            format!("What is one important skill required for a {}?", career)
        });

    Ok(Json(SingleQuestionResponse { career, question }))
}

#[derive(Serialize)]
pub struct QuestionSetResponse {
    pub career: String,
    pub questions: Vec<InterviewQuestion>,
}

/// A full mock round: 3 technical questions plus 2 HR questions.
async fn question_set(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<QuestionSetResponse>> {
    let career = interview_career(&state, &user.uid).await;

    let prompt = format!(
        "You are an interviewer for a {career} position.\n\
         Generate 3 technical questions and 2 HR questions.\n\
         Return JSON only:\n\
         {{\"questions\": [{{\"type\": \"technical\", \"question\": \"...\"}}, \
         {{\"type\": \"hr\", \"question\": \"...\"}}]}}"
    );

    let questions = match state.ai.complete(&prompt).await {
        Ok(text) => extract_payload::<InterviewQuestions>(&text)
            .map(|qs| qs.questions)
            .unwrap_or_else(|_| {
                tracing::warn!(career, "Question response had no JSON, serving fallback set");
                fallback_questions(&career)
            }),
        Err(e) => {
            tracing::warn!(career, error = %e, "Question completion failed, serving fallback set");
            fallback_questions(&career)
        }
    };

    Ok(Json(QuestionSetResponse { career, questions }))
}

fn fallback_questions(career: &str) -> Vec<InterviewQuestion> {
    let technical = [
        format!("Explain a core concept every {} should know.", career),
        format!("Describe a typical day-to-day task for a {}.", career),
        format!("What tools do you use most as a {}?", career),
    ];
    let hr = [
        "Tell me about yourself.".to_string(),
        "Why do you want this role?".to_string(),
    ];

    technical
        .into_iter()
        .map(|question| InterviewQuestion {
            kind: "technical".to_string(),
            question,
        })
        .chain(hr.into_iter().map(|question| InterviewQuestion {
            kind: "hr".to_string(),
            question,
        }))
        .collect()
}

// ─── Feedback Submission ─────────────────────────────────────

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
}

#[derive(Serialize)]
pub struct FeedbackResponse {
    pub feedback: String,
    pub score: u32,
    pub preparedness: u32,
}

/// Evaluate one answered question and fold it into the preparedness
/// metric and the user's XP/progress aggregates.
async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>> {
    let question = req
        .question
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::BadRequest("question is required".to_string()))?;
    let answer = req
        .answer
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .ok_or_else(|| AppError::BadRequest("answer is required".to_string()))?;

    let career = interview_career(&state, &user.uid).await;
    let evaluation = evaluate_answer(&state, &career, &question, &answer).await;

    let record = InterviewFeedbackRecord {
        career: career.clone(),
        question,
        answer,
        feedback: evaluation.feedback.clone(),
        score: evaluation.score,
    };
    let preparedness = state.interview.record_feedback(&user.uid, record).await?;

    Ok(Json(FeedbackResponse {
        feedback: evaluation.feedback,
        score: evaluation.score,
        preparedness,
    }))
}

/// Score an answer with the model; fixed mid-range fallbacks keep the
/// pipeline moving when the model is down or returns no JSON.
async fn evaluate_answer(
    state: &AppState,
    career: &str,
    question: &str,
    answer: &str,
) -> InterviewEvaluation {
    let prompt = format!(
        "You are an interviewer for a {career} position.\n\
         Question: {question}\n\
         Candidate answer: {answer}\n\
         Evaluate the answer. Return JSON only:\n\
         {{\"feedback\": \"2-3 sentences of specific feedback\", \"score\": 0-100}}"
    );

    match state.ai.complete(&prompt).await {
        Ok(text) => extract_payload::<InterviewEvaluation>(&text)
            .map(|mut eval| {
                eval.score = eval.score.min(100);
                eval
            })
            .unwrap_or_else(|_| InterviewEvaluation {
                feedback: "AI could not parse feedback correctly.".to_string(),
                score: 60,
            }),
        Err(e) => {
            tracing::warn!(career, error = %e, "Evaluation completion failed, using default score");
            InterviewEvaluation {
                feedback: format!(
                    "Good effort! Try providing more details for {} interviews.",
                    career
                ),
                score: 65,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_questions_shape() {
        let questions = fallback_questions("DevOps Engineer");
        assert_eq!(questions.len(), 5);
        assert_eq!(
            questions.iter().filter(|q| q.kind == "technical").count(),
            3
        );
        assert_eq!(questions.iter().filter(|q| q.kind == "hr").count(), 2);
        assert!(questions[0].question.contains("DevOps Engineer"));
    }
}
