// SPDX-License-Identifier: MIT

//! Request validation tests.
//!
//! Each of these requests is rejected by the handler's own validation,
//! before any store or AI call happens, so the offline mocks never matter.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

/// POST a JSON body to a protected route with a valid token.
async fn post_json(uri: &str, body: serde_json::Value) -> StatusCode {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("abc123def456", &state.config.jwt_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    response.status()
}

/// POST a JSON body to a public route.
async fn post_json_public(uri: &str, body: serde_json::Value) -> StatusCode {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    response.status()
}

#[tokio::test]
async fn test_signup_rejects_invalid_email() {
    let status = post_json_public(
        "/auth/signup",
        serde_json::json!({
            "name": "Alice",
            "email": "not-an-email",
            "password": "secret1"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let status = post_json_public(
        "/auth/signup",
        serde_json::json!({
            "name": "Alice",
            "email": "alice@example.com",
            "password": "abc"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_rejects_empty_fields() {
    let status = post_json_public(
        "/auth/login",
        serde_json::json!({ "email": "", "password": "" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_forgot_password_rejects_empty_email() {
    let status =
        post_json_public("/auth/forgot-password", serde_json::json!({ "email": " " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resource_start_requires_title() {
    let status = post_json("/api/resources/start", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resource_start_rejects_blank_title() {
    let status = post_json("/api/resources/start", serde_json::json!({ "title": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resource_complete_requires_title() {
    let status = post_json("/api/resources/complete", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resource_quiz_requires_resource_id() {
    let status = post_json("/api/resources/quiz", serde_json::json!({ "score": 80 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resource_quiz_score_not_range_checked() {
    // Score range is the producer's responsibility; an out-of-range value
    // passes validation (the offline store then fails it, but not as 400)
    let status = post_json(
        "/api/resources/quiz",
        serde_json::json!({ "resource_id": "docker", "score": 101 }),
    )
    .await;
    assert_ne!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quiz_submit_score_not_range_checked() {
    let status = post_json("/api/quiz/submit", serde_json::json!({ "score": 9999 })).await;
    assert_ne!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_requires_prompt() {
    let status = post_json("/api/chat", serde_json::json!({ "prompt": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resume_analyze_requires_text() {
    let status = post_json("/api/resume/analyze", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_interview_feedback_requires_answer() {
    let status = post_json(
        "/api/interview/feedback",
        serde_json::json!({ "question": "Tell me about yourself." }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_interview_feedback_requires_question() {
    let status = post_json(
        "/api/interview/feedback",
        serde_json::json!({ "answer": "I am a developer." }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
