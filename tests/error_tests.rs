// SPDX-License-Identifier: MIT

//! Error-to-response mapping tests.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use codepath_api::error::AppError;

async fn response_parts(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn test_unauthorized_maps_to_401() {
    let (status, body) = response_parts(AppError::Unauthorized).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_not_found_carries_details() {
    let (status, body) = response_parts(AppError::NotFound("User abc".to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["details"], "User abc");
}

#[tokio::test]
async fn test_bad_request_carries_details() {
    let (status, body) = response_parts(AppError::BadRequest("title is required".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "title is required");
}

#[tokio::test]
async fn test_ai_error_hides_upstream_detail() {
    let (status, body) = response_parts(AppError::AiApi("HTTP 500: boom".to_string())).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "ai_error");
    // Upstream message stays in the logs, never in the response
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_database_error_hides_detail() {
    let (status, body) = response_parts(AppError::Database("connection refused".to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "database_error");
    assert!(body.get("details").is_none());
}
