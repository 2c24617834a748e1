// SPDX-License-Identifier: MIT

//! Gemini API client for text completions.
//!
//! The rest of the crate treats the model as an opaque, possibly-failing
//! `complete(prompt) -> text` function. Responses that should carry JSON
//! are parsed with [`extract_json`], which tolerates surrounding prose and
//! returns a structured-absence error every consumer handles with a typed
//! default. No call is retried; each request hits the API exactly once.

use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Gemini REST client.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a new client. An empty API key leaves the client
    /// unconfigured; every completion then fails and callers serve their
    /// fallback payloads.
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key,
            model,
        }
    }

    /// Create an unconfigured client for testing (offline mode).
    pub fn new_mock() -> Self {
        Self::new(String::new(), "gemini-2.5-flash".to_string())
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Send a prompt and return the model's text.
    pub async fn complete(&self, prompt: &str) -> Result<String, AppError> {
        if !self.is_configured() {
            return Err(AppError::AiApi("Gemini API key not configured".to_string()));
        }

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::AiApi(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            // Quota exhaustion is the common failure mode for this API
            if status.as_u16() == 429 {
                tracing::warn!("Gemini rate limit hit (429)");
                return Err(AppError::AiApi("rate_limited".to_string()));
            }

            return Err(AppError::AiApi(format!("HTTP {}: {}", status, body)));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::AiApi(format!("JSON parse error: {}", e)))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::AiApi("empty completion".to_string()))
    }
}

/// `generateContent` response body (only the fields we read).
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// The completion text contained no extractable JSON object.
#[derive(Debug, thiserror::Error)]
#[error("no JSON object found in completion text")]
pub struct ExtractionFailed;

/// Extract the single JSON object embedded in free-form model output.
///
/// Scans from the first `{` to the last `}`, which tolerates code fences
/// and surrounding prose the model likes to add.
pub fn extract_json(text: &str) -> Result<serde_json::Value, ExtractionFailed> {
    let start = text.find('{').ok_or(ExtractionFailed)?;
    let end = text.rfind('}').ok_or(ExtractionFailed)?;
    if end < start {
        return Err(ExtractionFailed);
    }
    serde_json::from_str(&text[start..=end]).map_err(|_| ExtractionFailed)
}

/// Extract and deserialize the embedded JSON object into a typed payload.
pub fn extract_payload<T: DeserializeOwned>(text: &str) -> Result<T, ExtractionFailed> {
    let value = extract_json(text)?;
    serde_json::from_value(value).map_err(|_| ExtractionFailed)
}

// ─── Typed AI payloads ───────────────────────────────────────────

/// 8-week learning roadmap.
#[derive(Debug, Clone, Default, serde::Serialize, Deserialize)]
pub struct Roadmap {
    #[serde(default)]
    pub roadmap: Vec<RoadmapWeek>,
}

#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct RoadmapWeek {
    pub week: String,
    pub topics: String,
}

/// Multiple-choice quiz.
#[derive(Debug, Clone, Default, serde::Serialize, Deserialize)]
pub struct Quiz {
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// Set of mock-interview questions.
#[derive(Debug, Clone, Default, serde::Serialize, Deserialize)]
pub struct InterviewQuestions {
    #[serde(default)]
    pub questions: Vec<InterviewQuestion>,
}

#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct InterviewQuestion {
    /// "Technical" or "HR"
    #[serde(rename = "type")]
    pub kind: String,
    pub question: String,
}

/// Evaluation of one interview answer.
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct InterviewEvaluation {
    pub feedback: String,
    pub score: u32,
}

/// Resume review payload.
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct ResumeReview {
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub ats: u32,
    pub suggestions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_plain_object() {
        let value = extract_json(r#"{"quiz": []}"#).unwrap();
        assert!(value.get("quiz").is_some());
    }

    #[test]
    fn test_extract_json_surrounded_by_prose() {
        let text = "Sure! Here is your quiz:\n```json\n{\"quiz\": [{\"question\": \"Q?\", \"options\": [\"A\"], \"answer\": \"A\"}]}\n```\nGood luck!";
        let quiz: Quiz = extract_payload(text).unwrap();
        assert_eq!(quiz.quiz.len(), 1);
        assert_eq!(quiz.quiz[0].answer, "A");
    }

    #[test]
    fn test_extract_json_nested_braces() {
        let text = "prefix {\"outer\": {\"inner\": 1}} suffix";
        let value = extract_json(text).unwrap();
        assert_eq!(value["outer"]["inner"], 1);
    }

    #[test]
    fn test_extract_json_no_object() {
        assert!(extract_json("just a plain sentence").is_err());
    }

    #[test]
    fn test_extract_json_unbalanced() {
        assert!(extract_json("} backwards {").is_err());
    }

    #[test]
    fn test_extract_payload_wrong_shape() {
        let result: Result<InterviewEvaluation, _> = extract_payload(r#"{"feedback": 42}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unconfigured_client() {
        let client = GeminiClient::new_mock();
        assert!(!client.is_configured());
    }
}
