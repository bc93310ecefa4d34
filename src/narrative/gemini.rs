//! Gemini `generateContent` client.

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AppError, EXIT_CONFIG};
use crate::narrative::{NarrativeError, NarrativeService};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Reads `GEMINI_API_KEY` and an optional `GEMINI_MODEL`.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| AppError::new(EXIT_CONFIG, "Missing GEMINI_API_KEY in environment (.env)."))?;
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Self {
            client: Client::new(),
            api_key,
            model,
        })
    }

    fn url(&self) -> String {
        format!("{BASE_URL}/{}:generateContent", self.model)
    }
}

impl NarrativeService for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, NarrativeError> {
        info!(model = %self.model, prompt_chars = prompt.len(), "requesting narrative");
        let resp = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&GenerateRequest::new(prompt))
            .send()
            .map_err(|e| NarrativeError::Service(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(NarrativeError::Quota);
        }
        if !status.is_success() {
            return Err(NarrativeError::Service(format!("status {status}")));
        }

        let body: GenerateResponse = resp
            .json()
            .map_err(|e| NarrativeError::Service(format!("invalid response: {e}")))?;
        body.text().ok_or(NarrativeError::EmptyResponse)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(GenerateRequest::new("hello")).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn response_text_joins_first_candidate_parts() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Liquidity "},{"text":"is rising."}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(body.text().as_deref(), Some("Liquidity is rising."));

        let empty: GenerateResponse = serde_json::from_str(r#"{"promptFeedback":{}}"#).unwrap();
        assert_eq!(empty.text(), None);
    }
}
