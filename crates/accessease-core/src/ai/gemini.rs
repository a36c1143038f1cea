use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GatewayError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-pro";

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

/// Non-text parts (`inlineData`, `functionCall`) deserialize with no text.
#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GeminiResponse {
    /// `candidates[0].content.parts[0].text`, if present.
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Requests never time out unless one is set here.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, GatewayError> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// One `generateContent` call; returns the first candidate's first text part.
    pub async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        debug!(model = %self.model, prompt_chars = prompt.chars().count(), "sending generateContent");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status, body });
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|_| GatewayError::MalformedResponse)?;

        gemini_response
            .first_text()
            .ok_or(GatewayError::MalformedResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: "hello" }],
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, serde_json::json!({"contents": [{"parts": [{"text": "hello"}]}]}));
    }

    fn first_text(body: serde_json::Value) -> Option<String> {
        serde_json::from_value::<GeminiResponse>(body).ok()?.first_text()
    }

    #[test]
    fn test_response_tolerates_non_text_parts() {
        let body = serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "First."}, {"inlineData": {"mimeType": "image/png", "data": ""}}]}},
                {"content": {"parts": [{"functionCall": {"name": "lookup", "args": {}}}]}}
            ]
        });
        assert_eq!(first_text(body).as_deref(), Some("First."));

        let body = serde_json::json!({"candidates": [{"content": {"parts": [{"inlineData": {}}]}}]});
        assert_eq!(first_text(body), None);
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new("k")
            .with_base_url("http://localhost:8080/")
            .with_model("gemini-1.5-flash");
        assert_eq!(
            client.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
