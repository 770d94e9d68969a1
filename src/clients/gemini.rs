use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use crate::config::GeminiConfig;
use crate::errors::UpstreamError;

const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Text-generation client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(http: Client, config: &GeminiConfig) -> Self {
        GeminiClient {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one prompt and returns the text of the first candidate.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, UpstreamError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(UpstreamError::MissingCredentials(GEMINI_API_KEY_ENV))?;

        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        debug!("Sending {} byte prompt to Gemini model {}", prompt.len(), self.model);

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&GenerateRequest {
                contents: [Content { parts: [Part { text: prompt }] }],
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status: status.as_u16(), body });
        }

        let body: GenerateResponse = response.json().await?;
        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(UpstreamError::EmptyResponse);
        }
        Ok(text)
    }
}
