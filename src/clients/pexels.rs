use log::debug;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use crate::config::PexelsConfig;
use crate::errors::UpstreamError;

const PEXELS_API_KEY_ENV: &str = "PEXELS_API_KEY";

/// Stock-photo search against the Pexels API.
#[derive(Clone)]
pub struct PexelsClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Deserialize)]
struct Photo {
    src: Option<PhotoSources>,
}

#[derive(Deserialize)]
struct PhotoSources {
    large: Option<String>,
}

impl PexelsClient {
    pub fn new(http: Client, config: &PexelsConfig) -> Self {
        PexelsClient {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Large-size URL of the first photo matching `query`, if any.
    pub async fn search_first(&self, query: &str) -> Result<Option<String>, UpstreamError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(UpstreamError::MissingCredentials(PEXELS_API_KEY_ENV))?;

        debug!("Searching Pexels for {:?}", query);

        let response = self
            .http
            .get(format!("{}/v1/search", self.base_url))
            .query(&[("query", query), ("per_page", "1")])
            .header(AUTHORIZATION, api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status: status.as_u16(), body });
        }

        let body: SearchResponse = response.json().await?;
        Ok(body
            .photos
            .into_iter()
            .next()
            .and_then(|photo| photo.src)
            .and_then(|src| src.large)
            .filter(|url| !url.is_empty()))
    }
}
