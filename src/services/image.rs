use log::{info, warn};
use serde::{Deserialize, Serialize};
use crate::clients::pexels::PexelsClient;

pub const PLACEHOLDER_IMAGE_URL: &str = "https://picsum.photos/800/600";

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Exercise,
    Meal,
}

impl ImageKind {
    /// Search query with keywords that steer the photo search.
    pub fn search_query(&self, prompt: &str) -> String {
        match self {
            ImageKind::Exercise => format!("{} workout gym fitness", prompt),
            ImageKind::Meal => format!("{} food meal dish", prompt),
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageLookupResponse {
    /// Always true, even when the placeholder is returned.
    pub success: bool,
    pub image_url: String,
    pub prompt: String,
    pub model: String,
}

pub async fn lookup_image(pexels: &PexelsClient, prompt: &str, kind: ImageKind) -> ImageLookupResponse {
    let (image_url, model) = match pexels.search_first(&kind.search_query(prompt)).await {
        Ok(Some(url)) => {
            info!("Found {:?} image for {:?}", kind, prompt);
            (url, "pexels")
        }
        Ok(None) => {
            info!("No {:?} image for {:?}, using placeholder", kind, prompt);
            (PLACEHOLDER_IMAGE_URL.to_string(), "pexels")
        }
        Err(err) => {
            warn!("Image fetch failed: {}", err);
            (PLACEHOLDER_IMAGE_URL.to_string(), "fallback")
        }
    };

    ImageLookupResponse {
        success: true,
        image_url,
        prompt: prompt.to_string(),
        model: model.to_string(),
    }
}
