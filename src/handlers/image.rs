use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;
use crate::clients::pexels::PexelsClient;
use crate::errors::AppError;
use crate::services::image::{lookup_image, ImageKind};
use crate::utils::validation::{validate_not_blank, validate_payload};

#[derive(Deserialize, Validate)]
pub struct ImageRequest {
    #[validate(length(min = 1, max = 200, message = "Prompt must be between 1 and 200 characters"))]
    #[validate(custom = "validate_not_blank")]
    prompt: String,

    #[serde(rename = "type")]
    kind: ImageKind,
}

// POST /v1/image
pub async fn lookup(
    pexels: web::Data<PexelsClient>,
    payload: web::Json<ImageRequest>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*payload)?;

    let response = lookup_image(&pexels, payload.prompt.trim(), payload.kind).await;
    Ok(HttpResponse::Ok().json(response))
}
