use actix_web::{web, HttpResponse};
use serde::Serialize;
use crate::clients::gemini::GeminiClient;
use crate::errors::AppError;
use crate::models::profile::UserProfile;
use crate::services::motivation::generate_motivation_quote;
use crate::services::plan::generate_fitness_plan;
use crate::utils::validation::validate_payload;

#[derive(Serialize)]
struct MotivationResponse {
    quote: String,
}

// POST /v1/plan
pub async fn create_plan(
    gemini: web::Data<GeminiClient>,
    profile: web::Json<UserProfile>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*profile)?;

    let plan = generate_fitness_plan(&gemini, &profile).await;
    Ok(HttpResponse::Ok().json(plan))
}

// GET /v1/motivation
pub async fn get_motivation(gemini: web::Data<GeminiClient>) -> HttpResponse {
    let quote = generate_motivation_quote(&gemini).await;
    HttpResponse::Ok().json(MotivationResponse { quote })
}
