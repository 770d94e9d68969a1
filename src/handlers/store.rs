use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::clients::gemini::GeminiClient;
use crate::errors::AppError;
use crate::models::plan::FitnessPlan;
use crate::models::profile::UserProfile;
use crate::models::store::StoreSnapshot;
use crate::services::store::{generate_for, FitnessStore};
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreRequest {
    prefers_dark: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoreResponse {
    store_id: Uuid,
    #[serde(flatten)]
    snapshot: StoreSnapshot,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DarkModeResponse {
    dark_mode: bool,
}

fn store_response(store_id: Uuid, snapshot: StoreSnapshot) -> HttpResponse {
    HttpResponse::Ok().json(StoreResponse { store_id, snapshot })
}

// POST /v1/store
pub async fn create_store(
    store: web::Data<FitnessStore>,
    payload: Option<web::Json<CreateStoreRequest>>,
) -> HttpResponse {
    let request = payload.map(web::Json::into_inner).unwrap_or_default();
    let (store_id, snapshot) = store.create(request.prefers_dark);
    HttpResponse::Created().json(StoreResponse { store_id, snapshot })
}

// GET /v1/store/:storeId
pub async fn get_store(
    store: web::Data<FitnessStore>,
    store_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let snapshot = store.get(*store_id)?;
    Ok(store_response(*store_id, snapshot))
}

// PUT /v1/store/:storeId/plan
pub async fn set_plan(
    store: web::Data<FitnessStore>,
    store_id: web::Path<Uuid>,
    plan: web::Json<FitnessPlan>,
) -> Result<HttpResponse, AppError> {
    let snapshot = store.set_fitness_plan(*store_id, plan.into_inner())?;
    Ok(store_response(*store_id, snapshot))
}

// DELETE /v1/store/:storeId/plan
pub async fn clear_plan(
    store: web::Data<FitnessStore>,
    store_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let snapshot = store.clear_plan(*store_id)?;
    Ok(store_response(*store_id, snapshot))
}

// PUT /v1/store/:storeId/user
pub async fn set_user(
    store: web::Data<FitnessStore>,
    store_id: web::Path<Uuid>,
    profile: web::Json<UserProfile>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*profile)?;

    let snapshot = store.set_user_data(*store_id, profile.into_inner())?;
    Ok(store_response(*store_id, snapshot))
}

// POST /v1/store/:storeId/generate
pub async fn generate(
    store: web::Data<FitnessStore>,
    gemini: web::Data<GeminiClient>,
    store_id: web::Path<Uuid>,
    profile: web::Json<UserProfile>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*profile)?;

    let snapshot = generate_for(&store, &gemini, *store_id, profile.into_inner()).await?;
    Ok(store_response(*store_id, snapshot))
}

// POST /v1/store/:storeId/dark-mode
pub async fn toggle_dark_mode(
    store: web::Data<FitnessStore>,
    store_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let dark_mode = store.toggle_dark_mode(*store_id)?;
    Ok(HttpResponse::Ok().json(DarkModeResponse { dark_mode }))
}
