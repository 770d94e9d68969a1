pub mod image;
pub mod plan;
pub mod store;

use actix_web::{error, web};
use crate::errors::AppError;

/// Registers every `/v1` route along with JSON and path error handling.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::BadRequest(err.to_string()))
    }))
    .app_data(web::PathConfig::default().error_handler(|_err, _req| {
        error::Error::from(AppError::BadRequest("Invalid store id".to_string()))
    }))
    .service(
        web::resource("/v1/plan")
            .route(web::post().to(plan::create_plan)),
    )
    .service(
        web::resource("/v1/motivation")
            .route(web::get().to(plan::get_motivation)),
    )
    .service(
        web::resource("/v1/image")
            .route(web::post().to(image::lookup)),
    )
    .service(
        web::resource("/v1/store")
            .route(web::post().to(store::create_store)),
    )
    .service(
        web::resource("/v1/store/{storeId}")
            .route(web::get().to(store::get_store)),
    )
    .service(
        web::resource("/v1/store/{storeId}/plan")
            .route(web::put().to(store::set_plan))
            .route(web::delete().to(store::clear_plan)),
    )
    .service(
        web::resource("/v1/store/{storeId}/user")
            .route(web::put().to(store::set_user)),
    )
    .service(
        web::resource("/v1/store/{storeId}/generate")
            .route(web::post().to(store::generate)),
    )
    .service(
        web::resource("/v1/store/{storeId}/dark-mode")
            .route(web::post().to(store::toggle_dark_mode)),
    );
}
