use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Errors returned to HTTP clients. Only bad client input ends up here;
/// upstream failures are absorbed by the fallbacks.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound(msg) => HttpResponse::NotFound().json(ErrorResponse { error: msg.clone() }),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(ErrorResponse { error: msg.clone() }),
            AppError::InternalServerError(msg) => HttpResponse::InternalServerError().json(ErrorResponse { error: msg.clone() }),
        }
    }
}

/// Failures talking to Gemini or Pexels. Never leaves the service layer.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{0} is missing in environment variables")]
    MissingCredentials(&'static str),
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),
    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("upstream returned no text")]
    EmptyResponse,
    #[error("invalid JSON in model output: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid plan structure: {0}")]
    InvalidPlan(String),
}

// Upstream URLs can carry credentials, so they are dropped before the error is logged.
impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        UpstreamError::Http(err.without_url())
    }
}
