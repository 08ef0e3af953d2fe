//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Pricing(e) => {
                tracing::warn!("Pricing error: {}", e);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    PricingErrorResponse {
                        error_type: e.error_type().to_string(),
                        message: e.to_string(),
                        details: None,
                    },
                )
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                PricingErrorResponse {
                    error_type: "bad_request".to_string(),
                    message: msg.clone(),
                    details: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
