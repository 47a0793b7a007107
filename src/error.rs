//! Error handling for the HTTP layer

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
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Pricing(PricingError::InvalidInput(_)) => {
                (StatusCode::BAD_REQUEST, "invalid_input")
            }
            AppError::Pricing(PricingError::EmptyInput) => (StatusCode::BAD_REQUEST, "empty_input"),
            AppError::Pricing(PricingError::RoomTypeNotFound(_)) => {
                (StatusCode::NOT_FOUND, "room_type_not_found")
            }
            AppError::Pricing(PricingError::HotelNotFound(_)) => {
                (StatusCode::NOT_FOUND, "hotel_not_found")
            }
            AppError::Pricing(PricingError::DivisionUndefined) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "division_undefined")
            }
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();

        let message = if status.is_server_error() {
            tracing::error!("{}: {}", error_type, self);
            "Internal error".to_string()
        } else {
            tracing::debug!("Rejected request: {}", self);
            self.to_string()
        };

        let details = match &self {
            AppError::Pricing(PricingError::RoomTypeNotFound(id))
            | AppError::Pricing(PricingError::HotelNotFound(id)) => {
                Some(serde_json::json!({ "id": id }))
            }
            _ => None,
        };

        let body = PricingErrorResponse {
            error_type: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::from(PricingError::InvalidInput("x".into())), StatusCode::BAD_REQUEST),
            (AppError::from(PricingError::EmptyInput), StatusCode::BAD_REQUEST),
            (AppError::from(PricingError::HotelNotFound(Uuid::nil())), StatusCode::NOT_FOUND),
            (AppError::from(PricingError::RoomTypeNotFound(Uuid::nil())), StatusCode::NOT_FOUND),
            (AppError::from(PricingError::DivisionUndefined), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
