use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use volara_booking::BookingError;
use volara_core::{SearchError, StoreError};

#[derive(Debug)]
pub enum ApiError {
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Anyhow(err.into())
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidInput(_) | SearchError::UnknownPlace(_) => {
                Self::ValidationError(err.to_string())
            }
            SearchError::Store(inner) => Self::Anyhow(inner.into()),
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotFound(_) => Self::NotFoundError(err.to_string()),
            BookingError::InvalidTransition { .. } => Self::ConflictError(err.to_string()),
            BookingError::FlightNotFound(_)
            | BookingError::CabinNotOffered { .. }
            | BookingError::InvalidInput(_) => Self::ValidationError(err.to_string()),
            BookingError::Store(inner) => Self::Anyhow(inner.into()),
        }
    }
}
