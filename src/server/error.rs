use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{ IntoResponse, Response };
use axum::Json;
use thiserror::Error;

use crate::agent::ChatError;
use crate::models::api::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error("Failed to fetch history")]
    HistoryUnavailable,
    #[error("Failed to save message")]
    SaveFailed,
    #[error("Too many requests")]
    RateLimited,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Chat(_) => StatusCode::BAD_REQUEST,
            ApiError::HistoryUnavailable | ApiError::SaveFailed => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}
