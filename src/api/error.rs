use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::core::ValidationError;
use crate::report::RenderError;
use crate::store::StoreError;

use super::error_response;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    BadRequest(String),
    #[error("Scenario not found")]
    NotFound,
    #[error("{0}")]
    Persistence(String),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Persistence(_) | Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(_) => Self::NotFound,
            StoreError::Persistence(msg) => Self::Persistence(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            return error_response(status, INTERNAL_ERROR_MESSAGE);
        }
        tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        error_response(status, &self.to_string())
    }
}
