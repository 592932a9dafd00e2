// API errors and their HTTP mapping
use crate::domain::timewindow::{InvalidDirection, ParseModeError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("widget '{0}' is not initialized")]
    UnknownWidget(String),

    #[error(transparent)]
    InvalidMode(#[from] ParseModeError),

    #[error(transparent)]
    InvalidDirection(#[from] InvalidDirection),

    #[error("no timewindow has been applied yet")]
    NoTimewindow,

    #[error("widget state is unavailable")]
    StatePoisoned,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownWidget(_) | ApiError::NoTimewindow => StatusCode::NOT_FOUND,
            ApiError::InvalidMode(_) | ApiError::InvalidDirection(_) => StatusCode::BAD_REQUEST,
            ApiError::StatePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
