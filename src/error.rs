use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};
use serde_json::json;
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP Error: {0}")]
    HttpError(String),
    #[error("File processing error: {0}")]
    FileProcessingError(String),
    #[error("DataFrame error: {0}")]
    DataFrameError(String),
    #[error("Render error: {0}")]
    RenderError(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<polars::prelude::PolarsError> for AppError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        AppError::DataFrameError(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::RenderError(err.to_string())
    }
}

impl AppError {
    /// Load failures come from the upstream spreadsheet, everything else is ours.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::HttpError(_) => StatusCode::BAD_GATEWAY,
            AppError::FileProcessingError(_) => StatusCode::BAD_GATEWAY,
            AppError::DataFrameError(_)
            | AppError::RenderError(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
