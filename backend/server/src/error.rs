use std::path::PathBuf;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::debug;

use crate::search::SearchError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Search term missing or empty")]
    EmptySearchTerm,

    #[error("Method {0} not allowed")]
    MethodNotAllowed(String),

    #[error(transparent)]
    InvalidPattern(#[from] SearchError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        debug!("Rejected request: {self}");

        (StatusCode::BAD_REQUEST, Json(Vec::<()>::new())).into_response()
    }
}

/// Startup-time faults. Any of these stops the process before it binds.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be defined in environment")]
    MissingCredential(&'static str),

    #[error("Invalid {key} value: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("Failed to read dataset from {path}: {source}")]
    DatasetRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed dataset: {0}")]
    DatasetParse(#[from] serde_json::Error),
}
