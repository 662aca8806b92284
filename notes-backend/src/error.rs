//! Error types for note storage and the HTTP handlers.

use std::path::PathBuf;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use notes_types::ErrorResponse;
use thiserror::Error;

/// Storage-level failures. The service never retries these.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("cannot create database directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything a notes handler can answer with besides success.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Note not found")]
    NotFound,

    #[error("title is required")]
    TitleRequired,

    /// Declared as JSON but not parseable as a note payload
    #[error("invalid JSON body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::TitleRequired | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Store(e) => {
                log::error!("Note storage failure: {}", e);
                HttpResponse::InternalServerError().json(ErrorResponse::new("Internal server error"))
            }
            _ => HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string())),
        }
    }
}
