//! Error handlers
//!
//! Maps errors to HTTP responses. Safety-boundary failures never reveal
//! their cause to the client.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use log::{error, warn};

use crate::error::types::{AppError, StorageError};
use crate::html;

/// Log an application error at the level its category warrants
pub fn handle_error(err: &AppError) {
    match err {
        AppError::InvalidName(_) | AppError::PathEscape(_) => {
            warn!("Rejected file access: {}", err)
        }
        AppError::Storage(StorageError::NotFound(_)) => warn!("{}", err),
        _ => error!("File vault error: {}", err),
    }
}

/// Convert error to HTTP status code
pub fn error_to_status(err: &AppError) -> StatusCode {
    match err {
        AppError::InvalidName(_) => StatusCode::NOT_FOUND,
        AppError::PathEscape(_) => StatusCode::NOT_FOUND,
        AppError::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
        AppError::Storage(StorageError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        handle_error(&self);
        let status = error_to_status(&self);
        let body = match status {
            StatusCode::NOT_FOUND => html::pages::not_found(),
            _ => html::pages::error_page("Something went wrong while handling your request."),
        };
        (status, Html(body)).into_response()
    }
}
