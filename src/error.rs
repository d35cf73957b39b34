//! Application error type shared by every layer.
//!
//! Repository and service code return [`AppError`]; the HTTP layer turns it
//! into a JSON body of the form `{"error": "<message>"}`. Driver errors are
//! logged where they happen and never reach the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Errors produced while shortening, resolving or managing URLs.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or malformed input.
    #[error("{message}")]
    Validation { message: String },

    /// The requested custom alias (or code) is already taken.
    #[error("custom alias '{alias}' already exists")]
    AliasConflict { alias: String },

    /// A generated code is already used by a different URL.
    #[error("short code '{code}' is already used by another URL")]
    CodeCollision { code: String },

    /// The request clashes with a stored record in some other way.
    #[error("{message}")]
    Conflict { message: String },

    /// No record matches the code.
    #[error("URL not found")]
    NotFound { code: String },

    /// The record exists but its expiry condition is met.
    #[error("URL has expired")]
    Expired { code: String },

    /// The durable store failed.
    #[error("{message}")]
    Persistence { message: String },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn alias_conflict(alias: impl Into<String>) -> Self {
        Self::AliasConflict {
            alias: alias.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    pub fn expired(code: impl Into<String>) -> Self {
        Self::Expired { code: code.into() }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::AliasConflict { .. }
            | AppError::CodeCollision { .. }
            | AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::NotFound { .. } | AppError::Expired { .. } => StatusCode::NOT_FOUND,
            AppError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to API clients.
    pub fn public_message(&self) -> String {
        match self {
            AppError::NotFound { .. } | AppError::Expired { .. } => "URL not found".to_string(),
            AppError::Persistence { .. } => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.public_message(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .into_iter()
            .find_map(|(field, errs)| {
                errs.first().map(|e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .unwrap_or_else(|| "Invalid request".to_string());

        AppError::bad_request(message)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

/// Maps a driver error to an [`AppError`].
///
/// Unique violations become a generic [`AppError::Conflict`]; constraint
/// names stay in the logs. Callers that know which value clashed, such as
/// the repository insert, map the violation themselves.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        tracing::debug!(constraint = ?db.constraint(), "unique constraint violation");
        return AppError::conflict("Resource already exists");
    }

    tracing::error!(error = %e, "database error");
    AppError::persistence("Database error")
}
