use crate::db::errors::DbError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Missing or malformed request input
    #[error("{message}")]
    BadRequest { message: String },

    /// PIN did not match any account allowed to log in
    #[error("{message}")]
    Unauthenticated { message: String },

    /// Addressed entity does not exist or is not in the required state
    #[error("{message}")]
    NotFound { message: String },

    /// No route matches the normalized path
    #[error("Endpoint not found: {route}")]
    RouteNotFound { route: String },

    /// The route exists but not for this method
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Duplicate resource
    #[error("{message}")]
    Conflict { message: String },

    /// Database operation error, reported with the underlying message
    #[error("{operation}: {source}")]
    Storage {
        operation: String,
        #[source]
        source: DbError,
    },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },
}

impl Error {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Error::BadRequest { message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound { message: message.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::NotFound { .. } | Error::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::Conflict { .. } => StatusCode::CONFLICT,
            Error::Storage { .. } | Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message placed in the `error` field of the response envelope
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Storage { source, .. } => {
                tracing::error!("Storage error: {} ({:?})", self, source);
            }
            Error::Internal { .. } => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Unauthenticated { .. } => {
                tracing::info!("Authentication error: {}", self);
            }
            Error::Conflict { .. } => {
                tracing::warn!("Conflict error: {}", self);
            }
            Error::BadRequest { .. } | Error::NotFound { .. } | Error::RouteNotFound { .. } | Error::MethodNotAllowed => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let body = json!({
            "success": false,
            "error": self.user_message(),
        });

        (self.status_code(), Json(body)).into_response()
    }
}

/// Attach the failed operation to a database error, turning it into [`Error::Storage`].
pub trait StorageContext<T> {
    fn storage_context(self, operation: &str) -> Result<T>;
}

impl<T, E: Into<DbError>> StorageContext<T> for std::result::Result<T, E> {
    fn storage_context(self, operation: &str) -> Result<T> {
        self.map_err(|e| Error::Storage {
            operation: operation.to_string(),
            source: e.into(),
        })
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
