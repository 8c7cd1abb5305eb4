//! Response envelope and CSV attachments.

use crate::errors::Error;
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// Body of every JSON response: `{success, data}` or `{success, error}`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error envelope, for documentation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    /// Always false
    pub success: bool,
    pub error: String,
}

/// `{"message": ...}` payload of operations that only report an outcome
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Successful response: the status code plus the payload wrapped in an [`Envelope`].
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    status: StatusCode,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { status: StatusCode::OK, data }
    }

    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let envelope = Envelope {
            success: true,
            data: Some(self.data),
            error: None,
        };
        (self.status, Json(envelope)).into_response()
    }
}

/// A CSV document served as a file download.
#[derive(Debug, Clone)]
pub struct CsvAttachment {
    pub filename: String,
    pub body: String,
}

impl IntoResponse for CsvAttachment {
    fn into_response(self) -> Response {
        let disposition = match HeaderValue::from_str(&format!("attachment; filename=\"{}\"", self.filename)) {
            Ok(value) => value,
            Err(e) => {
                return Error::Internal {
                    operation: format!("build Content-Disposition header: {e}"),
                }
                .into_response();
            }
        };

        (
            [
                (header::CONTENT_TYPE, HeaderValue::from_static("text/csv")),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.body,
        )
            .into_response()
    }
}
