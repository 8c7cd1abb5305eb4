//! API response model for the service information endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ClockMate API is running!")]
    pub message: String,
    #[schema(example = "1.0.0")]
    pub version: String,
    /// Server local time
    #[schema(example = "2025-03-04 08:00:00")]
    pub timestamp: String,
    /// Server UTC offset
    #[schema(example = "+01:00")]
    pub timezone: String,
}
