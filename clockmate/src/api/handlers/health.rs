use crate::{
    api::{models::health::HealthResponse, response::ApiResponse},
    timestamps,
};

pub const HEALTH_MESSAGE: &str = "ClockMate API is running!";

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    summary = "Service information",
    description = "Also served at `/test` and `/index.php`.",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn health() -> ApiResponse<HealthResponse> {
    ApiResponse::ok(HealthResponse {
        message: HEALTH_MESSAGE.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: timestamps::format(&timestamps::now()),
        timezone: timestamps::utc_offset(),
    })
}
