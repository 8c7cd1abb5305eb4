//! OpenAPI document for the HTTP API, printed by `clockmate --openapi`.
//!
//! Paths are listed without a prefix. Every route is also reachable under any leading
//! combination of the configured `route_prefixes`, e.g. `/clockmate/api/index.php/clock/event`.

use utoipa::OpenApi;

use crate::api::{handlers, models, response};
use crate::types::{ClockEventType, Role};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ClockMate API",
        description = "Time and attendance backend. Every JSON response is wrapped in an envelope: \
            `{\"success\": true, \"data\": ...}` on success, `{\"success\": false, \"error\": \"...\"}` otherwise.",
    ),
    servers(
        (url = "/", description = "Unprefixed routes"),
        (url = "/clockmate/api/index.php", description = "Fully prefixed routes"),
    ),
    paths(
        handlers::health::health,
        handlers::clock::record_clock_event,
        handlers::clock::get_logs,
        handlers::admin::list_pending,
        handlers::admin::list_employees,
        handlers::admin::get_stats,
        handlers::admin::approve,
        handlers::admin::reject,
        handlers::admin::reset_pin,
        handlers::admin::deactivate,
        handlers::admin::reactivate,
        handlers::auth::signup,
        handlers::auth::login,
        handlers::auth::pin_login,
        handlers::export::export_all,
        handlers::export::export_employee,
    ),
    components(schemas(
        Role,
        ClockEventType,
        response::ErrorEnvelope,
        response::MessageResponse,
        models::health::HealthResponse,
        models::clock::ClockEventCreate,
        models::clock::ClockEventResponse,
        models::clock::ClockEventRecorded,
        models::clock::LogEntry,
        models::employees::PendingEmployee,
        models::employees::EmployeeResponse,
        models::employees::ResetPinRequest,
        models::auth::SignupRequest,
        models::auth::PinLoginRequest,
        models::auth::LoginResponse,
        models::stats::StatsResponse,
    )),
    tags(
        (name = "health", description = "Service information"),
        (name = "clock", description = "Clock-in / clock-out events"),
        (name = "admin", description = "Account administration and reporting"),
        (name = "auth", description = "Signup and PIN login"),
        (name = "export", description = "CSV downloads"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for path in [
            "/",
            "/clock/event",
            "/clock/logs/{id}",
            "/admin/pending",
            "/admin/employees",
            "/admin/stats",
            "/admin/approve/{id}",
            "/admin/reject/{id}",
            "/admin/reset-pin/{id}",
            "/admin/deactivate/{id}",
            "/admin/reactivate/{id}",
            "/auth/signup",
            "/auth/login",
            "/auth/pin-login",
            "/admin/export",
            "/admin/export-employee/{id}",
        ] {
            assert!(paths.contains(&path), "{path} missing from OpenAPI document");
        }
    }

    #[test]
    fn test_document_serializes() {
        let json = ApiDoc::openapi().to_pretty_json().unwrap();
        assert!(json.contains("ClockMate API"));
    }
}
