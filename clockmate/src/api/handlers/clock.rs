use crate::{
    AppState,
    api::{
        extract::{Payload, QueryParams, StringOrNumber},
        models::clock::{ClockEventCreate, ClockEventRecorded, LogEntry, LogsQuery},
        response::ApiResponse,
    },
    db::{
        handlers::{
            ClockEvents, Repository,
            clock_events::{ClockEventFilter, DateRange},
        },
        models::clock_events::ClockEventCreateDBRequest,
    },
    errors::{Error, Result, StorageContext},
    timestamps,
    types::{ClockEventType, EmployeeId},
};
use axum::extract::{Path, State};

const CLOCK_EVENT_REQUIRED: &str = "Employee ID and valid type (in/out) are required.";

#[utoipa::path(
    post,
    path = "/clock/event",
    tag = "clock",
    summary = "Record a clock event",
    request_body = ClockEventCreate,
    responses(
        (status = 201, description = "Event stored; the stored row is echoed back", body = ClockEventRecorded),
        (status = 400, description = "Missing employee id or invalid type", body = crate::api::response::ErrorEnvelope),
        (status = 500, description = "Storage failure", body = crate::api::response::ErrorEnvelope),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn record_clock_event(
    State(state): State<AppState>,
    Payload(body): Payload<ClockEventCreate>,
) -> Result<ApiResponse<ClockEventRecorded>> {
    let employee_id = body.employee_id.as_ref().and_then(StringOrNumber::as_i64).filter(|id| *id != 0);
    let event_type = body.event_type.as_deref().and_then(ClockEventType::parse);
    let (Some(employee_id), Some(event_type)) = (employee_id, event_type) else {
        return Err(Error::bad_request(CLOCK_EVENT_REQUIRED));
    };

    let request = ClockEventCreateDBRequest {
        employee_id,
        event_type,
        timestamp: timestamps::normalize_client_timestamp(body.timestamp.as_deref()),
    };

    let mut conn = state.db.acquire().await.storage_context("Failed to record clock event")?;
    let record = ClockEvents::new(&mut conn)
        .create(&request)
        .await
        .storage_context("Failed to record clock event")?;

    tracing::info!(employee_id, event_type = %event_type, "Recorded clock event {}", record.id);

    Ok(ApiResponse::created(ClockEventRecorded {
        message: "Clock event recorded successfully.".to_string(),
        record: record.into(),
    }))
}

/// Blank query values count as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[utoipa::path(
    get,
    path = "/clock/logs/{id}",
    tag = "clock",
    summary = "List an employee's clock events",
    description = "Events are returned oldest first. The date filter applies only when both `start` and `end` are given.",
    params(
        ("id" = i64, Path, description = "Employee ID"),
        LogsQuery,
    ),
    responses(
        (status = 200, description = "Log entries in chronological order", body = Vec<LogEntry>),
        (status = 400, description = "Malformed date", body = crate::api::response::ErrorEnvelope),
        (status = 500, description = "Storage failure", body = crate::api::response::ErrorEnvelope),
    )
)]
#[tracing::instrument(skip_all, fields(employee_id = id))]
pub async fn get_logs(
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
    QueryParams(query): QueryParams<LogsQuery>,
) -> Result<ApiResponse<Vec<LogEntry>>> {
    let dates = match (present(query.start), present(query.end)) {
        (Some(start), Some(end)) => {
            let (Some(start), Some(end)) = (timestamps::parse_date(start.trim()), timestamps::parse_date(end.trim())) else {
                return Err(Error::bad_request("Dates must be in YYYY-MM-DD format."));
            };
            Some(DateRange { start, end })
        }
        _ => None,
    };

    let mut conn = state.db.acquire().await.storage_context("Failed to fetch logs")?;
    let events = ClockEvents::new(&mut conn)
        .list(&ClockEventFilter::new(id).with_dates(dates))
        .await
        .storage_context("Failed to fetch logs")?;

    Ok(ApiResponse::ok(events.into_iter().map(LogEntry::from).collect()))
}
