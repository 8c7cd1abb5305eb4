//! API request/response models for clock events.

use crate::{
    api::extract::{StringOrNumber, lenient_string},
    db::models::clock_events::ClockEventDBResponse,
    timestamps::sql_datetime,
    types::{ClockEventId, ClockEventType, EmployeeId},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Body of `POST clock/event`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClockEventCreate {
    #[schema(value_type = Option<String>, example = "12")]
    pub employee_id: Option<StringOrNumber>,
    /// `in` or `out`
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    /// Optional event time. `YYYY-MM-DD HH:MM:SS` is stored as-is, other date-time formats are
    /// converted, anything unparseable (including non-string values) is replaced by the server time.
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: Option<String>,
}

/// A clock event as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClockEventResponse {
    pub id: ClockEventId,
    pub employee_id: EmployeeId,
    #[serde(rename = "type")]
    pub event_type: ClockEventType,
    #[serde(with = "sql_datetime")]
    #[schema(value_type = String, example = "2025-03-04 08:00:00")]
    pub timestamp: NaiveDateTime,
}

impl From<ClockEventDBResponse> for ClockEventResponse {
    fn from(db: ClockEventDBResponse) -> Self {
        Self {
            id: db.id,
            employee_id: db.employee_id,
            event_type: db.event_type,
            timestamp: db.timestamp,
        }
    }
}

/// Response data of `POST clock/event`
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClockEventRecorded {
    pub message: String,
    pub record: ClockEventResponse,
}

/// One entry of an employee's log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LogEntry {
    pub id: ClockEventId,
    #[serde(rename = "type")]
    pub event_type: ClockEventType,
    #[serde(with = "sql_datetime")]
    #[schema(value_type = String, example = "2025-03-04 08:00:00")]
    pub timestamp: NaiveDateTime,
}

impl From<ClockEventDBResponse> for LogEntry {
    fn from(db: ClockEventDBResponse) -> Self {
        Self {
            id: db.id,
            event_type: db.event_type,
            timestamp: db.timestamp,
        }
    }
}

/// Query parameters of `GET clock/logs/{id}`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct LogsQuery {
    /// First day, inclusive (`YYYY-MM-DD`). Only applied together with `end`.
    pub start: Option<String>,
    /// Last day, inclusive (`YYYY-MM-DD`). Only applied together with `start`.
    pub end: Option<String>,
}
