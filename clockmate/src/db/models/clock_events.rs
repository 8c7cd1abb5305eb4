//! Database models for clock events.

use crate::types::{ClockEventId, ClockEventType, EmployeeId};
use chrono::NaiveDateTime;
use sqlx::FromRow;

/// Database request for recording a clock event
#[derive(Debug, Clone)]
pub struct ClockEventCreateDBRequest {
    pub employee_id: EmployeeId,
    pub event_type: ClockEventType,
    pub timestamp: NaiveDateTime,
}

/// Database response for a clock event row
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ClockEventDBResponse {
    pub id: ClockEventId,
    pub employee_id: EmployeeId,
    pub event_type: ClockEventType,
    pub timestamp: NaiveDateTime,
}

/// Clock event joined with the owning employee, one CSV export line
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ClockEventExportRow {
    pub name: String,
    pub email: String,
    pub event_type: ClockEventType,
    pub timestamp: NaiveDateTime,
}
