//! Common type definitions shared by the API and database layers.
//!
//! # ID Types
//!
//! Rows are keyed by `BIGSERIAL` columns, exposed here as type aliases so that signatures say
//! which table an integer belongs to:
//!
//! - [`EmployeeId`]: employee account identifier (also the key of the employee's PIN)
//! - [`ClockEventId`]: clock event identifier
//!
//! # Enumerations
//!
//! [`Role`] and [`ClockEventType`] map onto the `employee_role` and `clock_event_type`
//! PostgreSQL enums and serialize as their lowercase names on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

// Type aliases for IDs
pub type EmployeeId = i64;
pub type ClockEventId = i64;

/// Account role. Employees authenticate with a 6-digit PIN, admins with an 8-digit PIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "employee_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Employee => write!(f, "employee"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Direction of a clock event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "clock_event_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ClockEventType {
    In,
    Out,
}

impl ClockEventType {
    /// Parse the wire representation. Only the exact lowercase names are accepted.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "in" => Some(ClockEventType::In),
            "out" => Some(ClockEventType::Out),
            _ => None,
        }
    }
}

impl fmt::Display for ClockEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockEventType::In => write!(f, "in"),
            ClockEventType::Out => write!(f, "out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_event_type_parse_is_exact() {
        assert_eq!(ClockEventType::parse("in"), Some(ClockEventType::In));
        assert_eq!(ClockEventType::parse("out"), Some(ClockEventType::Out));
        assert_eq!(ClockEventType::parse("IN"), None);
        assert_eq!(ClockEventType::parse(" in"), None);
        assert_eq!(ClockEventType::parse(""), None);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), "admin");
        assert_eq!(serde_json::to_value(ClockEventType::Out).unwrap(), "out");
        assert_eq!(Role::Employee.to_string(), "employee");
    }
}
