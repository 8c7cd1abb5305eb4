//! Database models for employees.

use crate::types::{EmployeeId, Role};
use chrono::NaiveDateTime;
use sqlx::FromRow;

/// Database request for creating a new employee
#[derive(Debug, Clone)]
pub struct EmployeeCreateDBRequest {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_approved: bool,
    pub created_at: NaiveDateTime,
}

/// Database response for an employee row
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct EmployeeDBResponse {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_approved: bool,
    pub created_at: NaiveDateTime,
}

/// An approved account joined with its PIN hash, as considered during PIN login.
///
/// Never leaves the auth handlers: the hash is dropped before anything is serialized.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeCredential {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub pin_hash: String,
}
