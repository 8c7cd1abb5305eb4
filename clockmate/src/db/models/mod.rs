//! Database record structures.
//!
//! `*DBResponse` types are rows read back from PostgreSQL; `*DBRequest` types carry the values
//! needed to insert a row.

pub mod clock_events;
pub mod employees;
