//! Repository implementations for database access.
//!
//! # Design Pattern
//!
//! Each repository:
//! - Wraps a SQLx connection or transaction
//! - Provides strongly-typed operations for one table
//! - Handles query construction and parameter binding
//! - Returns models from [`crate::db::models`]
//!
//! # Available Repositories
//!
//! - [`Employees`]: account rows, approval transitions and login candidates
//! - [`Pins`]: PIN hashes, one per employee
//! - [`ClockEvents`]: clock in/out events, log queries, exports and daily counts
//!
//! # Common Pattern
//!
//! ```ignore
//! use clockmate::db::handlers::{Employees, Repository};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let pending = Employees::new(&mut conn).list(&EmployeeFilter::pending()).await?;
//!     Ok(())
//! }
//! ```

pub mod clock_events;
pub mod employees;
pub mod pins;
pub mod repository;

pub use clock_events::ClockEvents;
pub use employees::Employees;
pub use pins::Pins;
pub use repository::Repository;
