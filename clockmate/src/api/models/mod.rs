//! API request and response data models.
//!
//! These structures define the public wire format and are kept separate from the database
//! records in [`crate::db::models`]. Field names follow the existing client contract, which is
//! why request bodies are camelCase while most response rows are snake_case.
//!
//! - [`clock`]: clock event submission, stored event echo and log entries
//! - [`employees`]: admin views of employee accounts and the PIN reset body
//! - [`auth`]: signup and PIN login
//! - [`stats`]: dashboard counters
//! - [`health`]: service information

pub mod auth;
pub mod clock;
pub mod employees;
pub mod health;
pub mod stats;
