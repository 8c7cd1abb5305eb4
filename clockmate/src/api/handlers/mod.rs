//! HTTP request handlers for all API endpoints.
//!
//! Handlers are plain async functions; the route table in [`crate::api::routes`] decides which
//! one serves a request. Each handler validates its input before touching the database and
//! reports failures through [`crate::errors::Error`].
//!
//! - [`health`]: service information
//! - [`clock`]: recording clock events and reading logs
//! - [`admin`]: approval lifecycle, PIN resets and dashboard counters
//! - [`auth`]: signup and PIN login
//! - [`export`]: CSV downloads

pub mod admin;
pub mod auth;
pub mod clock;
pub mod export;
pub mod health;
