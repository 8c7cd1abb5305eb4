//! PIN authentication.
//!
//! There are no sessions or tokens: every login request carries the PIN and is checked against
//! the stored hashes of all approved accounts of the relevant role. Employees use 6-digit PINs,
//! admins 8-digit PINs (see [`pin::PinKind`]).
//!
//! # Modules
//!
//! - [`pin`]: PIN format validation and Argon2 hashing/verification

pub mod pin;
