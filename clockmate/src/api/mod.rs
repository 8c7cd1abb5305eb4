//! API layer for HTTP request handling and data models.
//!
//! - **[`routes`]**: the route table and the middleware that resolves every request against it
//! - **[`handlers`]**: axum handlers, one per route table entry
//! - **[`models`]**: request/response wire structures
//! - **[`extract`]**: lenient JSON body extractor
//! - **[`response`]**: the `{success, data | error}` envelope and CSV attachments
//! - **[`csv`]**: CSV encoding of clock event exports
//!
//! # Routes
//!
//! | Method | Route                          | Purpose                              |
//! |--------|--------------------------------|--------------------------------------|
//! | GET    | `` / `test` / `index.php`      | Health                               |
//! | POST   | `clock/event`                  | Record a clock-in or clock-out       |
//! | GET    | `clock/logs/{id}`              | An employee's events, oldest first   |
//! | GET    | `admin/pending`                | Accounts awaiting approval           |
//! | GET    | `admin/employees`              | Approved employees                   |
//! | GET    | `admin/stats`                  | Dashboard counters                   |
//! | POST   | `admin/approve/{id}`           | Approve a pending account            |
//! | POST   | `admin/reject/{id}`            | Delete a pending account             |
//! | POST   | `admin/reset-pin/{id}`         | Replace a PIN                        |
//! | POST   | `admin/deactivate/{id}`        | Revoke approval                      |
//! | POST   | `admin/reactivate/{id}`        | Restore approval                     |
//! | POST   | `auth/signup`                  | Create an unapproved employee        |
//! | POST   | `auth/login`                   | Employee PIN login                   |
//! | POST   | `auth/pin-login`               | Admin PIN login                      |
//! | GET    | `admin/export`                 | CSV of every event                   |
//! | GET    | `admin/export-employee/{id}`   | CSV of one employee's events         |

pub mod csv;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
