//! Test utilities for handler and repository tests.

use crate::{
    AppState,
    auth::pin::{Argon2Params, hash_pin},
    config::{Config, DatabaseConfig, PoolSettings},
    db::{
        handlers::{ClockEvents, Employees, Pins, Repository},
        models::{
            clock_events::{ClockEventCreateDBRequest, ClockEventDBResponse},
            employees::{EmployeeCreateDBRequest, EmployeeDBResponse},
        },
    },
    timestamps::{self, DATETIME_FORMAT},
    types::{ClockEventType, EmployeeId, Role},
};
use axum_test::TestServer;
use chrono::NaiveDateTime;
use sqlx::{PgPool, postgres::PgPoolOptions};

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 3001,
        database: DatabaseConfig {
            pool: PoolSettings {
                max_connections: 1,
                min_connections: 0,
                ..Default::default()
            },
            ..Default::default()
        },
        // Cheap parameters keep PIN hashing fast in tests
        pin_hashing: Argon2Params {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
        ..Default::default()
    }
}

/// Full application router over the given pool. Migrations are applied by `#[sqlx::test]`.
pub fn create_test_app(pool: PgPool) -> TestServer {
    let state = AppState::builder().db(pool).config(create_test_config()).build();
    let router = crate::build_router(state).expect("Failed to build router");
    TestServer::new(router).expect("Failed to create test server")
}

/// Application whose pool never connects, for requests that must not reach the database.
pub fn create_lazy_test_app() -> TestServer {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/clockmate_unused")
        .expect("Failed to create lazy pool");
    create_test_app(pool)
}

pub fn create_employee_request(name: &str, email: &str, role: Role, is_approved: bool) -> EmployeeCreateDBRequest {
    EmployeeCreateDBRequest {
        name: name.to_string(),
        email: email.to_string(),
        role,
        is_approved,
        created_at: timestamps::now(),
    }
}

/// Insert an employee with a PIN, the way signup plus (optionally) approval would.
pub async fn create_employee(pool: &PgPool, name: &str, email: &str, pin: &str, role: Role, is_approved: bool) -> EmployeeDBResponse {
    let pin_hash = hash_pin(pin, create_test_config().pin_hashing).expect("Failed to hash PIN");

    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let employee = Employees::new(&mut conn)
        .create(&create_employee_request(name, email, role, is_approved))
        .await
        .expect("Failed to create test employee");
    Pins::new(&mut conn)
        .create(employee.id, &pin_hash)
        .await
        .expect("Failed to create test PIN");

    employee
}

/// Insert a clock event at a `YYYY-MM-DD HH:MM:SS` timestamp.
pub async fn insert_clock_event(pool: &PgPool, employee_id: EmployeeId, event_type: ClockEventType, timestamp: &str) -> ClockEventDBResponse {
    let timestamp = NaiveDateTime::parse_from_str(timestamp, DATETIME_FORMAT).expect("Invalid test timestamp");

    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    ClockEvents::new(&mut conn)
        .create(&ClockEventCreateDBRequest {
            employee_id,
            event_type,
            timestamp,
        })
        .await
        .expect("Failed to create test clock event")
}
