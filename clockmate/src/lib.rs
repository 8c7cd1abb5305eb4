//! # ClockMate: time and attendance backend
//!
//! `clockmate` is the HTTP backend of a small time-and-attendance system. Employees sign up,
//! wait for an administrator to approve them, then log in with a 6-digit PIN and record
//! clock-in / clock-out events. Administrators log in with an 8-digit PIN to approve, reject,
//! deactivate and reactivate accounts, reset PINs, view dashboard counters and export clock
//! events as CSV.
//!
//! ## Request Flow
//!
//! Every request first passes through [`api::routes::route_requests_middleware`], which strips
//! the configured leading path segments (`/clockmate/api/index.php` by default), resolves the
//! remaining route against the declarative [`api::routes::ROUTES`] table and either rejects it
//! (404 / 405 JSON envelope) or rewrites the URI so the axum router built from the same table
//! can dispatch it. Handlers in [`api::handlers`] validate their input, talk to PostgreSQL through
//! the repositories in [`db::handlers`] and answer with the `{success, data | error}` envelope.
//!
//! ## Core Components
//!
//! - [`api`]: route table, handlers, wire models, envelope and CSV encoding
//! - [`auth`]: PIN format checks and Argon2 hashing
//! - [`db`]: repositories over the `employees`, `pins` and `clock_events` tables
//! - [`config`]: YAML + environment configuration
//! - [`telemetry`]: tracing subscriber and optional OTLP export
//!
//! ## Getting Started
//!
//! ```no_run
//! use clockmate::{Application, Config};
//!
//! # async fn example(config: Config) -> anyhow::Result<()> {
//! let app = Application::new(config).await?;
//! app.serve(async { tokio::signal::ctrl_c().await.ok(); }).await
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod openapi;
pub mod telemetry;
#[cfg(test)]
mod test_utils;
pub mod timestamps;
pub mod types;

use crate::{
    api::routes::{Endpoint, RouteMethod, RouteSpec, ROUTES, route_requests_middleware},
    auth::pin::hash_pin_blocking,
    config::{CorsOrigin, InitialAdminConfig},
    db::{
        handlers::{Employees, Pins, Repository},
        models::employees::EmployeeCreateDBRequest,
    },
    errors::StorageContext,
};
use auth::pin::Argon2Params;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware::from_fn_with_state,
    routing::{MethodFilter, MethodRouter, on},
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument, warn};

pub use types::{ClockEventId, EmployeeId};

/// Methods advertised to browsers in CORS responses.
pub const CORS_ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
/// Request headers advertised to browsers in CORS responses.
pub const CORS_ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// Application state shared across all request handlers.
///
/// ```ignore
/// let state = AppState::builder().db(pool).config(config).build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the clockmate database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Ensure the configured administrator exists and can log in with the configured PIN.
///
/// Idempotent: creates an approved `admin` account on first run, and on later runs overwrites
/// the PIN of the account registered under that email. Runs in a single transaction.
#[instrument(skip_all, fields(email = %admin.email))]
pub async fn create_initial_admin(admin: &InitialAdminConfig, params: Argon2Params, db: &PgPool) -> errors::Result<EmployeeId> {
    const OPERATION: &str = "Failed to create initial admin";

    let pin_hash = hash_pin_blocking(admin.pin.clone(), params).await?;

    let mut tx = db.begin().await.storage_context(OPERATION)?;

    let existing = Employees::new(&mut tx).get_by_email(&admin.email).await.storage_context(OPERATION)?;
    let id = match existing {
        Some(employee) => {
            if employee.role != types::Role::Admin || !employee.is_approved {
                warn!(
                    "Initial admin email belongs to account {} (role {}, approved {}); only its PIN is updated",
                    employee.id, employee.role, employee.is_approved
                );
            }
            employee.id
        }
        None => {
            let request = EmployeeCreateDBRequest {
                name: admin.name.clone(),
                email: admin.email.clone(),
                role: types::Role::Admin,
                is_approved: true,
                created_at: timestamps::now(),
            };
            Employees::new(&mut tx).create(&request).await.storage_context(OPERATION)?.id
        }
    };

    Pins::new(&mut tx).upsert(id, &pin_hash).await.storage_context(OPERATION)?;
    tx.commit().await.storage_context(OPERATION)?;

    debug!("Initial admin account {} ready", id);
    Ok(id)
}

/// Build the CORS layer. A wildcard anywhere in `allowed_origins` allows every origin.
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors = &config.cors;
    let allow_origin = if cors.allowed_origins.iter().any(|origin| matches!(origin, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &cors.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                // Origins never carry the trailing slash `Url` adds
                origins.push(url.as_str().trim_end_matches('/').parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(cors.max_age)))
}

/// The axum handler serving one route table entry.
fn method_router(spec: &RouteSpec) -> MethodRouter<AppState> {
    use api::handlers::{admin, auth, clock, export, health};

    let filter = match spec.method {
        RouteMethod::Get => MethodFilter::GET,
        RouteMethod::Post => MethodFilter::POST,
    };

    match spec.endpoint {
        Endpoint::Health => on(filter, health::health),
        Endpoint::RecordClockEvent => on(filter, clock::record_clock_event),
        Endpoint::ClockLogs => on(filter, clock::get_logs),
        Endpoint::PendingEmployees => on(filter, admin::list_pending),
        Endpoint::ListEmployees => on(filter, admin::list_employees),
        Endpoint::Stats => on(filter, admin::get_stats),
        Endpoint::Approve => on(filter, admin::approve),
        Endpoint::Reject => on(filter, admin::reject),
        Endpoint::ResetPin => on(filter, admin::reset_pin),
        Endpoint::Deactivate => on(filter, admin::deactivate),
        Endpoint::Reactivate => on(filter, admin::reactivate),
        Endpoint::Signup => on(filter, auth::signup),
        Endpoint::Login => on(filter, auth::login),
        Endpoint::PinLogin => on(filter, auth::pin_login),
        Endpoint::ExportAll => on(filter, export::export_all),
        Endpoint::ExportEmployee => on(filter, export::export_employee),
    }
}

/// Build the complete application: route-table middleware, handlers, CORS and tracing.
///
/// The route-table middleware runs before any path matching, so the handler router only ever
/// sees canonical `/{route}` paths. CORS and tracing wrap everything, including the envelopes
/// produced for unknown routes and wrong methods.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let handlers = ROUTES
        .iter()
        .fold(Router::new(), |router, spec| router.route(&spec.pattern.axum_path(), method_router(spec)))
        .with_state(state.clone());

    let cors_layer = create_cors_layer(&state.config)?;
    let routed = from_fn_with_state(state, route_requests_middleware).layer(handlers);

    let router = Router::new().fallback_service(routed).layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// Connect to PostgreSQL and run migrations.
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let database = &config.database;
    match &database.url {
        Some(_) => info!("Connecting to database from url"),
        None => info!("Connecting to database {} on {}:{}", database.name, database.host, database.port),
    }

    let pool = database.pool.pool_options().connect_with(database.connect_options()?).await?;
    migrator().run(&pool).await?;

    Ok(pool)
}

pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Connect to the database, run migrations and seed the initial admin.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::new_with_pool(config, None).await
    }

    /// Like [`Application::new`], reusing an existing pool when given one.
    pub async fn new_with_pool(config: Config, pool: Option<PgPool>) -> anyhow::Result<Self> {
        debug!("Starting ClockMate with configuration: {:#?}", config);

        let pool = match pool {
            Some(pool) => {
                migrator().run(&pool).await?;
                pool
            }
            None => setup_database(&config).await?,
        };

        if let Some(admin) = &config.initial_admin {
            create_initial_admin(admin, config.pin_hashing, &pool).await?;
        }

        let app_state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(app_state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("ClockMate listening on http://{}", bind_addr);

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        info!("Closing database connections...");
        self.pool.close().await;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
