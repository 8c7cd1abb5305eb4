//! Declarative route table and request resolution.
//!
//! Every request is resolved against [`ROUTES`] exactly once, in [`route_requests_middleware`],
//! before it reaches the axum router:
//!
//! 1. The path is normalized: surrounding slashes are trimmed and the configured prefix
//!    segments (`clockmate`, `api`, `index.php` by default) are each stripped at most once, in
//!    order, if they lead the path.
//! 2. The normalized route is matched against the table. An unknown route becomes a 404
//!    `Endpoint not found: {route}` envelope, a known route with the wrong method a 405.
//! 3. On a match the request URI is rewritten to `/{route}` (query preserved) and handed to the
//!    axum router, which is built from the same table (see [`crate::build_router`]).
//!
//! `OPTIONS` requests never reach the table: they are answered with 200 and the CORS headers.

use crate::{AppState, config::CorsConfig, errors::Error, types::EmployeeId};
use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, Uri, header},
    middleware::Next,
    response::Response,
};
use tracing::{debug, trace};

/// Named operations reachable through the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Health,
    RecordClockEvent,
    ClockLogs,
    PendingEmployees,
    ListEmployees,
    Stats,
    Approve,
    Reject,
    ResetPin,
    Deactivate,
    Reactivate,
    Signup,
    Login,
    PinLogin,
    ExportAll,
    ExportEmployee,
}

/// HTTP method a route accepts. `Get` also accepts `HEAD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMethod {
    Get,
    Post,
}

impl RouteMethod {
    pub fn matches(self, method: &Method) -> bool {
        match self {
            RouteMethod::Get => method == Method::GET || method == Method::HEAD,
            RouteMethod::Post => method == Method::POST,
        }
    }
}

/// Shape of a route: a fixed string, or a fixed prefix followed by one numeric id segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePattern {
    Exact(&'static str),
    WithId(&'static str),
}

impl RoutePattern {
    /// Match a normalized route. Returns the captured id (if the pattern has one) on success.
    ///
    /// The id must be all ASCII digits and fit in an `i64`.
    pub fn matches(&self, route: &str) -> Option<Option<EmployeeId>> {
        match self {
            RoutePattern::Exact(pattern) => (route == *pattern).then_some(None),
            RoutePattern::WithId(prefix) => {
                let id = route.strip_prefix(prefix)?.strip_prefix('/')?;
                if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                id.parse::<EmployeeId>().ok().map(Some)
            }
        }
    }

    /// The axum path this pattern is served under after URI rewriting.
    pub fn axum_path(&self) -> String {
        match self {
            RoutePattern::Exact("") => "/".to_string(),
            RoutePattern::Exact(pattern) => format!("/{pattern}"),
            RoutePattern::WithId(prefix) => format!("/{prefix}/{{id}}"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RouteSpec {
    pub method: RouteMethod,
    pub pattern: RoutePattern,
    pub endpoint: Endpoint,
}

const fn route(method: RouteMethod, pattern: RoutePattern, endpoint: Endpoint) -> RouteSpec {
    RouteSpec { method, pattern, endpoint }
}

use Endpoint::*;
use RouteMethod::{Get, Post};
use RoutePattern::{Exact, WithId};

/// Every route the service answers. Patterns are mutually exclusive, so order does not matter.
pub static ROUTES: &[RouteSpec] = &[
    route(Get, Exact(""), Health),
    route(Get, Exact("test"), Health),
    route(Get, Exact("index.php"), Health),
    route(Post, Exact("clock/event"), RecordClockEvent),
    route(Get, WithId("clock/logs"), ClockLogs),
    route(Get, Exact("admin/pending"), PendingEmployees),
    route(Get, Exact("admin/employees"), ListEmployees),
    route(Get, Exact("admin/stats"), Stats),
    route(Post, WithId("admin/approve"), Approve),
    route(Post, WithId("admin/reject"), Reject),
    route(Post, WithId("admin/reset-pin"), ResetPin),
    route(Post, WithId("admin/deactivate"), Deactivate),
    route(Post, WithId("admin/reactivate"), Reactivate),
    route(Post, Exact("auth/signup"), Signup),
    route(Post, Exact("auth/login"), Login),
    route(Post, Exact("auth/pin-login"), PinLogin),
    route(Get, Exact("admin/export"), ExportAll),
    route(Get, WithId("admin/export-employee"), ExportEmployee),
];

/// A route table entry matched by a request.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRoute {
    pub spec: &'static RouteSpec,
    pub id: Option<EmployeeId>,
}

/// Trim surrounding slashes and strip each configured leading segment at most once, in order.
pub fn normalize_route(path: &str, prefixes: &[String]) -> String {
    let mut segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let mut start = 0;
    for prefix in prefixes {
        if segments.get(start).is_some_and(|segment| *segment == prefix.as_str()) {
            start += 1;
        }
    }
    segments.drain(..start);
    segments.join("/")
}

/// Match a normalized route and method against [`ROUTES`].
pub fn resolve(method: &Method, route: &str) -> Result<ResolvedRoute, Error> {
    let mut path_matched = false;
    for spec in ROUTES {
        if let Some(id) = spec.pattern.matches(route) {
            if spec.method.matches(method) {
                return Ok(ResolvedRoute { spec, id });
            }
            path_matched = true;
        }
    }

    if path_matched {
        Err(Error::MethodNotAllowed)
    } else {
        Err(Error::RouteNotFound { route: route.to_string() })
    }
}

/// Response to a bare `OPTIONS` request. The allowed origin is added by the CORS layer.
fn options_response(cors: &CorsConfig) -> Result<Response, Error> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(crate::CORS_ALLOWED_METHODS))
        .header(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(crate::CORS_ALLOWED_HEADERS))
        .header(header::ACCESS_CONTROL_MAX_AGE, cors.max_age)
        .body(Body::empty())
        .map_err(|e| Error::Internal {
            operation: format!("build OPTIONS response: {e}"),
        })
}

/// Resolve the request against the route table and rewrite its URI to the canonical route.
pub(crate) fn route_request(state: &AppState, mut request: Request) -> Result<Request, Error> {
    let uri = request.uri().clone();
    let route = normalize_route(uri.path(), &state.config.route_prefixes);
    let resolved = resolve(request.method(), &route)?;
    trace!(
        endpoint = ?resolved.spec.endpoint,
        id = ?resolved.id,
        "Resolved {} {}",
        request.method(),
        uri.path()
    );

    let query_string = uri.query().map(|q| format!("?{q}")).unwrap_or_default();
    let mut parts = uri.into_parts();
    parts.path_and_query = Some(format!("/{route}{query_string}").parse().map_err(|e| Error::Internal {
        operation: format!("parse rewritten path /{route}{query_string}: {e}"),
    })?);
    *request.uri_mut() = Uri::from_parts(parts).map_err(|e| Error::Internal {
        operation: format!("construct URI from parts: {e}"),
    })?;

    Ok(request)
}

/// Middleware that resolves every request against the route table before path matching.
pub async fn route_requests_middleware(State(state): State<AppState>, request: Request, next: Next) -> Result<Response, Error> {
    if request.method() == Method::OPTIONS {
        debug!("Answering OPTIONS {}", request.uri().path());
        return options_response(&state.config.cors);
    }

    let request = route_request(&state, request)?;
    Ok(next.run(request).await)
}
