use crate::{
    AppState,
    api::{
        extract::Payload,
        models::auth::{LoginResponse, PinLoginRequest, SignupRequest},
        response::{ApiResponse, ErrorEnvelope, MessageResponse},
    },
    auth::pin::{PinKind, hash_pin_blocking, is_valid_pin, verify_pin},
    db::{
        handlers::{Employees, Pins, Repository},
        models::employees::EmployeeCreateDBRequest,
    },
    errors::{Error, Result, StorageContext},
    timestamps,
    types::Role,
};
use axum::extract::State;
use tracing::info;

/// Unique constraint on `employees.email`
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "employees_email_unique";

const EMAIL_IN_USE: &str = "Email already in use.";
const SIGNUP_FAILED: &str = "Failed to create account";
const LOGIN_FAILED: &str = "Login failed";

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    summary = "Create an employee account",
    description = "The account starts unapproved and cannot log in until an admin approves it.",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Missing field or PIN not exactly 6 digits", body = ErrorEnvelope),
        (status = 409, description = "Email already in use", body = ErrorEnvelope),
        (status = 500, description = "Storage failure", body = ErrorEnvelope),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn signup(State(state): State<AppState>, Payload(body): Payload<SignupRequest>) -> Result<ApiResponse<MessageResponse>> {
    let (Some(name), Some(email), Some(pin)) = (
        non_empty(body.name),
        non_empty(body.email),
        non_empty(body.pin.map(|pin| pin.to_text())),
    ) else {
        return Err(Error::bad_request("Name, email, and PIN are required."));
    };

    if !is_valid_pin(&pin, PinKind::Employee) {
        return Err(Error::bad_request("PIN must be exactly 6 digits."));
    }

    let pin_hash = hash_pin_blocking(pin, state.config.pin_hashing).await?;

    // Dropping the transaction on any early return rolls it back
    let mut tx = state.db.begin().await.storage_context(SIGNUP_FAILED)?;

    let existing = Employees::new(&mut tx).get_by_email(&email).await.storage_context(SIGNUP_FAILED)?;
    if existing.is_some() {
        return Err(Error::Conflict {
            message: EMAIL_IN_USE.to_string(),
        });
    }

    let request = EmployeeCreateDBRequest {
        name,
        email,
        role: Role::Employee,
        is_approved: false,
        created_at: timestamps::now(),
    };
    let employee = match Employees::new(&mut tx).create(&request).await {
        Ok(employee) => employee,
        // Lost a race with a concurrent signup for the same email
        Err(e) if e.is_unique_violation_of(EMAIL_UNIQUE_CONSTRAINT) => {
            return Err(Error::Conflict {
                message: EMAIL_IN_USE.to_string(),
            });
        }
        Err(e) => return Err(e).storage_context(SIGNUP_FAILED),
    };

    Pins::new(&mut tx)
        .create(employee.id, &pin_hash)
        .await
        .storage_context(SIGNUP_FAILED)?;

    tx.commit().await.storage_context(SIGNUP_FAILED)?;

    info!("Created pending employee {}", employee.id);
    Ok(ApiResponse::created(MessageResponse::new("Account created! Awaiting admin approval.")))
}

/// Find the approved account of the PIN kind's role whose stored hash matches `pin`.
///
/// PINs are not unique keys, so there is nothing to look up by: every candidate's salted hash is
/// verified in id order until one matches. The cost is linear in the number of accounts of the
/// role.
async fn authenticate(state: &AppState, body: PinLoginRequest, kind: PinKind) -> Result<LoginResponse> {
    let pin = non_empty(body.pin.map(|pin| pin.to_text())).ok_or_else(|| Error::bad_request("PIN is required."))?;
    if !is_valid_pin(&pin, kind) {
        return Err(Error::bad_request("Invalid PIN format."));
    }

    let candidates = {
        let mut conn = state.db.acquire().await.storage_context(LOGIN_FAILED)?;
        Employees::new(&mut conn)
            .list_credentials(kind.role())
            .await
            .storage_context(LOGIN_FAILED)?
    };

    let matched = tokio::task::spawn_blocking(move || candidates.into_iter().find(|candidate| verify_pin(&pin, &candidate.pin_hash)))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn PIN verification task: {e}"),
        })?;

    match matched {
        Some(credential) => {
            info!("Employee {} logged in as {}", credential.id, credential.role);
            Ok(LoginResponse::from(credential))
        }
        None => Err(Error::Unauthenticated {
            message: "Invalid PIN or account not approved.".to_string(),
        }),
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    summary = "Employee login with a 6-digit PIN",
    request_body = PinLoginRequest,
    responses(
        (status = 200, description = "Authenticated employee", body = LoginResponse),
        (status = 400, description = "PIN missing or malformed", body = ErrorEnvelope),
        (status = 401, description = "No approved employee has this PIN", body = ErrorEnvelope),
        (status = 500, description = "Storage failure", body = ErrorEnvelope),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Payload(body): Payload<PinLoginRequest>) -> Result<ApiResponse<LoginResponse>> {
    authenticate(&state, body, PinKind::Employee).await.map(ApiResponse::ok)
}

#[utoipa::path(
    post,
    path = "/auth/pin-login",
    tag = "auth",
    summary = "Admin login with an 8-digit PIN",
    request_body = PinLoginRequest,
    responses(
        (status = 200, description = "Authenticated admin", body = LoginResponse),
        (status = 400, description = "PIN missing or malformed", body = ErrorEnvelope),
        (status = 401, description = "No approved admin has this PIN", body = ErrorEnvelope),
        (status = 500, description = "Storage failure", body = ErrorEnvelope),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn pin_login(State(state): State<AppState>, Payload(body): Payload<PinLoginRequest>) -> Result<ApiResponse<LoginResponse>> {
    authenticate(&state, body, PinKind::Admin).await.map(ApiResponse::ok)
}
