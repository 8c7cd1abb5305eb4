use crate::{
    AppState,
    api::{
        extract::{Payload, QueryParams},
        models::{
            employees::{EmployeeResponse, ListEmployeesQuery, PendingEmployee, ResetPinRequest},
            stats::StatsResponse,
        },
        response::{ApiResponse, ErrorEnvelope, MessageResponse},
    },
    auth::pin::{PinKind, hash_pin_blocking, is_valid_pin},
    db::handlers::{ClockEvents, Employees, Pins, Repository, employees::EmployeeFilter},
    errors::{Error, Result, StorageContext},
    timestamps,
    types::{ClockEventType, EmployeeId},
};
use axum::extract::{Path, State};
use tracing::{debug, info};

const NOT_FOUND_OR_APPROVED: &str = "Employee not found or already approved.";

#[utoipa::path(
    get,
    path = "/admin/pending",
    tag = "admin",
    summary = "List accounts awaiting approval",
    responses(
        (status = 200, description = "Pending employees, oldest signup first", body = Vec<PendingEmployee>),
        (status = 500, description = "Storage failure", body = ErrorEnvelope),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_pending(State(state): State<AppState>) -> Result<ApiResponse<Vec<PendingEmployee>>> {
    let mut conn = state.db.acquire().await.storage_context("Failed to fetch pending approvals")?;
    let pending = Employees::new(&mut conn)
        .list(&EmployeeFilter::pending())
        .await
        .storage_context("Failed to fetch pending approvals")?;

    Ok(ApiResponse::ok(pending.into_iter().map(PendingEmployee::from).collect()))
}

#[utoipa::path(
    get,
    path = "/admin/employees",
    tag = "admin",
    summary = "List employees",
    description = "Approved employees, newest first. With `include_inactive=true` deactivated employees are listed too.",
    params(ListEmployeesQuery),
    responses(
        (status = 200, description = "Employees", body = Vec<EmployeeResponse>),
        (status = 500, description = "Storage failure", body = ErrorEnvelope),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_employees(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListEmployeesQuery>,
) -> Result<ApiResponse<Vec<EmployeeResponse>>> {
    let mut conn = state.db.acquire().await.storage_context("Failed to fetch employees")?;
    let employees = Employees::new(&mut conn)
        .list(&EmployeeFilter::staff(query.include_inactive()))
        .await
        .storage_context("Failed to fetch employees")?;

    Ok(ApiResponse::ok(employees.into_iter().map(EmployeeResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "admin",
    summary = "Dashboard counters",
    responses(
        (status = 200, description = "Counts computed for the server's current date", body = StatsResponse),
        (status = 500, description = "Storage failure", body = ErrorEnvelope),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_stats(State(state): State<AppState>) -> Result<ApiResponse<StatsResponse>> {
    const FAILED: &str = "Failed to fetch stats";
    let today = timestamps::today();
    let mut conn = state.db.acquire().await.storage_context(FAILED)?;

    let total_employees = Employees::new(&mut conn)
        .count(&EmployeeFilter::staff(false))
        .await
        .storage_context(FAILED)?;
    let pending_approvals = Employees::new(&mut conn)
        .count(&EmployeeFilter::pending())
        .await
        .storage_context(FAILED)?;

    let mut events = ClockEvents::new(&mut conn);
    let active_employees = events.count_active_employees_on(today).await.storage_context(FAILED)?;
    let today_clock_ins = events
        .count_events_on(today, ClockEventType::In)
        .await
        .storage_context(FAILED)?;

    Ok(ApiResponse::ok(StatsResponse {
        total_employees,
        active_employees,
        pending_approvals,
        today_clock_ins,
    }))
}

#[utoipa::path(
    post,
    path = "/admin/approve/{id}",
    tag = "admin",
    summary = "Approve a pending account",
    params(("id" = i64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Approved", body = MessageResponse),
        (status = 404, description = "No such pending account (missing or already approved)", body = ErrorEnvelope),
        (status = 500, description = "Storage failure", body = ErrorEnvelope),
    )
)]
#[tracing::instrument(skip_all, fields(employee_id = id))]
pub async fn approve(State(state): State<AppState>, Path(id): Path<EmployeeId>) -> Result<ApiResponse<MessageResponse>> {
    let mut conn = state.db.acquire().await.storage_context("Failed to approve employee")?;
    let approved = Employees::new(&mut conn)
        .approve_pending(id)
        .await
        .storage_context("Failed to approve employee")?;

    if !approved {
        return Err(Error::not_found(NOT_FOUND_OR_APPROVED));
    }
    info!("Approved employee {}", id);
    Ok(ApiResponse::ok(MessageResponse::new("Employee approved successfully.")))
}

#[utoipa::path(
    post,
    path = "/admin/reject/{id}",
    tag = "admin",
    summary = "Reject and delete a pending account",
    params(("id" = i64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Rejected and removed", body = MessageResponse),
        (status = 404, description = "No such pending account (missing or already approved)", body = ErrorEnvelope),
        (status = 500, description = "Storage failure", body = ErrorEnvelope),
    )
)]
#[tracing::instrument(skip_all, fields(employee_id = id))]
pub async fn reject(State(state): State<AppState>, Path(id): Path<EmployeeId>) -> Result<ApiResponse<MessageResponse>> {
    let mut conn = state.db.acquire().await.storage_context("Failed to reject employee")?;
    let deleted = Employees::new(&mut conn)
        .delete_pending(id)
        .await
        .storage_context("Failed to reject employee")?;

    if !deleted {
        return Err(Error::not_found(NOT_FOUND_OR_APPROVED));
    }
    info!("Rejected employee {}", id);
    Ok(ApiResponse::ok(MessageResponse::new("Employee rejected and removed.")))
}

#[utoipa::path(
    post,
    path = "/admin/reset-pin/{id}",
    tag = "admin",
    summary = "Replace an account's PIN",
    params(("id" = i64, Path, description = "Employee ID")),
    request_body = ResetPinRequest,
    responses(
        (status = 200, description = "PIN replaced", body = MessageResponse),
        (status = 400, description = "New PIN is not exactly 6 digits", body = ErrorEnvelope),
        (status = 404, description = "Employee not found", body = ErrorEnvelope),
        (status = 500, description = "Storage failure", body = ErrorEnvelope),
    )
)]
#[tracing::instrument(skip_all, fields(employee_id = id))]
pub async fn reset_pin(
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
    Payload(body): Payload<ResetPinRequest>,
) -> Result<ApiResponse<MessageResponse>> {
    let new_pin = body
        .new_pin
        .map(|pin| pin.to_text())
        .filter(|pin| is_valid_pin(pin, PinKind::Employee))
        .ok_or_else(|| Error::bad_request("New PIN must be exactly 6 digits."))?;

    let pin_hash = hash_pin_blocking(new_pin, state.config.pin_hashing).await?;

    let mut conn = state.db.acquire().await.storage_context("Failed to reset PIN")?;
    let replaced = Pins::new(&mut conn)
        .replace(id, &pin_hash)
        .await
        .storage_context("Failed to reset PIN")?;

    if !replaced {
        return Err(Error::not_found("Employee not found."));
    }
    info!("Reset PIN of employee {}", id);
    Ok(ApiResponse::ok(MessageResponse::new("PIN reset successfully.")))
}

async fn set_approval(state: &AppState, id: EmployeeId, approved: bool, failure: &str) -> Result<()> {
    let mut conn = state.db.acquire().await.storage_context(failure)?;
    let exists = Employees::new(&mut conn)
        .set_approved(id, approved)
        .await
        .storage_context(failure)?;

    // Reported as success either way
    if !exists {
        debug!("Approval change for unknown employee {}", id);
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/admin/deactivate/{id}",
    tag = "admin",
    summary = "Revoke an account's approval",
    description = "Always succeeds, whatever the current approval state.",
    params(("id" = i64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Deactivated", body = MessageResponse),
        (status = 500, description = "Storage failure", body = ErrorEnvelope),
    )
)]
#[tracing::instrument(skip_all, fields(employee_id = id))]
pub async fn deactivate(State(state): State<AppState>, Path(id): Path<EmployeeId>) -> Result<ApiResponse<MessageResponse>> {
    set_approval(&state, id, false, "Failed to deactivate").await?;
    Ok(ApiResponse::ok(MessageResponse::new("Employee deactivated.")))
}

#[utoipa::path(
    post,
    path = "/admin/reactivate/{id}",
    tag = "admin",
    summary = "Restore an account's approval",
    description = "Always succeeds, whatever the current approval state.",
    params(("id" = i64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Reactivated", body = MessageResponse),
        (status = 500, description = "Storage failure", body = ErrorEnvelope),
    )
)]
#[tracing::instrument(skip_all, fields(employee_id = id))]
pub async fn reactivate(State(state): State<AppState>, Path(id): Path<EmployeeId>) -> Result<ApiResponse<MessageResponse>> {
    set_approval(&state, id, true, "Failed to reactivate").await?;
    Ok(ApiResponse::ok(MessageResponse::new("Employee reactivated.")))
}

#[cfg(test)]
mod tests {
    use crate::{
        auth::pin::verify_pin,
        db::handlers::{Employees, Pins, Repository},
        test_utils::{create_employee, create_test_app, insert_clock_event},
        timestamps,
        types::{ClockEventType, Role},
    };
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_pending_and_employee_lists(pool: PgPool) {
        let app = create_test_app(pool.clone());
        let first = create_employee(&pool, "First", "first@example.com", "111111", Role::Employee, false).await;
        let second = create_employee(&pool, "Second", "second@example.com", "222222", Role::Employee, false).await;
        let approved = create_employee(&pool, "Approved", "approved@example.com", "333333", Role::Employee, true).await;
        create_employee(&pool, "Admin", "admin@example.com", "12345678", Role::Admin, true).await;

        let response = app.get("/admin/pending").await;
        response.assert_status_ok();
        let body: Value = response.json();
        let pending = body["data"].as_array().unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0]["id"], first.id);
        assert_eq!(pending[1]["id"], second.id);
        assert_eq!(pending[0]["name"], "First");
        assert!(pending[0].get("pin_hash").is_none());
        assert_eq!(pending[0]["created_at"].as_str().unwrap().len(), 19);

        let response = app.get("/admin/employees").await;
        let body: Value = response.json();
        let employees = body["data"].as_array().unwrap();
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0]["id"], approved.id);
        assert_eq!(employees[0]["status"], true);
        assert_eq!(employees[0]["role"], "employee");

        let response = app.get("/admin/employees?include_inactive=true").await;
        let body: Value = response.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 3);

        let response = app.get("/admin/employees?include_inactive=1&include_inactive=0").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("include_inactive"));
    }

    #[sqlx::test]
    async fn test_approve_and_reject_guards(pool: PgPool) {
        let app = create_test_app(pool.clone());
        let pending = create_employee(&pool, "Pending", "pending@example.com", "111111", Role::Employee, false).await;

        let response = app.post(&format!("/admin/approve/{}", pending.id)).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body, json!({"success": true, "data": {"message": "Employee approved successfully."}}));

        // Already approved
        let response = app.post(&format!("/admin/approve/{}", pending.id)).await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["error"], "Employee not found or already approved.");

        // Approved accounts cannot be rejected, and are kept
        let response = app.post(&format!("/admin/reject/{}", pending.id)).await;
        response.assert_status(StatusCode::NOT_FOUND);
        let mut conn = pool.acquire().await.unwrap();
        assert!(Employees::new(&mut conn).get_by_id(pending.id).await.unwrap().is_some());

        let response = app.post("/admin/approve/999999").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[sqlx::test]
    async fn test_reject_removes_pending_account_and_pin(pool: PgPool) {
        let app = create_test_app(pool.clone());
        let pending = create_employee(&pool, "Pending", "pending@example.com", "111111", Role::Employee, false).await;

        let response = app.post(&format!("/api/admin/reject/{}", pending.id)).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["message"], "Employee rejected and removed.");

        let mut conn = pool.acquire().await.unwrap();
        assert!(Employees::new(&mut conn).get_by_id(pending.id).await.unwrap().is_none());
        assert!(Pins::new(&mut conn).get_hash(pending.id).await.unwrap().is_none());
    }

    #[sqlx::test]
    async fn test_deactivate_and_reactivate_always_succeed(pool: PgPool) {
        let app = create_test_app(pool.clone());
        let employee = create_employee(&pool, "Ada", "ada@example.com", "123456", Role::Employee, true).await;

        for _ in 0..2 {
            let response = app.post(&format!("/admin/deactivate/{}", employee.id)).await;
            response.assert_status_ok();
            let body: Value = response.json();
            assert_eq!(body["data"]["message"], "Employee deactivated.");
        }
        let mut conn = pool.acquire().await.unwrap();
        assert!(!Employees::new(&mut conn).get_existing(employee.id).await.unwrap().is_approved);

        // A deactivated account can no longer log in
        let response = app.post("/auth/login").json(&json!({"pin": "123456"})).await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = app.post(&format!("/admin/reactivate/{}", employee.id)).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["message"], "Employee reactivated.");
        assert!(Employees::new(&mut conn).get_existing(employee.id).await.unwrap().is_approved);

        // Unknown ids are not an error either
        app.post("/admin/deactivate/999999").await.assert_status_ok();
        app.post("/admin/reactivate/999999").await.assert_status_ok();
    }

    #[sqlx::test]
    async fn test_reset_pin(pool: PgPool) {
        let app = create_test_app(pool.clone());
        let employee = create_employee(&pool, "Ada", "ada@example.com", "123456", Role::Employee, true).await;

        for body in [json!({}), json!({"newPin": "12345"}), json!({"newPin": "abcdef"}), json!({"pin": "654321"})] {
            let response = app.post(&format!("/admin/reset-pin/{}", employee.id)).json(&body).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            let body: Value = response.json();
            assert_eq!(body["error"], "New PIN must be exactly 6 digits.");
        }

        let response = app
            .post(&format!("/admin/reset-pin/{}", employee.id))
            .json(&json!({"newPin": "654321"}))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["message"], "PIN reset successfully.");

        let mut conn = pool.acquire().await.unwrap();
        let hash = Pins::new(&mut conn).get_hash(employee.id).await.unwrap().unwrap();
        assert!(verify_pin("654321", &hash));
        assert!(!verify_pin("123456", &hash));

        let response = app.post("/admin/reset-pin/999999").json(&json!({"newPin": "654321"})).await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["error"], "Employee not found.");
    }

    #[sqlx::test]
    async fn test_stats(pool: PgPool) {
        let app = create_test_app(pool.clone());
        let ada = create_employee(&pool, "Ada", "ada@example.com", "111111", Role::Employee, true).await;
        let bob = create_employee(&pool, "Bob", "bob@example.com", "222222", Role::Employee, true).await;
        create_employee(&pool, "Cy", "cy@example.com", "333333", Role::Employee, false).await;
        create_employee(&pool, "Admin", "admin@example.com", "12345678", Role::Admin, true).await;

        let today = timestamps::today().format("%Y-%m-%d").to_string();
        insert_clock_event(&pool, ada.id, ClockEventType::In, &format!("{today} 08:00:00")).await;
        insert_clock_event(&pool, ada.id, ClockEventType::Out, &format!("{today} 12:00:00")).await;
        insert_clock_event(&pool, ada.id, ClockEventType::In, &format!("{today} 13:00:00")).await;
        insert_clock_event(&pool, bob.id, ClockEventType::In, "2001-01-01 08:00:00").await;

        let response = app.get("/admin/stats").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(
            body["data"],
            json!({
                "totalEmployees": 2,
                "activeEmployees": 1,
                "pendingApprovals": 1,
                "todayClockIns": 2,
            })
        );
    }
}
