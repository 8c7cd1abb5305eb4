use crate::{
    AppState,
    api::{
        csv::{employee_export_filename, export_filename, render_export},
        response::{CsvAttachment, ErrorEnvelope},
    },
    db::handlers::ClockEvents,
    errors::{Error, Result, StorageContext},
    timestamps,
    types::EmployeeId,
};
use axum::extract::{Path, State};

const EXPORT_FAILED: &str = "Export failed";

#[utoipa::path(
    get,
    path = "/admin/export",
    tag = "export",
    summary = "Download every clock event as CSV",
    responses(
        (status = 200, description = "CSV attachment, newest event first", content_type = "text/csv", body = String),
        (status = 404, description = "No clock events recorded", body = ErrorEnvelope),
        (status = 500, description = "Storage failure", body = ErrorEnvelope),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn export_all(State(state): State<AppState>) -> Result<CsvAttachment> {
    let mut conn = state.db.acquire().await.storage_context(EXPORT_FAILED)?;
    let rows = ClockEvents::new(&mut conn)
        .export_rows(None)
        .await
        .storage_context(EXPORT_FAILED)?;

    if rows.is_empty() {
        return Err(Error::not_found("No clock events to export."));
    }

    Ok(CsvAttachment {
        filename: export_filename(&timestamps::now()),
        body: render_export(&rows),
    })
}

#[utoipa::path(
    get,
    path = "/admin/export-employee/{id}",
    tag = "export",
    summary = "Download one employee's clock events as CSV",
    params(("id" = i64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "CSV attachment, newest event first", content_type = "text/csv", body = String),
        (status = 404, description = "No clock events for this employee", body = ErrorEnvelope),
        (status = 500, description = "Storage failure", body = ErrorEnvelope),
    )
)]
#[tracing::instrument(skip_all, fields(employee_id = id))]
pub async fn export_employee(State(state): State<AppState>, Path(id): Path<EmployeeId>) -> Result<CsvAttachment> {
    let mut conn = state.db.acquire().await.storage_context(EXPORT_FAILED)?;
    let rows = ClockEvents::new(&mut conn)
        .export_rows(Some(id))
        .await
        .storage_context(EXPORT_FAILED)?;

    let Some(first) = rows.first() else {
        return Err(Error::not_found("No clock events found for this employee."));
    };

    Ok(CsvAttachment {
        filename: employee_export_filename(&first.name, &timestamps::now()),
        body: render_export(&rows),
    })
}

#[cfg(test)]
mod tests {
    use crate::{
        test_utils::{create_employee, create_test_app, insert_clock_event},
        types::{ClockEventType, Role},
    };
    use axum::http::{StatusCode, header};
    use serde_json::{Value, json};
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_export_all(pool: PgPool) {
        let app = create_test_app(pool.clone());

        let response = app.get("/admin/export").await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body, json!({"success": false, "error": "No clock events to export."}));

        let ada = create_employee(&pool, "Ada Lovelace", "ada@example.com", "111111", Role::Employee, true).await;
        let bob = create_employee(&pool, "Bob", "bob@example.com", "222222", Role::Employee, true).await;
        insert_clock_event(&pool, ada.id, ClockEventType::In, "2025-03-04 08:00:00").await;
        insert_clock_event(&pool, bob.id, ClockEventType::Out, "2025-03-04 17:00:00").await;

        let response = app.get("/admin/export").await;
        response.assert_status_ok();
        assert_eq!(response.header(header::CONTENT_TYPE), "text/csv");
        let disposition = response.header(header::CONTENT_DISPOSITION);
        let disposition = disposition.to_str().unwrap();
        assert!(disposition.starts_with("attachment; filename=\"clockmate_export_"));
        assert!(disposition.ends_with(".csv\""));

        assert_eq!(
            response.text(),
            "\"Employee Name\",Email,\"Event Type\",Timestamp\n\
             Bob,bob@example.com,out,\"2025-03-04 17:00:00\"\n\
             \"Ada Lovelace\",ada@example.com,in,\"2025-03-04 08:00:00\"\n"
        );
    }

    #[sqlx::test]
    async fn test_export_employee(pool: PgPool) {
        let app = create_test_app(pool.clone());
        let ada = create_employee(&pool, "Ada Lovelace", "ada@example.com", "111111", Role::Employee, true).await;
        let bob = create_employee(&pool, "Bob", "bob@example.com", "222222", Role::Employee, true).await;
        insert_clock_event(&pool, ada.id, ClockEventType::In, "2025-03-04 08:00:00").await;
        insert_clock_event(&pool, ada.id, ClockEventType::Out, "2025-03-04 17:00:00").await;

        let response = app.get(&format!("/admin/export-employee/{}", ada.id)).await;
        response.assert_status_ok();
        let disposition = response.header(header::CONTENT_DISPOSITION);
        assert!(
            disposition
                .to_str()
                .unwrap()
                .starts_with("attachment; filename=\"Ada_Lovelace_logs_")
        );
        let text = response.text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains(",out,"));
        assert!(lines[2].contains(",in,"));

        let response = app.get(&format!("/admin/export-employee/{}", bob.id)).await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["error"], "No clock events found for this employee.");

        let response = app.post("/admin/export").await;
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    }
}
