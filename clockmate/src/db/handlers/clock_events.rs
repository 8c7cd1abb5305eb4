//! Database repository for clock events.

use crate::{
    db::{
        errors::{DbError, Result},
        handlers::repository::Repository,
        models::clock_events::{ClockEventCreateDBRequest, ClockEventDBResponse, ClockEventExportRow},
    },
    types::{ClockEventId, ClockEventType, EmployeeId},
};
use chrono::NaiveDate;
use sqlx::PgConnection;
use tracing::instrument;

/// Inclusive range of calendar dates, compared against the date part of event timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Filter for listing one employee's clock events
#[derive(Debug, Clone)]
pub struct ClockEventFilter {
    pub employee_id: EmployeeId,
    pub dates: Option<DateRange>,
}

impl ClockEventFilter {
    pub fn new(employee_id: EmployeeId) -> Self {
        Self { employee_id, dates: None }
    }

    pub fn with_dates(mut self, dates: Option<DateRange>) -> Self {
        self.dates = dates;
        self
    }
}

pub struct ClockEvents<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for ClockEvents<'c> {
    type CreateRequest = ClockEventCreateDBRequest;
    type Response = ClockEventDBResponse;
    type Id = ClockEventId;
    type Filter = ClockEventFilter;

    /// Insert an event and read it back, so the response reflects what was stored.
    #[instrument(skip(self, request), fields(employee_id = request.employee_id, event_type = %request.event_type), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let id = sqlx::query_scalar::<_, ClockEventId>(
            r#"
            INSERT INTO clock_events (employee_id, event_type, "timestamp")
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(request.employee_id)
        .bind(request.event_type)
        .bind(request.timestamp)
        .fetch_one(&mut *self.db)
        .await?;

        self.get_by_id(id).await?.ok_or(DbError::NotFound)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let event = sqlx::query_as::<_, ClockEventDBResponse>(
            r#"SELECT id, employee_id, event_type, "timestamp" FROM clock_events WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(event)
    }

    /// Events of one employee in chronological order.
    #[instrument(skip(self), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let events = sqlx::query_as::<_, ClockEventDBResponse>(
            r#"
            SELECT id, employee_id, event_type, "timestamp"
            FROM clock_events
            WHERE employee_id = $1
              AND ($2::date IS NULL OR CAST("timestamp" AS DATE) >= $2)
              AND ($3::date IS NULL OR CAST("timestamp" AS DATE) <= $3)
            ORDER BY "timestamp" ASC, id ASC
            "#,
        )
        .bind(filter.employee_id)
        .bind(filter.dates.map(|d| d.start))
        .bind(filter.dates.map(|d| d.end))
        .fetch_all(&mut *self.db)
        .await?;

        Ok(events)
    }
}

impl<'c> ClockEvents<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Events joined with their employee for CSV export, newest first.
    ///
    /// With `employee_id` set only that employee's events are returned.
    #[instrument(skip(self), err)]
    pub async fn export_rows(&mut self, employee_id: Option<EmployeeId>) -> Result<Vec<ClockEventExportRow>> {
        let rows = sqlx::query_as::<_, ClockEventExportRow>(
            r#"
            SELECT e.name, e.email, ce.event_type, ce."timestamp"
            FROM clock_events ce
            JOIN employees e ON e.id = ce.employee_id
            WHERE ($1::bigint IS NULL OR ce.employee_id = $1)
            ORDER BY ce."timestamp" DESC, ce.id DESC
            "#,
        )
        .bind(employee_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows)
    }

    /// Number of distinct employees with at least one event on `date`.
    #[instrument(skip(self), err)]
    pub async fn count_active_employees_on(&mut self, date: NaiveDate) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(DISTINCT employee_id) FROM clock_events WHERE CAST("timestamp" AS DATE) = $1"#,
        )
        .bind(date)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(count)
    }

    /// Number of events of one type on `date`.
    #[instrument(skip(self), err)]
    pub async fn count_events_on(&mut self, date: NaiveDate, event_type: ClockEventType) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM clock_events WHERE CAST("timestamp" AS DATE) = $1 AND event_type = $2"#,
        )
        .bind(date)
        .bind(event_type)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_employee, insert_clock_event};
    use crate::timestamps::DATETIME_FORMAT;
    use crate::types::Role;
    use chrono::NaiveDateTime;
    use sqlx::PgPool;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[sqlx::test]
    async fn test_create_reads_back_stored_row(pool: PgPool) {
        let employee = create_employee(&pool, "Ada", "ada@example.com", "123456", Role::Employee, true).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = ClockEvents::new(&mut conn);
        let event = repo
            .create(&ClockEventCreateDBRequest {
                employee_id: employee.id,
                event_type: ClockEventType::In,
                timestamp: dt("2025-03-04 08:00:00"),
            })
            .await
            .unwrap();

        assert_eq!(event.employee_id, employee.id);
        assert_eq!(event.event_type, ClockEventType::In);
        assert_eq!(event.timestamp, dt("2025-03-04 08:00:00"));
        assert_eq!(repo.get_by_id(event.id).await.unwrap(), Some(event));
    }

    #[sqlx::test]
    async fn test_create_for_unknown_employee_is_fk_violation(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let err = ClockEvents::new(&mut conn)
            .create(&ClockEventCreateDBRequest {
                employee_id: 999_999,
                event_type: ClockEventType::Out,
                timestamp: dt("2025-03-04 08:00:00"),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[sqlx::test]
    async fn test_list_orders_and_filters_by_date(pool: PgPool) {
        let ada = create_employee(&pool, "Ada", "ada@example.com", "123456", Role::Employee, true).await;
        let bob = create_employee(&pool, "Bob", "bob@example.com", "654321", Role::Employee, true).await;

        insert_clock_event(&pool, ada.id, ClockEventType::Out, "2025-03-05 17:00:00").await;
        insert_clock_event(&pool, ada.id, ClockEventType::In, "2025-03-04 08:00:00").await;
        insert_clock_event(&pool, ada.id, ClockEventType::In, "2025-03-06 23:59:59").await;
        insert_clock_event(&pool, bob.id, ClockEventType::In, "2025-03-05 09:00:00").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = ClockEvents::new(&mut conn);

        let all = repo.list(&ClockEventFilter::new(ada.id)).await.unwrap();
        let stamps: Vec<_> = all.iter().map(|e| e.timestamp).collect();
        assert_eq!(
            stamps,
            vec![
                dt("2025-03-04 08:00:00"),
                dt("2025-03-05 17:00:00"),
                dt("2025-03-06 23:59:59")
            ]
        );

        let range = DateRange {
            start: date("2025-03-05"),
            end: date("2025-03-06"),
        };
        let filtered = repo
            .list(&ClockEventFilter::new(ada.id).with_dates(Some(range)))
            .await
            .unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|e| e.employee_id == ada.id));

        let empty = repo.list(&ClockEventFilter::new(424242)).await.unwrap();
        assert!(empty.is_empty());
    }

    #[sqlx::test]
    async fn test_export_rows_newest_first(pool: PgPool) {
        let ada = create_employee(&pool, "Ada", "ada@example.com", "123456", Role::Employee, true).await;
        let bob = create_employee(&pool, "Bob", "bob@example.com", "654321", Role::Employee, true).await;

        insert_clock_event(&pool, ada.id, ClockEventType::In, "2025-03-04 08:00:00").await;
        insert_clock_event(&pool, bob.id, ClockEventType::In, "2025-03-04 09:00:00").await;
        insert_clock_event(&pool, ada.id, ClockEventType::Out, "2025-03-04 17:00:00").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = ClockEvents::new(&mut conn);

        let rows = repo.export_rows(None).await.unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Bob", "Ada"]);
        assert_eq!(rows[0].event_type, ClockEventType::Out);

        let rows = repo.export_rows(Some(bob.id)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].email, "bob@example.com");
    }

    #[sqlx::test]
    async fn test_daily_counts(pool: PgPool) {
        let ada = create_employee(&pool, "Ada", "ada@example.com", "123456", Role::Employee, true).await;
        let bob = create_employee(&pool, "Bob", "bob@example.com", "654321", Role::Employee, false).await;
        let admin = create_employee(&pool, "Root", "root@example.com", "12345678", Role::Admin, true).await;

        insert_clock_event(&pool, ada.id, ClockEventType::In, "2025-03-04 08:00:00").await;
        insert_clock_event(&pool, ada.id, ClockEventType::Out, "2025-03-04 12:00:00").await;
        insert_clock_event(&pool, ada.id, ClockEventType::In, "2025-03-04 13:00:00").await;
        insert_clock_event(&pool, bob.id, ClockEventType::In, "2025-03-04 09:00:00").await;
        insert_clock_event(&pool, admin.id, ClockEventType::In, "2025-03-04 07:00:00").await;
        insert_clock_event(&pool, ada.id, ClockEventType::In, "2025-03-05 08:00:00").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = ClockEvents::new(&mut conn);
        let day = date("2025-03-04");

        assert_eq!(repo.count_active_employees_on(day).await.unwrap(), 3);
        assert_eq!(repo.count_events_on(day, ClockEventType::In).await.unwrap(), 4);
        assert_eq!(repo.count_events_on(day, ClockEventType::Out).await.unwrap(), 1);
        assert_eq!(repo.count_active_employees_on(date("2025-01-01")).await.unwrap(), 0);
    }
}
