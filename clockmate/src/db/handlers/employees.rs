//! Database repository for employees.

use crate::{
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::employees::{EmployeeCreateDBRequest, EmployeeCredential, EmployeeDBResponse},
    },
    types::{EmployeeId, Role},
};
use sqlx::PgConnection;
use tracing::instrument;

/// Sort order on `created_at` for employee listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CreationOrder {
    #[default]
    OldestFirst,
    NewestFirst,
}

impl CreationOrder {
    fn sql(self) -> &'static str {
        match self {
            CreationOrder::OldestFirst => "ASC",
            CreationOrder::NewestFirst => "DESC",
        }
    }
}

/// Filter for listing and counting employees
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub role: Option<Role>,
    pub is_approved: Option<bool>,
    pub order: CreationOrder,
}

impl EmployeeFilter {
    /// Employee accounts waiting for approval, oldest signup first.
    pub fn pending() -> Self {
        Self {
            role: Some(Role::Employee),
            is_approved: Some(false),
            order: CreationOrder::OldestFirst,
        }
    }

    /// Employee accounts for the admin roster, newest first. Deactivated accounts are only
    /// included when asked for.
    pub fn staff(include_inactive: bool) -> Self {
        Self {
            role: Some(Role::Employee),
            is_approved: if include_inactive { None } else { Some(true) },
            order: CreationOrder::NewestFirst,
        }
    }
}

pub struct Employees<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Employees<'c> {
    type CreateRequest = EmployeeCreateDBRequest;
    type Response = EmployeeDBResponse;
    type Id = EmployeeId;
    type Filter = EmployeeFilter;

    #[instrument(skip(self, request), fields(email = %request.email, role = %request.role), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let employee = sqlx::query_as::<_, EmployeeDBResponse>(
            r#"
            INSERT INTO employees (name, email, role, is_approved, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, role, is_approved, created_at
            "#,
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(request.role)
        .bind(request.is_approved)
        .bind(request.created_at)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(employee)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let employee = sqlx::query_as::<_, EmployeeDBResponse>(
            "SELECT id, name, email, role, is_approved, created_at FROM employees WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(employee)
    }

    #[instrument(skip(self), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let direction = filter.order.sql();
        let query = format!(
            r#"
            SELECT id, name, email, role, is_approved, created_at
            FROM employees
            WHERE ($1::employee_role IS NULL OR role = $1)
              AND ($2::boolean IS NULL OR is_approved = $2)
            ORDER BY created_at {direction}, id {direction}
            "#
        );

        let employees = sqlx::query_as::<_, EmployeeDBResponse>(&query)
            .bind(filter.role)
            .bind(filter.is_approved)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(employees)
    }
}

impl<'c> Employees<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, email), err)]
    pub async fn get_by_email(&mut self, email: &str) -> Result<Option<EmployeeDBResponse>> {
        let employee = sqlx::query_as::<_, EmployeeDBResponse>(
            "SELECT id, name, email, role, is_approved, created_at FROM employees WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(employee)
    }

    /// Count employees matching the filter (ordering is ignored).
    #[instrument(skip(self), err)]
    pub async fn count(&mut self, filter: &EmployeeFilter) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM employees
            WHERE ($1::employee_role IS NULL OR role = $1)
              AND ($2::boolean IS NULL OR is_approved = $2)
            "#,
        )
        .bind(filter.role)
        .bind(filter.is_approved)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(count)
    }

    /// Approve an account that is currently unapproved.
    ///
    /// Returns false if the account does not exist or is already approved.
    #[instrument(skip(self), err)]
    pub async fn approve_pending(&mut self, id: EmployeeId) -> Result<bool> {
        let result = sqlx::query("UPDATE employees SET is_approved = TRUE WHERE id = $1 AND is_approved = FALSE")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an account that has not been approved. The PIN and any clock events go with it.
    ///
    /// Returns false if the account does not exist or is approved.
    #[instrument(skip(self), err)]
    pub async fn delete_pending(&mut self, id: EmployeeId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1 AND is_approved = FALSE")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Set the approval flag unconditionally (deactivate / reactivate).
    ///
    /// Returns whether a row with this id exists.
    #[instrument(skip(self), err)]
    pub async fn set_approved(&mut self, id: EmployeeId, approved: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE employees SET is_approved = $2 WHERE id = $1")
            .bind(id)
            .bind(approved)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All approved accounts of a role together with their PIN hashes, in id order.
    #[instrument(skip(self), err)]
    pub async fn list_credentials(&mut self, role: Role) -> Result<Vec<EmployeeCredential>> {
        let credentials = sqlx::query_as::<_, EmployeeCredential>(
            r#"
            SELECT e.id, e.name, e.email, e.role, p.pin_hash
            FROM employees e
            JOIN pins p ON e.id = p.employee_id
            WHERE e.role = $1 AND e.is_approved = TRUE
            ORDER BY e.id ASC
            "#,
        )
        .bind(role)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(credentials)
    }

    /// Like [`Repository::get_by_id`], but a missing row is an error.
    #[cfg(test)]
    pub async fn get_existing(&mut self, id: EmployeeId) -> Result<EmployeeDBResponse> {
        self.get_by_id(id).await?.ok_or(crate::db::errors::DbError::NotFound)
    }
}
