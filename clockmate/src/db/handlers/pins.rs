//! Database repository for PIN hashes.
//!
//! Each employee has at most one row here (`pins_employee_id_unique`). Only hashes are ever
//! stored; hashing happens in [`crate::auth::pin`] before these methods are called.

use crate::{db::errors::Result, types::EmployeeId};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Pins<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Pins<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Store the PIN hash of a newly created employee.
    #[instrument(skip(self, pin_hash), err)]
    pub async fn create(&mut self, employee_id: EmployeeId, pin_hash: &str) -> Result<()> {
        sqlx::query("INSERT INTO pins (employee_id, pin_hash) VALUES ($1, $2)")
            .bind(employee_id)
            .bind(pin_hash)
            .execute(&mut *self.db)
            .await?;

        Ok(())
    }

    /// Overwrite the PIN hash of an employee.
    ///
    /// Returns false if the employee has no PIN row (i.e. does not exist).
    #[instrument(skip(self, pin_hash), err)]
    pub async fn replace(&mut self, employee_id: EmployeeId, pin_hash: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE pins SET pin_hash = $2 WHERE employee_id = $1")
            .bind(employee_id)
            .bind(pin_hash)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Insert or overwrite the PIN hash of an employee.
    #[instrument(skip(self, pin_hash), err)]
    pub async fn upsert(&mut self, employee_id: EmployeeId, pin_hash: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO pins (employee_id, pin_hash) VALUES ($1, $2)
            ON CONFLICT (employee_id) DO UPDATE SET pin_hash = EXCLUDED.pin_hash
            "#,
        )
        .bind(employee_id)
        .bind(pin_hash)
        .execute(&mut *self.db)
        .await?;

        Ok(())
    }

    #[cfg(test)]
    pub async fn get_hash(&mut self, employee_id: EmployeeId) -> Result<Option<String>> {
        let hash = sqlx::query_scalar::<_, String>("SELECT pin_hash FROM pins WHERE employee_id = $1")
            .bind(employee_id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(hash)
    }
}
