//! DAO for the `child` table.

use chrono::{Datelike, Local};
use kinder_core::types::DbId;

use crate::connection::ConnectionSource;
use crate::error::DbError;
use crate::models::child::Child;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, birth_date";

/// Latest birth year for which `year - birth year >= age` holds.
///
/// Saturates at the `i32` bounds: a threshold below every representable
/// age admits all dated children, one above every age admits none.
fn latest_birth_year(year: i32, age: i32) -> i32 {
    year.saturating_sub(age)
}

/// Provides CRUD operations for children.
pub struct ChildDao<S> {
    source: S,
}

impl<S: ConnectionSource> ChildDao<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Insert a new child, returning it with the store-assigned ID.
    ///
    /// Any `id` already set on `child` is ignored.
    pub async fn add(&self, child: &Child) -> Result<Child, DbError> {
        let mut conn = self.source.connect().await?;
        let query = format!(
            "INSERT INTO child (first_name, last_name, birth_date)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Child>(&query)
            .bind(&child.first_name)
            .bind(&child.last_name)
            .bind(child.birth_date)
            .fetch_one(&mut *conn)
            .await?;
        Ok(inserted)
    }

    /// Overwrite names and birth date of the row with `child.id`.
    ///
    /// Returns `true` if exactly one row was updated.
    pub async fn update(&self, child: &Child) -> Result<bool, DbError> {
        let Some(id) = child.id else {
            return Ok(false);
        };
        let mut conn = self.source.connect().await?;
        let result = sqlx::query(
            "UPDATE child SET first_name = $2, last_name = $3, birth_date = $4 WHERE id = $1",
        )
        .bind(id)
        .bind(&child.first_name)
        .bind(&child.last_name)
        .bind(child.birth_date)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Delete a child by ID. Returns `true` if exactly one row was removed.
    pub async fn delete(&self, id: DbId) -> Result<bool, DbError> {
        let mut conn = self.source.connect().await?;
        let result = sqlx::query("DELETE FROM child WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Children aged at least `age` this calendar year (local clock).
    pub async fn all_at_least_age(&self, age: i32) -> Result<Vec<Child>, DbError> {
        self.all_at_least_age_in(age, Local::now().year()).await
    }

    /// Children with `year - birth year >= age`. Rows without a birth date
    /// never match.
    pub async fn all_at_least_age_in(&self, age: i32, year: i32) -> Result<Vec<Child>, DbError> {
        let latest_birth_year = latest_birth_year(year, age);
        let mut conn = self.source.connect().await?;
        let query = format!(
            "SELECT {COLUMNS} FROM child
             WHERE birth_date IS NOT NULL
               AND EXTRACT(YEAR FROM birth_date)::INT <= $1
             ORDER BY id"
        );
        let rows = sqlx::query_as::<_, Child>(&query)
            .bind(latest_birth_year)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    /// Children whose birth date is unknown.
    pub async fn all_without_birth_date(&self) -> Result<Vec<Child>, DbError> {
        let mut conn = self.source.connect().await?;
        let query = format!("SELECT {COLUMNS} FROM child WHERE birth_date IS NULL ORDER BY id");
        let rows = sqlx::query_as::<_, Child>(&query)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    /// Find a child by its ID.
    pub async fn find_by_id(&self, id: DbId) -> Result<Option<Child>, DbError> {
        let mut conn = self.source.connect().await?;
        let query = format!("SELECT {COLUMNS} FROM child WHERE id = $1");
        let row = sqlx::query_as::<_, Child>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }

    /// List all children ordered by ID.
    pub async fn list(&self) -> Result<Vec<Child>, DbError> {
        let mut conn = self.source.connect().await?;
        let query = format!("SELECT {COLUMNS} FROM child ORDER BY id");
        let rows = sqlx::query_as::<_, Child>(&query)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    /// Total number of child rows.
    pub async fn count(&self) -> Result<i64, DbError> {
        let mut conn = self.source.connect().await?;
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM child")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_is_year_minus_age() {
        assert_eq!(latest_birth_year(2026, 10), 2016);
        assert_eq!(latest_birth_year(2026, 0), 2026);
    }

    #[test]
    fn extreme_ages_saturate() {
        assert_eq!(latest_birth_year(2026, i32::MIN), i32::MAX);
        assert_eq!(latest_birth_year(-2, i32::MAX), i32::MIN);
    }
}
