//! DAO for the `categories` table.

use kinder_core::types::DbId;

use crate::connection::ConnectionSource;
use crate::error::DbError;
use crate::models::category::Category;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, avatar, title";

/// Provides CRUD operations for categories.
pub struct CategoryDao<S> {
    source: S,
}

impl<S: ConnectionSource> CategoryDao<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Insert a category unless its title is already taken.
    ///
    /// Returns the stored row, or `None` when a category with the same
    /// title exists. The duplicate case is not an error and leaves the
    /// table untouched.
    pub async fn add(&self, category: &Category) -> Result<Option<Category>, DbError> {
        let mut conn = self.source.connect().await?;
        let query = format!(
            "INSERT INTO categories (avatar, title)
             VALUES ($1, $2)
             ON CONFLICT (title) DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Category>(&query)
            .bind(&category.avatar)
            .bind(&category.title)
            .fetch_optional(&mut *conn)
            .await?;
        if inserted.is_none() {
            tracing::debug!(title = %category.title, "Category title already exists, skipped insert");
        }
        Ok(inserted)
    }

    /// Overwrite avatar and title of the row with `category.id`.
    ///
    /// Returns `true` if exactly one row was updated. A category without an
    /// id matches nothing.
    pub async fn update(&self, category: &Category) -> Result<bool, DbError> {
        let Some(id) = category.id else {
            return Ok(false);
        };
        let mut conn = self.source.connect().await?;
        let result = sqlx::query("UPDATE categories SET avatar = $2, title = $3 WHERE id = $1")
            .bind(id)
            .bind(&category.avatar)
            .bind(&category.title)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Delete a category by ID. Returns `true` if exactly one row was removed.
    pub async fn delete(&self, id: DbId) -> Result<bool, DbError> {
        let mut conn = self.source.connect().await?;
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// All categories whose title contains `part`, ignoring case.
    ///
    /// `part` is matched literally; `%` and `_` carry no pattern meaning.
    pub async fn title_part(&self, part: &str) -> Result<Vec<Category>, DbError> {
        let mut conn = self.source.connect().await?;
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE strpos(lower(title), lower($1)) > 0
             ORDER BY id"
        );
        let rows = sqlx::query_as::<_, Category>(&query)
            .bind(part)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    /// Find a category by its ID.
    pub async fn find_by_id(&self, id: DbId) -> Result<Option<Category>, DbError> {
        let mut conn = self.source.connect().await?;
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        let row = sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }

    /// List all categories ordered by ID.
    pub async fn list(&self) -> Result<Vec<Category>, DbError> {
        let mut conn = self.source.connect().await?;
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY id");
        let rows = sqlx::query_as::<_, Category>(&query)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    /// Total number of category rows.
    pub async fn count(&self) -> Result<i64, DbError> {
        let mut conn = self.source.connect().await?;
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }
}
