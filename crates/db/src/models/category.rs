//! Category record.

use kinder_core::types::DbId;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

/// A row from the `categories` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: Option<DbId>,
    /// Base64 data URI or plain URI of the category image.
    pub avatar: Option<String>,
    /// Unique across all categories.
    pub title: String,
}

impl Category {
    /// A category that has not been stored yet.
    pub fn new(avatar: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: None,
            avatar: Some(avatar.into()),
            title: title.into(),
        }
    }

    /// A category referring to an existing row.
    pub fn with_id(id: DbId, avatar: Option<String>, title: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            avatar,
            title: title.into(),
        }
    }
}

impl<'r> FromRow<'r, PgRow> for Category {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: Some(row.try_get("id")?),
            avatar: row.try_get("avatar")?,
            title: row.try_get("title")?,
        })
    }
}
