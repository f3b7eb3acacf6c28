//! Child record.

use chrono::Datelike;
use kinder_core::types::{Date, DbId};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

/// A row from the `child` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Child {
    pub id: Option<DbId>,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<Date>,
}

impl Child {
    /// A child that has not been stored yet.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birth_date: Option<Date>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            birth_date,
        }
    }

    /// Age in `year`, counted as `year - birth year`. `None` without a birth date.
    pub fn age_in(&self, year: i32) -> Option<i32> {
        self.birth_date.map(|date| year - date.year())
    }
}

impl<'r> FromRow<'r, PgRow> for Child {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: Some(row.try_get("id")?),
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            birth_date: row.try_get("birth_date")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn born(y: i32, m: u32, d: u32) -> Child {
        Child::new("John", "Doe", Date::from_ymd_opt(y, m, d))
    }

    #[test]
    fn age_ignores_month_and_day() {
        assert_eq!(born(2010, 12, 31).age_in(2020), Some(10));
        assert_eq!(born(2010, 1, 1).age_in(2020), Some(10));
    }

    #[test]
    fn age_without_birth_date() {
        let child = Child::new("Jane", "Doe", None);
        assert_eq!(child.age_in(2024), None);
    }

    #[test]
    fn new_child_is_unpersisted() {
        assert_eq!(born(2012, 5, 5).id, None);
    }
}
