use std::fmt;

use crate::error::CoreError;

/// Environment variable holding the database URL (`postgres://host:port/db`).
pub const DB_URL_VAR: &str = "KINDER_DB_URL";
/// Environment variable holding the database username.
pub const DB_USER_VAR: &str = "KINDER_DB_USER";
/// Environment variable holding the database password.
pub const DB_PASSWORD_VAR: &str = "KINDER_DB_PASSWORD";

/// Database credentials loaded from the environment.
///
/// All three values are required. There are no defaults: a missing value
/// is reported before any connection attempt is made.
///
/// | Env Var              | Example                              |
/// |----------------------|--------------------------------------|
/// | `KINDER_DB_URL`      | `postgres://localhost:5432/example`  |
/// | `KINDER_DB_USER`     | `myuser`                             |
/// | `KINDER_DB_PASSWORD` | `mypass`                             |
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: String,
    pub user: String,
    pub password: String,
}

impl DbConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty (or whitespace-only) values are treated as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| -> Result<String, CoreError> {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(CoreError::MissingConfig(key))
        };

        Ok(Self {
            url: require(DB_URL_VAR)?,
            user: require(DB_USER_VAR)?,
            password: require(DB_PASSWORD_VAR)?,
        })
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}
