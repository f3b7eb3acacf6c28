use kinder_core::error::CoreError;

/// Error type shared by the connection provider and the DAOs.
///
/// Database failures (constraint violations, dropped connections) are
/// passed through unmodified.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Credentials were missing or malformed. Raised before any network I/O.
    #[error(transparent)]
    Config(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
