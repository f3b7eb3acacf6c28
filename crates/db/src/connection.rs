//! Connection acquisition.
//!
//! DAOs never open connections on their own; they are handed a
//! [`ConnectionSource`] at construction time. Production code uses
//! [`ConnectionProvider`], which opens a fresh connection per call from
//! environment credentials. Tests hand in a [`PgPool`] instead.

use std::future::Future;
use std::ops::DerefMut;
use std::str::FromStr;

use kinder_core::config::{DbConfig, DB_URL_VAR};
use kinder_core::error::CoreError;
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection, PgPool, Postgres};

use crate::error::DbError;

/// Anything that can hand out a live PostgreSQL connection.
///
/// The returned handle is released when dropped, so a connection never
/// outlives the operation that acquired it.
pub trait ConnectionSource: Send + Sync {
    /// Owned connection handle.
    type Connection: DerefMut<Target = PgConnection> + Send;

    /// Obtain a connection for the duration of one operation.
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, DbError>> + Send;
}

/// Opens one new, unpooled connection per [`connect`](ConnectionSource::connect) call.
#[derive(Debug, Clone)]
pub struct ConnectionProvider {
    config: DbConfig,
}

impl ConnectionProvider {
    pub fn new(config: DbConfig) -> Self {
        Self { config }
    }

    /// Build a provider from `KINDER_DB_URL`, `KINDER_DB_USER` and
    /// `KINDER_DB_PASSWORD`. Fails if any of them is absent.
    pub fn from_env() -> Result<Self, DbError> {
        Ok(Self::new(DbConfig::from_env()?))
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Parse the configured URL and apply the credentials on top of it.
    fn connect_options(&self) -> Result<PgConnectOptions, DbError> {
        let options = PgConnectOptions::from_str(&self.config.url)
            .map_err(|e| CoreError::InvalidConfig(format!("{DB_URL_VAR}: {e}")))?;
        Ok(options
            .username(&self.config.user)
            .password(&self.config.password))
    }
}

impl ConnectionSource for ConnectionProvider {
    type Connection = Box<PgConnection>;

    async fn connect(&self) -> Result<Self::Connection, DbError> {
        let options = self.connect_options()?;
        let conn = PgConnection::connect_with(&options).await?;
        tracing::debug!(user = %self.config.user, "Opened database connection");
        Ok(Box::new(conn))
    }
}

impl ConnectionSource for PgPool {
    type Connection = PoolConnection<Postgres>;

    async fn connect(&self) -> Result<Self::Connection, DbError> {
        Ok(self.acquire().await?)
    }
}
