//! Data-access layer for the kinder child/category tracker.
//!
//! - [`connection`]: the injected connection factory ([`ConnectionSource`])
//!   and the environment-configured [`ConnectionProvider`]
//! - [`script`]: statement-by-statement SQL script runner
//! - [`models`]: row records with explicit mapping
//! - [`dao`]: CRUD access objects generic over a connection source

pub mod connection;
pub mod dao;
pub mod error;
pub mod models;
pub mod script;

pub use connection::{ConnectionProvider, ConnectionSource};
pub use error::DbError;
pub use script::{ScriptError, ScriptReport, ScriptRunner};
