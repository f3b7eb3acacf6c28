//! Data-access objects.
//!
//! Each DAO owns a [`ConnectionSource`](crate::connection::ConnectionSource)
//! and obtains one connection per call, released before the call returns.

pub mod category_dao;
pub mod child_dao;

pub use category_dao::CategoryDao;
pub use child_dao::ChildDao;
