//! Domain records and their row mappings.
//!
//! Each record carries an `Option<DbId>` identifier that is `None` until the
//! row has been written, and a hand-written `FromRow` impl naming every
//! column it reads.

pub mod category;
pub mod child;

pub use category::Category;
pub use child::Child;
