//! Core types for askdb.

pub mod error;
pub mod record;

pub use error::{QueryError, Result};
pub use record::Record;
