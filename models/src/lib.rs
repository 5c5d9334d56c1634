//! Value types shared by every data source and the repository.
//!
//! This crate contains pure data structures. Nothing here performs I/O:
//! envelopes are built by the adapters in `data-core` and handed to callers.
//!
//! ## Architecture
//!
//! - **common**: error locations, HTTP status, secrets
//! - **models** (this crate): envelopes, error values, queries
//! - **data-core**: data sources and the repository operating on these models

pub mod error;
pub mod query;
pub mod response;
pub mod result;

pub use error::data_source_error::{DataSourceError, UNKNOWN_ERROR_CODE};
pub use error::error_kind::ErrorKind;
pub use query::Query;
pub use response::DataSourceResponse;
pub use result::DataResult;

#[cfg(test)]
mod tests;
