//! Shared primitives for the repository workspace.
//!
//! Everything here is free of I/O and business rules so it can be used by
//! the value types in `models` as well as the adapters in `data-core`.
//!
//! - [`ErrorLocation`]: call-site capture embedded in every error variant
//! - [`HttpStatusCode`]: status classification for remote responses
//! - [`RedactedApiKey`]: bearer token that never leaks into logs

pub mod error;
pub mod http_status;
pub mod redacted_key;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_key::RedactedApiKey;

#[cfg(test)]
mod tests;
