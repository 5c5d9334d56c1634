//! User-facing error texts.
//!
//! Injected wherever an error message is produced so applications can supply
//! localized wording without a process-wide resource lookup.

use common::HttpStatusCode;

pub trait ErrorMessageProvider: Send + Sync {
    /// The remote error body did not follow the expected schema.
    fn parse_failure(&self) -> String;

    /// The remote error body had no usable message.
    fn server_failure(&self, status: HttpStatusCode) -> String;

    /// A remote call was rejected because the device is offline.
    fn no_connectivity(&self) -> String;

    /// The local store holds nothing for the request yet.
    fn no_cached_data(&self) -> String;

    fn local_failure(&self, detail: &str) -> String {
        format!("dbError: {detail}")
    }

    fn remote_failure(&self, detail: &str) -> String {
        format!("response obtain error: {detail}")
    }
}

/// English defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorMessages;

impl ErrorMessageProvider for DefaultErrorMessages {
    fn parse_failure(&self) -> String {
        String::from("Server error")
    }

    fn server_failure(&self, status: HttpStatusCode) -> String {
        format!("Server responded with HTTP {status}")
    }

    fn no_connectivity(&self) -> String {
        String::from("No connectivity exception")
    }

    fn no_cached_data(&self) -> String {
        String::from("no cached data")
    }
}
