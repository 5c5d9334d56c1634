use common::ErrorLocation;

use thiserror::Error as ThisError;

/// Failures while reading a remote error body.
#[derive(Debug, ThisError)]
pub enum ConvertError {
    /// The body is missing or lacks the `errors` field.
    #[error("Parse Error: {message} {location}")]
    Parse {
        message: String,
        location: ErrorLocation,
    },

    #[error("Malformed Error Body: {message} {location}")]
    MalformedBody {
        message: String,
        location: ErrorLocation,
        #[source]
        source: serde_json::Error,
    },

    /// A 2xx response arrived without a body to hand out.
    #[error("Missing Body Error: HTTP {status} {location}")]
    MissingBody {
        status: u16,
        location: ErrorLocation,
    },
}
