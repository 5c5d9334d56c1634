//! Turning transport responses into envelopes.
//!
//! A non-2xx response is only trusted as a server error when its body follows
//! the error schema:
//!
//! ```json
//! { "errorCode": 42, "errorMessage": "...", "errors": [ { "errorCode": 42, "errorMessage": "..." } ] }
//! ```
//!
//! The `errors` array is mandatory. A body without it is a new, unknown error
//! shape and is reported as a parse failure rather than a generic server error.

pub mod messages;
pub mod transport;

pub use messages::{DefaultErrorMessages, ErrorMessageProvider};
pub use transport::TransportResponse;

use crate::error::ConvertError;

use common::{ErrorLocation, HttpStatusCode};
use models::{DataResult, DataSourceError, DataSourceResponse};

use std::panic::Location;
use std::sync::Arc;

use log::{error, warn};
use serde::Deserialize;
use serde_json::Value;

const ERRORS_FIELD: &str = "errors";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerErrorBody {
    errors: Vec<ServerErrorEntry>,
    #[serde(default)]
    error_code: Option<i32>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerErrorEntry {
    #[serde(default)]
    error_code: Option<i32>,
    #[serde(default, alias = "message")]
    error_message: Option<String>,
}

/// Converts [`TransportResponse`]s, never failing itself.
#[derive(Clone)]
pub struct ResponseConverter {
    messages: Arc<dyn ErrorMessageProvider>,
}

impl ResponseConverter {
    pub fn new(messages: Arc<dyn ErrorMessageProvider>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &Arc<dyn ErrorMessageProvider> {
        &self.messages
    }

    /// Three-state conversion; never yields `Loading`.
    #[track_caller]
    pub fn convert<T>(&self, response: TransportResponse<T>) -> DataResult<T> {
        match self.resolve(response) {
            Ok(data) => DataResult::Success(data),
            Err(error) => DataResult::Error(error),
        }
    }

    /// Same rules as [`ResponseConverter::convert`], two-state envelope.
    #[track_caller]
    pub fn convert_to_response<T>(&self, response: TransportResponse<T>) -> DataSourceResponse<T> {
        self.resolve(response).into()
    }

    #[track_caller]
    pub(crate) fn resolve<T>(&self, response: TransportResponse<T>) -> Result<T, DataSourceError> {
        let location = ErrorLocation::caller();
        let status = response.status;

        if status.is_success() {
            return response.body.ok_or_else(|| {
                let cause = ConvertError::MissingBody {
                    status: status.0,
                    location,
                };
                DataSourceError::internal(cause.to_string()).with_cause(cause)
            });
        }

        match self.parse_error_body(status, response.error_body.as_deref()) {
            Ok(server_error) => Err(server_error),
            Err(cause) => {
                warn!("Unreadable error body for HTTP {status}: {cause}");
                Err(DataSourceError::parse(self.messages.parse_failure()).with_cause(cause))
            }
        }
    }

    #[track_caller]
    fn parse_error_body(
        &self,
        status: HttpStatusCode,
        error_body: Option<&str>,
    ) -> Result<DataSourceError, ConvertError> {
        let location = ErrorLocation::caller();
        let text = error_body
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| self.unexpected_shape("error body is empty"))?;

        let document: Value =
            serde_json::from_str(text).map_err(|e| ConvertError::MalformedBody {
                message: e.to_string(),
                location,
                source: e,
            })?;

        if document.get(ERRORS_FIELD).is_none() {
            return Err(self.unexpected_shape("error body has no `errors` field"));
        }

        let body: ServerErrorBody =
            serde_json::from_value(document).map_err(|e| ConvertError::MalformedBody {
                message: e.to_string(),
                location,
                source: e,
            })?;

        let first = body.errors.first();
        let code = body
            .error_code
            .or_else(|| first.and_then(|entry| entry.error_code))
            .unwrap_or_else(|| status.as_error_code());
        let message = body
            .error_message
            .or_else(|| first.and_then(|entry| entry.error_message.clone()))
            .unwrap_or_else(|| self.messages.server_failure(status));

        Ok(DataSourceError::server(code, message))
    }

    #[track_caller]
    fn unexpected_shape(&self, detail: &str) -> ConvertError {
        error!("Server error object was different: {detail}");
        ConvertError::Parse {
            message: format!("{}: {detail}", self.messages.parse_failure()),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl Default for ResponseConverter {
    fn default() -> Self {
        Self::new(Arc::new(DefaultErrorMessages))
    }
}

/// Convert with the default messages.
#[track_caller]
pub fn convert<T>(response: TransportResponse<T>) -> DataResult<T> {
    ResponseConverter::default().convert(response)
}
