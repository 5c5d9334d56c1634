use crate::ErrorKind;

use std::error::Error as StdError;
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::sync::Arc;

/// Error code used when no server-provided code applies.
pub const UNKNOWN_ERROR_CODE: i32 = -1;

type SharedCause = Arc<dyn StdError + Send + Sync + 'static>;

/// Failure reported by a data source or by the repository.
///
/// `server_error == true` means the remote side is at fault (or the response
/// could not be obtained from it); `false` means a local or internal failure.
/// Presentation code dispatches on that flag alone, see `data_core::dispatch_error`.
///
/// Values are built completely through the constructors below and never change
/// afterwards. The `with_*` methods consume `self` and are meant for construction.
#[derive(Debug, Clone)]
pub struct DataSourceError {
    error_code: i32,
    error_message: String,
    server_error: bool,
    kind: ErrorKind,
    cause: Option<SharedCause>,
}

impl DataSourceError {
    pub fn new(
        error_code: i32,
        error_message: impl Into<String>,
        server_error: bool,
        kind: ErrorKind,
    ) -> Self {
        Self {
            error_code,
            error_message: error_message.into(),
            server_error,
            kind,
            cause: None,
        }
    }

    /// Application error reported by the remote endpoint.
    pub fn server(error_code: i32, error_message: impl Into<String>) -> Self {
        Self::new(error_code, error_message, true, ErrorKind::Server)
    }

    pub fn internal(error_message: impl Into<String>) -> Self {
        Self::new(UNKNOWN_ERROR_CODE, error_message, false, ErrorKind::Internal)
    }

    pub fn connectivity(error_message: impl Into<String>) -> Self {
        Self::new(
            UNKNOWN_ERROR_CODE,
            error_message,
            false,
            ErrorKind::Connectivity,
        )
    }

    pub fn parse(error_message: impl Into<String>) -> Self {
        Self::new(UNKNOWN_ERROR_CODE, error_message, false, ErrorKind::Parse)
    }

    pub fn db(error_message: impl Into<String>) -> Self {
        Self::new(UNKNOWN_ERROR_CODE, error_message, false, ErrorKind::Db)
    }

    pub fn no_data(error_message: impl Into<String>) -> Self {
        Self::new(UNKNOWN_ERROR_CODE, error_message, false, ErrorKind::NoData)
    }

    /// Attach the underlying failure.
    pub fn with_cause(self, cause: impl StdError + Send + Sync + 'static) -> Self {
        self.with_shared_cause(Arc::new(cause))
    }

    pub fn with_shared_cause(mut self, cause: SharedCause) -> Self {
        self.cause = Some(cause);
        self
    }

    /// New error describing `self` from another layer's point of view.
    ///
    /// The kind is kept and `self` becomes the cause, so nothing reported by the
    /// original source is lost.
    pub fn relabel(
        &self,
        error_code: i32,
        error_message: impl Into<String>,
        server_error: bool,
    ) -> Self {
        Self::new(error_code, error_message, server_error, self.kind)
            .with_shared_cause(Arc::new(self.clone()))
    }

    pub fn error_code(&self) -> i32 {
        self.error_code
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn is_server_error(&self) -> bool {
        self.server_error
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Innermost error of the cause chain, or `self` when there is none.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }
}

impl Display for DataSourceError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(
            formatter,
            "DataSourceError[code={}, kind={}, server_error={}]: {}",
            self.error_code, self.kind, self.server_error, self.error_message
        )
    }
}

impl StdError for DataSourceError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}
