//! Routing failures to the presentation layer.

use models::DataSourceError;

use std::error::Error as StdError;

/// Receives the failures a caller decides to surface.
pub trait ErrorHandler: Send + Sync {
    /// The remote side failed or could not be reached.
    fn handle_server_error(&self, error: &DataSourceError);

    /// A local failure that carries an underlying cause.
    fn handle_internal_error(&self, cause: &(dyn StdError + Send + Sync + 'static));

    /// Every failure, as user-facing text.
    fn handle_message(&self, message: &str);
}

/// Dispatch `error` on its `server_error` flag.
///
/// Server errors go to [`ErrorHandler::handle_server_error`]; other failures
/// go to [`ErrorHandler::handle_internal_error`] when they carry a cause. The
/// message handler is always called last.
pub fn dispatch_error(handler: &dyn ErrorHandler, error: &DataSourceError) {
    if error.is_server_error() {
        handler.handle_server_error(error);
    } else if let Some(cause) = error.cause() {
        handler.handle_internal_error(cause);
    }
    handler.handle_message(error.error_message());
}

type ServerCallback = Box<dyn Fn(&DataSourceError) + Send + Sync>;
type InternalCallback = Box<dyn Fn(&(dyn StdError + Send + Sync + 'static)) + Send + Sync>;
type MessageCallback = Box<dyn Fn(&str) + Send + Sync>;

/// [`ErrorHandler`] assembled from closures; unset callbacks do nothing.
///
/// ```ignore
/// let observer = ErrorObserver::new()
///     .on_server_error(|e| banner.show(e.error_message()))
///     .on_message(|m| log::info!("{m}"));
/// dispatch_error(&observer, &error);
/// ```
#[derive(Default)]
pub struct ErrorObserver {
    on_server_error: Option<ServerCallback>,
    on_internal_error: Option<InternalCallback>,
    on_message: Option<MessageCallback>,
}

impl ErrorObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_server_error(
        mut self,
        callback: impl Fn(&DataSourceError) + Send + Sync + 'static,
    ) -> Self {
        self.on_server_error = Some(Box::new(callback));
        self
    }

    pub fn on_internal_error(
        mut self,
        callback: impl Fn(&(dyn StdError + Send + Sync + 'static)) + Send + Sync + 'static,
    ) -> Self {
        self.on_internal_error = Some(Box::new(callback));
        self
    }

    pub fn on_message(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_message = Some(Box::new(callback));
        self
    }
}

impl ErrorHandler for ErrorObserver {
    fn handle_server_error(&self, error: &DataSourceError) {
        if let Some(callback) = &self.on_server_error {
            callback(error);
        }
    }

    fn handle_internal_error(&self, cause: &(dyn StdError + Send + Sync + 'static)) {
        if let Some(callback) = &self.on_internal_error {
            callback(cause);
        }
    }

    fn handle_message(&self, message: &str) {
        if let Some(callback) = &self.on_message {
            callback(message);
        }
    }
}
