use common::ErrorLocation;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Logger Initialization Error: {message} {location}")]
    Initialization {
        message: String,
        location: ErrorLocation,
    },
}
