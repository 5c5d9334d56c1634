use common::ErrorLocation;
use models::DataSourceError;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RemoteError {
    #[error("No Connectivity Error: {message} {location}")]
    NoConnectivity {
        message: String,
        location: ErrorLocation,
    },

    #[error("HTTP Error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    #[error("Configuration Error: {message} {location}")]
    Configuration {
        message: String,
        location: ErrorLocation,
    },
}

impl From<url::ParseError> for RemoteError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        RemoteError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        RemoteError::Http {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        RemoteError::Json {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<RemoteError> for DataSourceError {
    fn from(error: RemoteError) -> Self {
        if let RemoteError::NoConnectivity { message, .. } = &error {
            let message = message.clone();
            return DataSourceError::connectivity(message).with_cause(error);
        }
        DataSourceError::internal(error.to_string()).with_cause(error)
    }
}
