use common::ErrorLocation;
use models::DataSourceError;

use std::panic::Location;
use std::path::PathBuf;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum LocalStoreError {
    #[error("Store Open Error: {path}: {message} {location}")]
    Open {
        path: PathBuf,
        message: String,
        location: ErrorLocation,
        #[source]
        source: rusqlite::Error,
    },

    #[error("SQLite Error: {message} {location}")]
    Sqlite {
        message: String,
        location: ErrorLocation,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Serialization Error: {message} {location}")]
    Serialization {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid Field Error: `{field}` is not a valid field name {location}")]
    InvalidField {
        field: String,
        location: ErrorLocation,
    },

    #[error("Background Task Error: {message} {location}")]
    Task {
        message: String,
        location: ErrorLocation,
    },
}

impl From<rusqlite::Error> for LocalStoreError {
    #[track_caller]
    fn from(error: rusqlite::Error) -> Self {
        LocalStoreError::Sqlite {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: error,
        }
    }
}

impl From<serde_json::Error> for LocalStoreError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        LocalStoreError::Serialization {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<tokio::task::JoinError> for LocalStoreError {
    #[track_caller]
    fn from(error: tokio::task::JoinError) -> Self {
        LocalStoreError::Task {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<LocalStoreError> for DataSourceError {
    fn from(error: LocalStoreError) -> Self {
        DataSourceError::db(error.to_string()).with_cause(error)
    }
}
