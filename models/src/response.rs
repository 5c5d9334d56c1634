//! Two-state envelope returned by every data source call.

use crate::{DataResult, DataSourceError};

/// Either the requested value or the reason it could not be produced.
///
/// Being an enum, "successful" and "carries an error" can never disagree.
#[derive(Debug, Clone)]
pub enum DataSourceResponse<T> {
    Successful(T),
    Unsuccessful(DataSourceError),
}

impl<T> DataSourceResponse<T> {
    pub fn successful(result: T) -> Self {
        DataSourceResponse::Successful(result)
    }

    pub fn unsuccessful(error: DataSourceError) -> Self {
        DataSourceResponse::Unsuccessful(error)
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, DataSourceResponse::Successful(_))
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            DataSourceResponse::Successful(result) => Some(result),
            DataSourceResponse::Unsuccessful(_) => None,
        }
    }

    pub fn error(&self) -> Option<&DataSourceError> {
        match self {
            DataSourceResponse::Successful(_) => None,
            DataSourceResponse::Unsuccessful(error) => Some(error),
        }
    }

    pub fn into_result(self) -> Result<T, DataSourceError> {
        match self {
            DataSourceResponse::Successful(result) => Ok(result),
            DataSourceResponse::Unsuccessful(error) => Err(error),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> DataSourceResponse<U> {
        match self {
            DataSourceResponse::Successful(result) => DataSourceResponse::Successful(f(result)),
            DataSourceResponse::Unsuccessful(error) => DataSourceResponse::Unsuccessful(error),
        }
    }

    pub fn map_err(self, f: impl FnOnce(DataSourceError) -> DataSourceError) -> Self {
        match self {
            DataSourceResponse::Unsuccessful(error) => DataSourceResponse::Unsuccessful(f(error)),
            successful => successful,
        }
    }

    /// Route the envelope to exactly one of the two callbacks.
    pub fn get_result_safe(
        self,
        on_successful: impl FnOnce(T),
        on_unsuccessful: impl FnOnce(DataSourceError),
    ) {
        match self {
            DataSourceResponse::Successful(result) => on_successful(result),
            DataSourceResponse::Unsuccessful(error) => on_unsuccessful(error),
        }
    }
}

impl<T> From<Result<T, DataSourceError>> for DataSourceResponse<T> {
    fn from(result: Result<T, DataSourceError>) -> Self {
        match result {
            Ok(value) => DataSourceResponse::Successful(value),
            Err(error) => DataSourceResponse::Unsuccessful(error),
        }
    }
}

impl<T> From<DataSourceResponse<T>> for DataResult<T> {
    fn from(response: DataSourceResponse<T>) -> Self {
        match response {
            DataSourceResponse::Successful(data) => DataResult::Success(data),
            DataSourceResponse::Unsuccessful(error) => DataResult::Error(error),
        }
    }
}
