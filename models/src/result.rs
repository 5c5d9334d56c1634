//! Three-state envelope for callers that render an in-flight state.

use crate::{DataSourceError, DataSourceResponse};

use std::fmt::{Debug, Display, Formatter, Result as FormatResult};

#[derive(Debug, Clone)]
pub enum DataResult<T> {
    Success(T),
    Error(DataSourceError),
    Loading,
}

impl<T> DataResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, DataResult::Success(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DataResult::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            DataResult::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&DataSourceError> {
        match self {
            DataResult::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Two-state view of a settled result; `None` while loading.
    pub fn into_response(self) -> Option<DataSourceResponse<T>> {
        match self {
            DataResult::Success(data) => Some(DataSourceResponse::Successful(data)),
            DataResult::Error(error) => Some(DataSourceResponse::Unsuccessful(error)),
            DataResult::Loading => None,
        }
    }
}

impl<T: Debug> Display for DataResult<T> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        match self {
            DataResult::Success(data) => write!(formatter, "Success[data={data:?}]"),
            DataResult::Error(error) => write!(formatter, "Error[exception={error}]"),
            DataResult::Loading => write!(formatter, "Loading"),
        }
    }
}
