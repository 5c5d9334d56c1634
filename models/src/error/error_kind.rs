use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FormatResult};

/// Where a data source failure originated.
///
/// `server_error` on [`crate::DataSourceError`] says who should be told about a
/// failure; the kind says what went wrong, and survives relabelling by the
/// repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// No network path was available, the request was never attempted.
    Connectivity,
    /// The remote error body did not match the expected error schema.
    Parse,
    /// Any other failure while obtaining a response (timeout, decoding, panics).
    Internal,
    /// The remote endpoint answered with a well-formed application error.
    Server,
    /// The local store failed.
    Db,
    /// The local store holds nothing for this request yet.
    NoData,
}

impl Display for ErrorKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        let name = match self {
            ErrorKind::Connectivity => "connectivity",
            ErrorKind::Parse => "parse",
            ErrorKind::Internal => "internal",
            ErrorKind::Server => "server",
            ErrorKind::Db => "db",
            ErrorKind::NoData => "no-data",
        };
        formatter.write_str(name)
    }
}
