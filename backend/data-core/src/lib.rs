//! Offline-first repository over interchangeable data sources.
//!
//! ## Architecture
//!
//! - [`data_source`]: the `DataSource` contract and the `Entity` trait
//! - [`local`]: SQLite and in-memory stores
//! - [`remote`]: REST collections behind a connectivity guard
//! - [`convert`]: transport responses into envelopes
//! - [`repository`]: local-first reads with remote reconciliation
//! - [`error_handler`]: routing failures to the presentation layer

pub mod config;
pub mod convert;
pub mod data_source;
pub mod error;
pub mod error_handler;
pub mod local;
pub mod logger;
pub mod remote;
pub mod repository;

#[cfg(test)]
mod tests;

pub use config::{LocalConfig, RemoteConfig, RepositoryConfig};
pub use convert::{
    DefaultErrorMessages, ErrorMessageProvider, ResponseConverter, TransportResponse, convert,
};
pub use data_source::{BoundQuery, DataSource, Entity};
pub use error::CoreError;
pub use error_handler::{ErrorHandler, ErrorObserver, dispatch_error};
pub use local::{InMemoryDataSource, LocalStore, SqliteDataSource};
pub use remote::{
    AlwaysOnline, ConnectivityProbe, HttpDataSource, ManualConnectivity, NetworkGuard,
    TcpConnectivityProbe,
};
pub use repository::{Repository, ResponseStream, StoreTargets};

pub const STORE_DIRECTORY_NAME: &str = "data-core";
pub const DEFAULT_REMOTE_HOSTNAME: &str = "127.0.0.1";
pub const DEFAULT_REMOTE_PORT: &str = "8080";
pub const DEFAULT_REMOTE_BASE_URL: &str =
    const_format::concatcp!("http://", DEFAULT_REMOTE_HOSTNAME, ":", DEFAULT_REMOTE_PORT, "/");
pub const USER_AGENT: &str =
    const_format::concatcp!(STORE_DIRECTORY_NAME, "/", env!("CARGO_PKG_VERSION"));
