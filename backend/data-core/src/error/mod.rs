pub mod config;
pub mod convert;
pub mod local_store;
pub mod logger;
pub mod remote;

pub use config::ConfigError;
pub use convert::ConvertError;
pub use local_store::LocalStoreError;
pub use logger::LoggerError;
pub use remote::RemoteError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    LocalStore(#[from] LocalStoreError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logger(#[from] LoggerError),
}
