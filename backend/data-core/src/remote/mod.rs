//! Network-backed data sources.

pub mod connectivity;
pub mod http;

pub use connectivity::{
    AlwaysOnline, ConnectivityProbe, ManualConnectivity, NetworkGuard, TcpConnectivityProbe,
};
pub use http::{HttpDataSource, HttpDataSourceBuilder};
