//! Reachability checks performed before any remote call.

use crate::convert::ErrorMessageProvider;
use crate::error::RemoteError;

use common::ErrorLocation;

use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::net::TcpStream;
use tokio::time::timeout;

const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_online(&self) -> bool;
}

/// Probe for environments without a notion of being offline.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

#[async_trait]
impl ConnectivityProbe for AlwaysOnline {
    async fn is_online(&self) -> bool {
        true
    }
}

/// Connectivity flag flipped from outside, e.g. by OS network callbacks.
#[derive(Debug)]
pub struct ManualConnectivity {
    online: AtomicBool,
}

impl ManualConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    pub fn set_online(&self, online: bool) {
        let previous = self.online.swap(online, Ordering::SeqCst);
        if previous != online {
            debug!("Connectivity changed: online={online}");
        }
    }
}

impl Default for ManualConnectivity {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl ConnectivityProbe for ManualConnectivity {
    async fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

/// Online when a TCP connection to `address` opens within the timeout.
#[derive(Debug, Clone)]
pub struct TcpConnectivityProbe {
    address: String,
    timeout: Duration,
}

impl TcpConnectivityProbe {
    /// `address` is a `host:port` pair.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ConnectivityProbe for TcpConnectivityProbe {
    async fn is_online(&self) -> bool {
        match timeout(self.timeout, TcpStream::connect(&self.address)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                debug!("Connectivity probe to {} failed: {e}", self.address);
                false
            }
            Err(_) => {
                debug!(
                    "Connectivity probe to {} timed out after {}ms",
                    self.address,
                    self.timeout.as_millis()
                );
                false
            }
        }
    }
}

/// Gate in front of every remote call.
#[derive(Clone)]
pub struct NetworkGuard {
    probe: Arc<dyn ConnectivityProbe>,
    messages: Arc<dyn ErrorMessageProvider>,
}

impl NetworkGuard {
    pub fn new(probe: Arc<dyn ConnectivityProbe>, messages: Arc<dyn ErrorMessageProvider>) -> Self {
        Self { probe, messages }
    }

    /// Fail with [`RemoteError::NoConnectivity`] while offline.
    pub async fn ensure_online(&self) -> Result<(), RemoteError> {
        if self.probe.is_online().await {
            return Ok(());
        }

        warn!("Remote call rejected: device is offline");
        Err(RemoteError::NoConnectivity {
            message: self.messages.no_connectivity(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
