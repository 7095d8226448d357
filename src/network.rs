//! Network-state probe
//!
//! Answers a single question for the fetch hook: does the device currently have
//! connectivity? `TcpProbe` attempts a TCP connection to a well-known address;
//! `StaticProbe` returns a fixed answer and backs `--offline` and tests.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;

/// Default address probed for connectivity (Cloudflare DNS)
pub const DEFAULT_PROBE_ADDR: &str = "1.1.1.1:53";

/// How long a probe connection may take before the device is considered offline
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Errors raised by a probe that cannot answer at all
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The configured probe address is not a valid `host:port`
    #[error("Invalid probe address: '{0}'")]
    InvalidAddress(String),
}

/// Reports whether the device is connected
#[async_trait]
pub trait NetworkProbe: Send + Sync {
    async fn is_connected(&self) -> Result<bool, ProbeError>;
}

/// Probe that always returns the same answer
#[derive(Debug, Clone, Copy)]
pub struct StaticProbe(pub bool);

#[async_trait]
impl NetworkProbe for StaticProbe {
    async fn is_connected(&self) -> Result<bool, ProbeError> {
        Ok(self.0)
    }
}

/// Probe that attempts a TCP connection to `addr`
///
/// A refused or timed-out connection means "offline"; only a malformed
/// address is an error.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    addr: String,
    timeout: Duration,
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_ADDR)
    }
}

impl TcpProbe {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: PROBE_TIMEOUT,
        }
    }

    /// Overrides the connect timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Address this probe connects to
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

/// Checks that `addr` has the `host:port` shape with a numeric port
pub fn validate_probe_addr(addr: &str) -> Result<(), ProbeError> {
    let invalid = || ProbeError::InvalidAddress(addr.to_string());
    let (host, port) = addr.rsplit_once(':').ok_or_else(invalid)?;
    if host.is_empty() || port.parse::<u16>().is_err() {
        return Err(invalid());
    }
    Ok(())
}

#[async_trait]
impl NetworkProbe for TcpProbe {
    async fn is_connected(&self) -> Result<bool, ProbeError> {
        validate_probe_addr(&self.addr)?;

        let connected = matches!(
            tokio::time::timeout(self.timeout, TcpStream::connect(self.addr.as_str())).await,
            Ok(Ok(_))
        );
        tracing::debug!(addr = %self.addr, connected, "network probe");
        Ok(connected)
    }
}
