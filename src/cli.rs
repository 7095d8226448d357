//! Command-line interface parsing for the storefront
//!
//! This module handles parsing of CLI arguments using clap and turns them into a
//! validated `StartupConfig`, which in turn knows how to assemble the fetcher's
//! collaborators (probe, store and transport).

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use thiserror::Error;
use url::Url;

use crate::cache::{FileStore, KeyValueStore, MemoryStore};
use crate::data::{HttpTransport, DEFAULT_CATALOG_URL};
use crate::fetch::{Fetcher, RacePolicy};
use crate::network::{
    validate_probe_addr, NetworkProbe, StaticProbe, TcpProbe, DEFAULT_PROBE_ADDR,
};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The catalog URL could not be parsed
    #[error("Invalid catalog URL '{0}': {1}")]
    InvalidUrl(String, url::ParseError),

    /// The catalog URL uses a scheme other than http/https
    #[error("Unsupported URL scheme '{0}': expected http or https")]
    UnsupportedScheme(String),

    /// The probe address is not `host:port`
    #[error("Invalid probe address: '{0}'. Expected host:port, e.g. 1.1.1.1:53")]
    InvalidProbeAddr(String),
}

/// Storefront - browse a remote product catalog, with offline fallback
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(about = "Browse a product catalog in the terminal, with offline fallback")]
#[command(version)]
pub struct Cli {
    /// Catalog endpoint returning a JSON array of products
    #[arg(long, value_name = "URL", default_value = DEFAULT_CATALOG_URL)]
    pub url: String,

    /// Treat the device as offline and serve the cached catalog
    #[arg(long)]
    pub offline: bool,

    /// Address probed to decide whether the device is online
    #[arg(long, value_name = "HOST:PORT", default_value = DEFAULT_PROBE_ADDR)]
    pub probe_addr: String,

    /// Directory for the cached catalog (default: XDG cache dir)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Ignore responses from requests superseded by a newer one
    #[arg(long)]
    pub drop_stale: bool,

    /// Fetch once, print the result as JSON and exit (no TUI)
    #[arg(long)]
    pub dump: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Validated catalog URL
    pub url: String,
    /// Skip probing and behave as offline
    pub offline: bool,
    /// Address for the TCP connectivity probe
    pub probe_addr: String,
    /// Custom cache directory, if any
    pub cache_dir: Option<PathBuf>,
    /// How overlapping runs are reconciled
    pub race_policy: RacePolicy,
    /// One-shot JSON mode
    pub dump: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CATALOG_URL.to_string(),
            offline: false,
            probe_addr: DEFAULT_PROBE_ADDR.to_string(),
            cache_dir: None,
            race_policy: RacePolicy::LastCompleted,
            dump: false,
        }
    }
}

/// Validates a catalog URL argument
///
/// # Returns
/// * `Ok(String)` with the URL as given, if it parses and uses http or https
/// * `Err(CliError)` otherwise
pub fn parse_catalog_url(s: &str) -> Result<String, CliError> {
    let parsed = Url::parse(s).map_err(|e| CliError::InvalidUrl(s.to_string(), e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(s.to_string()),
        other => Err(CliError::UnsupportedScheme(other.to_string())),
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if the URL or probe address is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let url = parse_catalog_url(&cli.url)?;
        validate_probe_addr(&cli.probe_addr)
            .map_err(|_| CliError::InvalidProbeAddr(cli.probe_addr.clone()))?;

        let race_policy = if cli.drop_stale {
            RacePolicy::LatestRequest
        } else {
            RacePolicy::LastCompleted
        };

        Ok(StartupConfig {
            url,
            offline: cli.offline,
            probe_addr: cli.probe_addr.clone(),
            cache_dir: cli.cache_dir.clone(),
            race_policy,
            dump: cli.dump,
        })
    }

    /// Assembles the fetcher described by this configuration
    ///
    /// Falls back to an in-memory store when no cache directory can be found,
    /// which means nothing survives a restart.
    pub fn build_fetcher(&self) -> Fetcher {
        let probe: Arc<dyn NetworkProbe> = if self.offline {
            Arc::new(StaticProbe(false))
        } else {
            Arc::new(TcpProbe::new(self.probe_addr.clone()))
        };

        let store: Arc<dyn KeyValueStore> = match self
            .cache_dir
            .clone()
            .map(FileStore::with_dir)
            .or_else(FileStore::new)
        {
            Some(store) => Arc::new(store),
            None => {
                tracing::warn!("no cache directory available, cache will not persist");
                Arc::new(MemoryStore::new())
            }
        };

        Fetcher::from_shared(probe, store, Arc::new(HttpTransport::new()))
    }
}
