//! Storefront library
//!
//! A product catalog browser whose data-fetch hook falls back to a locally
//! cached copy of the catalog when the device is offline. The modules are
//! exposed for the binary and for integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod fetch;
pub mod logging;
pub mod network;
pub mod terminal;
pub mod ui;

pub use data::{FetchResult, Item};
pub use fetch::{FetchError, FetchHandle, FetchOutcome, Fetcher, RacePolicy};
