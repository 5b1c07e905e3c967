//! Cache module for the local background image directory
//!
//! This module provides a cache manager that downloads missing catalog images,
//! marks images that are still referenced, and evicts images nobody has wanted
//! within the retention window. Failures on individual files are logged and
//! never abort a run.

mod atomic;
mod fetch;
mod ledger;
mod manager;

pub use fetch::{FetchError, ImageFetcher};
pub use ledger::{LedgerError, WantedLedger};
pub use manager::{CacheError, CacheManager, SyncReport};
