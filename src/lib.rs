//! Backdrop library
//!
//! Keeps a local directory of background images in sync with a fixed catalog
//! and writes the manifest the front-end reads. Shared by the `backdrop-sync`
//! and `backdrop-manifest` binaries and exposed for integration tests.

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod logging;
pub mod manifest;
