//! Recipe Book Library
//!
//! The fetch core (client, cache, coalescing service) and the terminal UI state,
//! exposed for the binary and for integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod service;
pub mod ui;
