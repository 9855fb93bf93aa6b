//! Order-E2E: resilient browser end-to-end tests for the food-ordering page
//!
//! This library drives a browser over WebDriver, normalizes recorded selectors
//! into locators and runs the order page's Gherkin scenarios with wait, retry
//! and click-fallback semantics.

pub mod error;
pub mod config;
pub mod device;

pub mod locator;
pub mod driver;
pub mod actions;
pub mod pages;
pub mod scenario;

// Re-exports
pub use error::{Error, ErrorKind, Result};

/// Order-E2E library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
