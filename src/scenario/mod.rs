//! Scenario glue
//!
//! Gherkin features run through `cucumber`, one driver session per scenario
//! with guaranteed release and a screenshot of every failed scenario.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use order_e2e::config::Config;
//! use order_e2e::scenario::{ScenarioRunner, WebDriverFactory};
//!
//! # async fn example() -> order_e2e::Result<()> {
//! let config = Config::from_env()?;
//! let factory = WebDriverFactory::from_config(&config)?;
//! let runner = ScenarioRunner::new(Arc::new(factory), Arc::new(config));
//!
//! for report in runner.run("tests/features").await {
//!     println!("{}: {}", report.name, if report.passed() { "ok" } else { "FAILED" });
//! }
//! # Ok(())
//! # }
//! ```

pub mod order_page;
pub mod report;
pub mod session;

pub use order_page::{OrderWorld, ScenarioRunner};
pub use report::{capture_failure, ensure, sanitize_name, save_screenshot, ScenarioReport};
pub use session::{DriverFactory, WebDriverFactory};

/// Feature files shipped with the crate
pub const FEATURES_DIR: &str = "tests/features";
