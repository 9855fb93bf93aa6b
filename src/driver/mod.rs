//! # Browser driver layer
//!
//! The capability the element actions are built on: locate elements, interact
//! with them, and control the page.
//!
//! ## Module structure
//! - `traits`: the [`Driver`] and [`ElementHandle`] traits
//! - `webdriver`: WebDriver sessions through `fantoccini`
//! - `options`: browser selection and capabilities
//! - `mock`: in-memory implementation used by the test suites
//!
//! ## Example
//! ```rust,no_run
//! use order_e2e::driver::{BrowserOptions, Driver, WebDriverClient};
//! use order_e2e::locator::Locator;
//!
//! # async fn example() -> order_e2e::Result<()> {
//! let options = BrowserOptions::default();
//! let driver = WebDriverClient::connect("http://localhost:9515", &options).await?;
//! driver.navigate("https://example.com").await?;
//! let heading = driver.find_element(&Locator::parse("h1")?).await?;
//! println!("{}", heading.text().await?);
//! driver.quit().await?;
//! # Ok(())
//! # }
//! ```

pub mod traits;
pub mod options;
pub mod webdriver;
pub mod mock;


pub use mock::{ClickBehavior, ClickEffect, MockDriver, MockElement, MockNode};
pub use options::{BrowserKind, BrowserOptions};
pub use traits::{Driver, ElementHandle, ScriptArg};
pub use webdriver::{WebDriverClient, WebElement};
