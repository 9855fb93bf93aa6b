//! WebDriver client
//!
//! Adapts a [`fantoccini::Client`] session on chromedriver, geckodriver or
//! safaridriver to the [`Driver`] capability. One [`WebDriverClient`] owns one
//! browser session.

use async_trait::async_trait;
use bytes::Bytes;
use fantoccini::elements::Element;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::{Client, ClientBuilder};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::options::BrowserOptions;
use super::traits::{Driver, ElementHandle, ScriptArg};
use crate::locator::{Locator, Strategy};
use crate::Error;

/// Key identifying an element reference in WebDriver JSON
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

impl From<CmdError> for Error {
    fn from(err: CmdError) -> Self {
        let message = err.to_string();
        if err.is_no_such_element() {
            return Error::no_such_element(message);
        }
        match err {
            CmdError::Standard(ref wd) => map_status(&wd.error, message),
            CmdError::WaitTimeout => Error::timeout(message),
            _ => Error::webdriver(message),
        }
    }
}

/// Map a WebDriver error status onto the error the actions layer reacts to
fn map_status(status: &ErrorStatus, message: String) -> Error {
    match status {
        ErrorStatus::NoSuchElement => Error::no_such_element(message),
        ErrorStatus::StaleElementReference => Error::stale_element(message),
        ErrorStatus::ElementClickIntercepted => Error::click_intercepted(message),
        ErrorStatus::ElementNotInteractable => Error::not_interactable(message),
        ErrorStatus::JavascriptError => Error::script_execution_failed(message),
        ErrorStatus::InvalidSelector => Error::invalid_selector(message),
        ErrorStatus::Timeout | ErrorStatus::ScriptTimeout => Error::timeout(message),
        _ => Error::webdriver(message),
    }
}

/// Translate a locator into a WebDriver `(using, value)` pair.
///
/// Class names are looked up as CSS and ids as an attribute selector, so
/// only `css selector` and `xpath` reach the driver.
pub fn to_wire(locator: &Locator) -> (&'static str, String) {
    match locator.strategy() {
        Strategy::Id => ("css selector", format!("[id=\"{}\"]", css_escape(locator.value()))),
        Strategy::ClassName => ("css selector", format!(".{}", locator.value())),
        Strategy::XPath => ("xpath", locator.value().to_string()),
        Strategy::CssSelector => ("css selector", locator.value().to_string()),
    }
}

fn css_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn script_args(args: Vec<ScriptArg>) -> Vec<Value> {
    args.into_iter()
        .map(|arg| match arg {
            ScriptArg::Element(id) => json!({ ELEMENT_KEY: id }),
            ScriptArg::Value(value) => value,
        })
        .collect()
}

/// WebDriver session client
#[derive(Debug, Clone)]
pub struct WebDriverClient {
    client: Client,
}

impl WebDriverClient {
    /// Open a new session against the driver endpoint
    #[instrument(skip(options), fields(browser = %options.browser))]
    pub async fn connect(endpoint: &str, options: &BrowserOptions) -> Result<Self, Error> {
        info!("Opening WebDriver session at {}", endpoint);
        let client = ClientBuilder::native()
            .capabilities(options.capabilities())
            .connect(endpoint)
            .await
            .map_err(|e| {
                Error::webdriver(format!("failed to open a session at {}: {}", endpoint, e))
            })?;

        info!("WebDriver session opened");
        Ok(Self { client })
    }

    /// Open a session, retrying failed attempts
    pub async fn connect_with_retry(
        endpoint: &str,
        options: &BrowserOptions,
        attempts: u32,
        delay: Duration,
    ) -> Result<Self, Error> {
        let attempts = attempts.max(1);
        let mut attempt = 1;
        loop {
            match Self::connect(endpoint, options).await {
                Ok(client) => return Ok(client),
                Err(e) if attempt < attempts => {
                    warn!(
                        "WebDriver session attempt {}/{} failed: {}",
                        attempt, attempts, e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn lookup(&self, locator: &Locator) -> Result<Vec<Element>, Error> {
        let (using, value) = to_wire(locator);
        debug!("Finding elements ({}, {})", using, value);
        let elements = match using {
            "xpath" => self.client.find_all(fantoccini::Locator::XPath(&value)).await?,
            _ => self.client.find_all(fantoccini::Locator::Css(&value)).await?,
        };
        Ok(elements)
    }
}

#[async_trait]
impl Driver for WebDriverClient {
    async fn find_element(&self, locator: &Locator) -> Result<Arc<dyn ElementHandle>, Error> {
        let (using, value) = to_wire(locator);
        let element = match using {
            "xpath" => self.client.find(fantoccini::Locator::XPath(&value)).await?,
            _ => self.client.find(fantoccini::Locator::Css(&value)).await?,
        };
        Ok(Arc::new(WebElement::new(element)))
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<Arc<dyn ElementHandle>>, Error> {
        Ok(self
            .lookup(locator)
            .await?
            .into_iter()
            .map(|element| Arc::new(WebElement::new(element)) as Arc<dyn ElementHandle>)
            .collect())
    }

    async fn navigate(&self, url: &str) -> Result<(), Error> {
        info!("Navigating to {}", url);
        self.client.goto(url).await?;
        Ok(())
    }

    async fn refresh(&self) -> Result<(), Error> {
        self.client.refresh().await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, Error> {
        Ok(self.client.current_url().await?.to_string())
    }

    async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> Result<Value, Error> {
        Ok(self.client.execute(script, script_args(args)).await?)
    }

    async fn screenshot(&self) -> Result<Bytes, Error> {
        let png = self.client.screenshot().await?;
        Ok(Bytes::from(png))
    }

    async fn set_window_size(&self, width: u32, height: u32) -> Result<(), Error> {
        self.client.set_window_size(width, height).await?;
        Ok(())
    }

    async fn quit(&self) -> Result<(), Error> {
        info!("Closing WebDriver session");
        self.client.clone().close().await?;
        Ok(())
    }
}

/// Element located through a WebDriver session
#[derive(Debug)]
pub struct WebElement {
    element: Element,
    id: String,
}

impl WebElement {
    fn new(element: Element) -> Self {
        let id = element.element_id().to_string();
        Self { element, id }
    }
}

#[async_trait]
impl ElementHandle for WebElement {
    fn id(&self) -> &str {
        &self.id
    }

    async fn click(&self) -> Result<(), Error> {
        self.element.click().await?;
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<(), Error> {
        self.element.send_keys(text).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        self.element.clear().await?;
        Ok(())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, Error> {
        // The live property tracks typed input; the attribute only holds the markup value
        let value = match name {
            "value" | "checked" => self.element.prop(name).await?,
            _ => self.element.attr(name).await?,
        };
        Ok(value)
    }

    async fn text(&self) -> Result<String, Error> {
        Ok(self.element.text().await?)
    }

    async fn is_enabled(&self) -> Result<bool, Error> {
        Ok(self.element.is_enabled().await?)
    }

    async fn is_displayed(&self) -> Result<bool, Error> {
        Ok(self.element.is_displayed().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_to_wire() {
        let id = Locator::id("category-navbar").unwrap();
        assert_eq!(
            to_wire(&id),
            ("css selector", "[id=\"category-navbar\"]".to_string())
        );

        let class = Locator::class_name("menu").unwrap();
        assert_eq!(to_wire(&class), ("css selector", ".menu".to_string()));

        let xpath = Locator::xpath("//a").unwrap();
        assert_eq!(to_wire(&xpath), ("xpath", "//a".to_string()));
    }

    #[test]
    fn test_map_status_lookup_errors_are_transient() {
        let err = map_status(&ErrorStatus::NoSuchElement, "nothing here".to_string());
        assert!(err.is_transient_lookup());
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = map_status(&ErrorStatus::StaleElementReference, "detached".to_string());
        assert!(matches!(err, Error::StaleElement(_)));
        assert!(err.is_transient_lookup());
    }

    #[test]
    fn test_map_status_click_failures_trigger_fallback() {
        let err = map_status(&ErrorStatus::ElementClickIntercepted, "overlay".to_string());
        assert!(matches!(err, Error::ClickIntercepted(_)));
        assert!(err.is_click_fallback_trigger());

        let err = map_status(&ErrorStatus::ElementNotInteractable, "zero size".to_string());
        assert!(matches!(err, Error::NotInteractable(_)));
        assert!(err.is_click_fallback_trigger());
    }

    #[test]
    fn test_map_status_other_errors() {
        let err = map_status(&ErrorStatus::JavascriptError, "boom".to_string());
        assert!(matches!(err, Error::ScriptExecutionFailed(_)));

        let err = map_status(&ErrorStatus::InvalidSelector, "bad".to_string());
        assert_eq!(err.kind(), ErrorKind::InvalidSelector);

        let err = map_status(&ErrorStatus::ScriptTimeout, "slow".to_string());
        assert_eq!(err.kind(), ErrorKind::Timeout);

        let err = map_status(&ErrorStatus::UnknownCommand, "nope".to_string());
        assert_eq!(err.kind(), ErrorKind::Driver);
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_wait_timeout_maps_to_timeout() {
        let err: Error = CmdError::WaitTimeout.into();
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn test_script_args() {
        let args = script_args(vec![
            ScriptArg::Element("abc".to_string()),
            ScriptArg::Value(json!(true)),
        ]);
        assert_eq!(args, vec![json!({ ELEMENT_KEY: "abc" }), json!(true)]);
    }
}
