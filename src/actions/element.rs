//! Resilient element actions
//!
//! Wait-aware operations on top of the raw [`Driver`] primitives. Queries
//! (`is_*`, `verify_visible`, `wait_for_clickable`) answer with a boolean and
//! never fail; assertions and imperative actions fail with an [`Error`] whose
//! message names the locator and the timeout involved.

use std::fmt;
use std::sync::Arc;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::conditions::{self, absorb, Handle};
use super::wait::{WaitPolicy, Waiter};
use crate::driver::{Driver, ScriptArg};
use crate::locator::Locator;
use crate::{Error, Result};

const SCRIPT_CLICK: &str = "arguments[0].click();";
const SCRIPT_SCROLL_INTO_VIEW: &str = "arguments[0].scrollIntoView(arguments[1]);";

/// Element actions bound to one driver session
#[derive(Debug, Clone)]
pub struct ElementActions {
    driver: Arc<dyn Driver>,
    policy: WaitPolicy,
}

impl ElementActions {
    pub fn new(driver: Arc<dyn Driver>, policy: WaitPolicy) -> Self {
        Self { driver, policy }
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    pub fn policy(&self) -> &WaitPolicy {
        &self.policy
    }

    fn waiter(&self, timeout: Option<Duration>) -> Waiter {
        self.policy.waiter(timeout)
    }

    /// Navigate to a URL
    #[instrument(skip(self))]
    pub async fn open_url(&self, url: &str) -> Result<()> {
        self.driver.navigate(url).await
    }

    /// Wait until the element is present in the document
    #[instrument(skip(self, locator), fields(locator = %locator))]
    pub async fn find(&self, locator: &Locator) -> Result<Handle> {
        let waiter = self.waiter(None);
        let driver = self.driver.as_ref();

        waiter
            .until(|| conditions::presence(driver, locator))
            .await?
            .ok_or_else(|| {
                Error::element_not_found(format!(
                    "Element not found within {:?}: {}",
                    waiter.timeout(),
                    locator
                ))
            })
    }

    /// Whether the element becomes visible within the default timeout
    #[instrument(skip(self, locator), fields(locator = %locator))]
    pub async fn is_visible(&self, locator: &Locator) -> bool {
        let driver = self.driver.as_ref();
        match self
            .waiter(None)
            .until(|| conditions::visibility(driver, locator))
            .await
        {
            Ok(found) => found.is_some(),
            Err(e) => {
                debug!("Visibility check for {} failed: {}", locator, e);
                false
            }
        }
    }

    /// Click once the element is clickable, falling back to a script click
    /// when the native click cannot be delivered
    #[instrument(skip(self, locator), fields(locator = %locator))]
    pub async fn click(&self, locator: &Locator) -> Result<()> {
        let waiter = self.waiter(None);
        let driver = self.driver.as_ref();

        let native = match waiter.until(|| conditions::clickable(driver, locator)).await? {
            Some(element) => element.click().await,
            None => Err(Error::timeout(format!(
                "Element not clickable within {:?}: {}",
                waiter.timeout(),
                locator
            ))),
        };

        match native {
            Ok(()) => Ok(()),
            Err(e) if e.is_click_fallback_trigger() => {
                debug!("Native click on {} failed ({}), using script click", locator, e);
                let element = conditions::resolve(driver, locator).await?.ok_or_else(|| {
                    Error::element_not_found(format!("Element not found for script click: {}", locator))
                })?;
                self.driver
                    .execute_script(SCRIPT_CLICK, vec![ScriptArg::element(element.as_ref())])
                    .await?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Click the element if it becomes visible; `true` if a click was made
    #[instrument(skip(self, locator), fields(locator = %locator))]
    pub async fn click_if_exists(&self, locator: &Locator) -> Result<bool> {
        if self.is_visible(locator).await {
            self.click(locator).await?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Replace the element's value with `text`.
    ///
    /// A non-empty field is cleared first and re-cleared until it reads empty;
    /// a field that never clears is logged and typed into anyway.
    #[instrument(skip(self, locator, text), fields(locator = %locator))]
    pub async fn type_text<T: fmt::Display>(&self, locator: &Locator, text: T) -> Result<()> {
        let element = self.find(locator).await?;
        let current = element.attribute("value").await?.unwrap_or_default();

        if !current.is_empty() {
            element.clear().await?;

            let mut attempts = 0;
            while attempts < self.policy.clear_attempts {
                let value = element.attribute("value").await?.unwrap_or_default();
                if value.trim().is_empty() {
                    break;
                }
                element.clear().await?;
                attempts += 1;
                tokio::time::sleep(self.policy.clear_retry_delay).await;
            }

            if attempts == self.policy.clear_attempts {
                let remaining = element.attribute("value").await?.unwrap_or_default();
                if !remaining.trim().is_empty() {
                    warn!(
                        "Unable to clear field {}, current value: {:?}",
                        locator, remaining
                    );
                }
            }
        }

        let text = text.to_string();
        debug!("Typing {} characters into {}", text.chars().count(), locator);
        element.send_keys(&text).await
    }

    /// Rendered text of the element
    #[instrument(skip(self, locator), fields(locator = %locator))]
    pub async fn get_text(&self, locator: &Locator) -> Result<String> {
        self.find(locator).await?.text().await
    }

    /// Attribute (or live `value` / `checked` property) of the element
    #[instrument(skip(self, locator), fields(locator = %locator))]
    pub async fn get_attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>> {
        self.find(locator).await?.attribute(name).await
    }

    async fn visible_within(&self, locator: &Locator, timeout: Option<Duration>) -> Result<Handle> {
        let waiter = self.waiter(timeout);
        let driver = self.driver.as_ref();

        waiter
            .until(|| conditions::visibility(driver, locator))
            .await?
            .ok_or_else(|| {
                Error::element_not_visible(format!(
                    "Element not found or not visible within {:?}: {}",
                    waiter.timeout(),
                    locator
                ))
            })
    }

    /// Wait until the element is visible, failing with `NotVisible`
    #[instrument(skip(self, locator), fields(locator = %locator))]
    pub async fn wait_for_visible(&self, locator: &Locator) -> Result<Handle> {
        self.visible_within(locator, None).await
    }

    /// Whether the element becomes clickable in time
    #[instrument(skip(self, locator), fields(locator = %locator))]
    pub async fn wait_for_clickable(&self, locator: &Locator, timeout: Option<Duration>) -> bool {
        let driver = self.driver.as_ref();
        match self
            .waiter(timeout)
            .until(|| conditions::clickable(driver, locator))
            .await
        {
            Ok(found) => found.is_some(),
            Err(e) => {
                debug!("Clickable check for {} failed: {}", locator, e);
                false
            }
        }
    }

    /// Whether the element stops being clickable in time
    #[instrument(skip(self, locator), fields(locator = %locator))]
    pub async fn wait_for_not_clickable(&self, locator: &Locator, timeout: Option<Duration>) -> bool {
        let driver = self.driver.as_ref();
        match self
            .waiter(timeout)
            .until_not(|| conditions::clickable(driver, locator))
            .await
        {
            Ok(released) => released,
            Err(e) => {
                debug!("Not-clickable check for {} failed: {}", locator, e);
                false
            }
        }
    }

    /// Immediate check: present, enabled and displayed
    pub async fn is_clickable_now(&self, locator: &Locator) -> bool {
        let element = match conditions::resolve(self.driver.as_ref(), locator).await {
            Ok(Some(element)) => element,
            _ => return false,
        };
        matches!(element.is_enabled().await, Ok(true))
            && matches!(element.is_displayed().await, Ok(true))
    }

    /// Fail unless the element exists and is (or becomes) not clickable
    #[instrument(skip(self, locator), fields(locator = %locator))]
    pub async fn assert_not_clickable(&self, locator: &Locator, timeout: Option<Duration>) -> Result<()> {
        let element = self.find(locator).await?;
        let timeout = self.policy.timeout_or(timeout);

        if !self.wait_for_not_clickable(locator, Some(timeout)).await {
            return Err(Error::assertion(format!(
                "Element is still clickable after {:?}: {}",
                timeout, locator
            )));
        }

        // An enabled element may only be covered; confirm it really is not clickable
        let enabled = absorb(element.is_enabled().await)?.unwrap_or(false);
        if enabled && self.is_clickable_now(locator).await {
            return Err(Error::assertion(format!(
                "Element exists but should not be clickable: {}",
                locator
            )));
        }

        Ok(())
    }

    /// Fail unless the element becomes clickable in time
    #[instrument(skip(self, locator), fields(locator = %locator))]
    pub async fn assert_clickable(&self, locator: &Locator, timeout: Option<Duration>) -> Result<()> {
        let timeout = self.policy.timeout_or(timeout);
        if !self.wait_for_clickable(locator, Some(timeout)).await {
            return Err(Error::assertion(format!(
                "Element is not clickable within {:?}: {}",
                timeout, locator
            )));
        }
        Ok(())
    }

    /// Fine-grained wait for presence only
    #[instrument(skip(self, locator), fields(locator = %locator))]
    pub async fn wait_for_present(&self, locator: &Locator, timeout: Option<Duration>) -> Result<()> {
        let waiter = self.waiter(timeout).every(self.policy.presence_poll_interval);
        let driver = self.driver.as_ref();

        match waiter.until(|| conditions::presence(driver, locator)).await? {
            Some(_) => Ok(()),
            None => Err(Error::timeout(format!(
                "Element not present within {:?}: {}",
                waiter.timeout(),
                locator
            ))),
        }
    }

    /// Whether the element's text equals `expected`
    pub async fn verify_text(&self, locator: &Locator, expected: &str) -> Result<bool> {
        Ok(self.get_text(locator).await? == expected)
    }

    pub async fn verify_visible(&self, locator: &Locator) -> bool {
        self.is_visible(locator).await
    }

    pub async fn verify_clickable(&self, locator: &Locator, timeout: Option<Duration>) -> bool {
        self.wait_for_clickable(locator, timeout).await
    }

    /// Scroll the element into view and return it
    #[instrument(skip(self, locator), fields(locator = %locator))]
    pub async fn scroll_into_view(&self, locator: &Locator) -> Result<Handle> {
        let element = self.find(locator).await?;
        self.driver
            .execute_script(
                SCRIPT_SCROLL_INTO_VIEW,
                // align the element's top with the top of the viewport
                vec![
                    ScriptArg::element(element.as_ref()),
                    ScriptArg::Value(Value::Bool(true)),
                ],
            )
            .await?;
        Ok(element)
    }

    /// Wait until nothing matches the locator
    #[instrument(skip(self, locator), fields(locator = %locator))]
    pub async fn wait_for_disappear(&self, locator: &Locator, timeout: Option<Duration>) -> Result<()> {
        let waiter = self.waiter(timeout);
        let driver = self.driver.as_ref();

        if !waiter.until_not(|| conditions::presence(driver, locator)).await? {
            return Err(Error::assertion(format!(
                "Element did not disappear within {:?}: {}",
                waiter.timeout(),
                locator
            )));
        }
        Ok(())
    }

    /// Wait until the element's text contains `expected`
    #[instrument(skip(self, locator), fields(locator = %locator))]
    pub async fn wait_for_text_contains(
        &self,
        locator: &Locator,
        expected: &str,
        timeout: Option<Duration>,
    ) -> Result<()> {
        let waiter = self.waiter(timeout);
        let driver = self.driver.as_ref();

        match waiter
            .until(|| conditions::text_contains(driver, locator, expected))
            .await?
        {
            Some(_) => Ok(()),
            None => Err(Error::assertion(format!(
                "Element text does not contain {:?} within {:?}: {}",
                expected,
                waiter.timeout(),
                locator
            ))),
        }
    }

    /// Wait until the element's text no longer contains `unexpected`
    #[instrument(skip(self, locator), fields(locator = %locator))]
    pub async fn wait_for_text_not_contains(
        &self,
        locator: &Locator,
        unexpected: &str,
        timeout: Option<Duration>,
    ) -> Result<()> {
        let waiter = self.waiter(timeout);
        let driver = self.driver.as_ref();

        if !waiter
            .until_not(|| conditions::text_contains(driver, locator, unexpected))
            .await?
        {
            return Err(Error::assertion(format!(
                "Element text still contains {:?} after {:?}: {}",
                unexpected,
                waiter.timeout(),
                locator
            )));
        }
        Ok(())
    }

    /// Reload the page
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        info!("Refreshing page");
        self.driver.refresh().await
    }

    /// Reload the page and wait for the element to be visible again
    #[instrument(skip(self, locator), fields(locator = %locator))]
    pub async fn refresh_and_wait_for_visible(
        &self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> Result<Handle> {
        self.refresh().await?;
        self.visible_within(locator, timeout).await
    }

    /// Wait for a visible element to carry a non-blank value
    #[instrument(skip(self, locator), fields(locator = %locator))]
    pub async fn wait_for_has_value(&self, locator: &Locator, timeout: Option<Duration>) -> Result<String> {
        self.wait_for_visible(locator).await?;

        let waiter = self.waiter(timeout).every(self.policy.value_poll_interval);
        let driver = self.driver.as_ref();

        waiter
            .until(|| conditions::has_value(driver, locator))
            .await?
            .ok_or_else(|| {
                Error::timeout(format!(
                    "Element did not get a value within {:?}: {}",
                    waiter.timeout(),
                    locator
                ))
            })
    }
}
