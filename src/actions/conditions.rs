//! Element conditions
//!
//! Single-shot checks used by the polling actions. Each check resolves the
//! locator afresh and answers `Some` when its condition holds. Transient
//! lookup failures (nothing matched yet, node detached mid-check) read as
//! `None` so the caller keeps polling; anything else is a real error.

use std::sync::Arc;

use crate::driver::{Driver, ElementHandle};
use crate::locator::Locator;
use crate::Result;

pub type Handle = Arc<dyn ElementHandle>;

/// Turn a transient lookup failure into `None`
pub fn absorb<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_transient_lookup() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Locate the element a locator refers to, honouring its match index
pub async fn resolve(driver: &dyn Driver, locator: &Locator) -> Result<Option<Handle>> {
    match locator.index() {
        None => absorb(driver.find_element(locator).await),
        Some(index) => {
            let matches = absorb(driver.find_elements(locator).await)?;
            Ok(matches.and_then(|all| all.into_iter().nth(index.position())))
        }
    }
}

/// Element is in the document
pub async fn presence(driver: &dyn Driver, locator: &Locator) -> Result<Option<Handle>> {
    resolve(driver, locator).await
}

/// Element is in the document and displayed
pub async fn visibility(driver: &dyn Driver, locator: &Locator) -> Result<Option<Handle>> {
    let Some(element) = resolve(driver, locator).await? else {
        return Ok(None);
    };
    let displayed = absorb(element.is_displayed().await)?.unwrap_or(false);
    Ok(displayed.then_some(element))
}

/// Element is displayed and enabled
pub async fn clickable(driver: &dyn Driver, locator: &Locator) -> Result<Option<Handle>> {
    let Some(element) = visibility(driver, locator).await? else {
        return Ok(None);
    };
    let enabled = absorb(element.is_enabled().await)?.unwrap_or(false);
    Ok(enabled.then_some(element))
}

/// Element text contains `expected`
pub async fn text_contains(
    driver: &dyn Driver,
    locator: &Locator,
    expected: &str,
) -> Result<Option<String>> {
    let Some(element) = resolve(driver, locator).await? else {
        return Ok(None);
    };
    let text = absorb(element.text().await)?;
    Ok(text.filter(|text| text.contains(expected)))
}

/// Element carries a non-blank value
pub async fn has_value(driver: &dyn Driver, locator: &Locator) -> Result<Option<String>> {
    let Some(element) = resolve(driver, locator).await? else {
        return Ok(None);
    };
    let value = absorb(element.attribute("value").await)?.flatten();
    Ok(value.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockNode};
    use crate::Error;

    fn driver() -> MockDriver {
        MockDriver::new(vec![
            MockNode::new("li").class("option").text("Delivery"),
            MockNode::new("li").class("option").text("Takeout").hidden(),
            MockNode::new("button").id("submit").disabled(),
            MockNode::new("input").id("address").value("  "),
        ])
    }

    #[test]
    fn test_absorb() {
        assert_eq!(absorb(Ok(1)).unwrap(), Some(1));
        assert_eq!(absorb::<u8>(Err(Error::no_such_element("x"))).unwrap(), None);
        assert_eq!(absorb::<u8>(Err(Error::stale_element("x"))).unwrap(), None);
        assert!(absorb::<u8>(Err(Error::webdriver("x"))).is_err());
    }

    #[tokio::test]
    async fn test_resolve_applies_index() {
        let driver = driver();
        let second = Locator::parse("page.locator('.option').nth(1)").unwrap();
        let element = resolve(&driver, &second).await.unwrap().unwrap();
        assert_eq!(element.text().await.unwrap(), "Takeout");

        let out_of_range = Locator::parse("page.locator('.option').nth(5)").unwrap();
        assert!(resolve(&driver, &out_of_range).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_visibility_and_clickable() {
        let driver = driver();
        let takeout = Locator::parse("page.locator('.option').nth(1)").unwrap();
        assert!(presence(&driver, &takeout).await.unwrap().is_some());
        assert!(visibility(&driver, &takeout).await.unwrap().is_none());

        let submit = Locator::id("submit").unwrap();
        assert!(visibility(&driver, &submit).await.unwrap().is_some());
        assert!(clickable(&driver, &submit).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_text_and_value() {
        let driver = driver();
        let first = Locator::parse("page.locator('.option').first").unwrap();
        assert_eq!(
            text_contains(&driver, &first, "Deliv").await.unwrap().as_deref(),
            Some("Delivery")
        );
        assert!(text_contains(&driver, &first, "Take").await.unwrap().is_none());

        let address = Locator::id("address").unwrap();
        assert!(has_value(&driver, &address).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_selector_is_not_absorbed() {
        let driver = driver();
        let locator = Locator::css("ul > li").unwrap();
        assert!(presence(&driver, &locator).await.is_err());
    }
}
