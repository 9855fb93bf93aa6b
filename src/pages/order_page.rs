//! Food ordering page

use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, instrument};

use crate::actions::ElementActions;
use crate::config::Config;
use crate::locator::Locator;
use crate::{Error, Result};

/// Selectors as recorded from the page
pub mod selectors {
    pub const RESTAURANT_HEADING: &str = r#"page.locator("[data-cy="branch-name-order-page"]")"#;
    pub const DELIVERY_PROMPT: &str = r#"page.locator("[data-testid=\"GeneralIndicator\"]")"#;
    pub const BRANCH_ADDRESS: &str = r#"page.locator("[data-cy=\"branch-address-order-page\"]")"#;
    pub const MENU_NAVIGATION: &str = r##"page.locator("#category-navbar")"##;
    pub const SERVICE_SWITCHER: &str = r#"page.get_by_test_id("service-type-switcher")"#;
    pub const DELIVERY_OPTION: &str = r#"page.locator("[data-cy=\"service-type-delivery\"]")"#;
    pub const TAKEOUT_OPTION: &str = r#"page.locator("[data-cy=\"service-type-takeout\"]")"#;
    pub const ADDRESS_INPUT: &str = r#"page.get_by_test_id("address-input")"#;
    pub const ADDRESS_SUGGESTION: &str = r#"page.locator("[data-cy=\"address-suggestion\"]").first"#;
    pub const ADDRESS_CONFIRM: &str = r#"page.get_by_test_id("address-confirm-button")"#;
}

/// Normalized locators of the ordering page
#[derive(Debug, Clone)]
pub struct OrderPageLocators {
    pub restaurant_heading: Locator,
    pub delivery_prompt: Locator,
    pub branch_address: Locator,
    pub menu_navigation: Locator,
    pub service_switcher: Locator,
    pub delivery_option: Locator,
    pub takeout_option: Locator,
    pub address_input: Locator,
    pub address_suggestion: Locator,
    pub address_confirm: Locator,
}

impl OrderPageLocators {
    pub fn new() -> Result<Self> {
        Ok(Self {
            restaurant_heading: Locator::parse(selectors::RESTAURANT_HEADING)?,
            delivery_prompt: Locator::parse(selectors::DELIVERY_PROMPT)?,
            branch_address: Locator::parse(selectors::BRANCH_ADDRESS)?,
            menu_navigation: Locator::parse(selectors::MENU_NAVIGATION)?,
            service_switcher: Locator::parse(selectors::SERVICE_SWITCHER)?,
            delivery_option: Locator::parse(selectors::DELIVERY_OPTION)?,
            takeout_option: Locator::parse(selectors::TAKEOUT_OPTION)?,
            address_input: Locator::parse(selectors::ADDRESS_INPUT)?,
            address_suggestion: Locator::parse(selectors::ADDRESS_SUGGESTION)?,
            address_confirm: Locator::parse(selectors::ADDRESS_CONFIRM)?,
        })
    }
}

/// Delivery / takeout selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Delivery,
    Takeout,
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceType::Delivery => f.write_str("Delivery"),
            ServiceType::Takeout => f.write_str("Takeout"),
        }
    }
}

impl FromStr for ServiceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "delivery" => Ok(ServiceType::Delivery),
            "takeout" | "take out" | "take-out" => Ok(ServiceType::Takeout),
            _ => Err(Error::assertion(format!("Unknown service type: {}", s))),
        }
    }
}

/// Food ordering page
#[derive(Debug, Clone)]
pub struct OrderPage {
    actions: ElementActions,
    locators: OrderPageLocators,
    url: String,
    address_picker_url: String,
}

impl OrderPage {
    pub fn new(actions: ElementActions, config: &Config) -> Result<Self> {
        Ok(Self {
            actions,
            locators: OrderPageLocators::new()?,
            url: config.base_url(),
            address_picker_url: config.address_picker_url(),
        })
    }

    pub fn actions(&self) -> &ElementActions {
        &self.actions
    }

    pub fn locators(&self) -> &OrderPageLocators {
        &self.locators
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    #[instrument(skip(self))]
    pub async fn open(&self) -> Result<()> {
        info!("Opening order page {}", self.url);
        self.actions.open_url(&self.url).await
    }

    /// Heading, delivery prompt and menu navigation are all visible
    #[instrument(skip(self))]
    pub async fn wait_for_page_loaded(&self) -> Result<()> {
        self.actions
            .wait_for_visible(&self.locators.restaurant_heading)
            .await?;
        self.actions
            .wait_for_visible(&self.locators.delivery_prompt)
            .await?;
        self.actions
            .wait_for_visible(&self.locators.menu_navigation)
            .await?;
        Ok(())
    }

    pub async fn restaurant_name(&self) -> Result<String> {
        self.actions
            .get_text(&self.locators.restaurant_heading)
            .await
    }

    pub async fn branch_address(&self) -> Result<String> {
        self.actions.get_text(&self.locators.branch_address).await
    }

    pub async fn is_delivery_prompt_visible(&self) -> bool {
        self.actions.is_visible(&self.locators.delivery_prompt).await
    }

    pub async fn is_menu_navigation_visible(&self) -> bool {
        self.actions.is_visible(&self.locators.menu_navigation).await
    }

    pub async fn is_switcher_visible(&self) -> bool {
        self.actions.is_visible(&self.locators.service_switcher).await
    }

    fn option(&self, service: ServiceType) -> &Locator {
        match service {
            ServiceType::Delivery => &self.locators.delivery_option,
            ServiceType::Takeout => &self.locators.takeout_option,
        }
    }

    /// Expand the switcher unless its options are already showing
    async fn expand_switcher(&self) -> Result<()> {
        if self.actions.is_clickable_now(&self.locators.delivery_option).await
            || self.actions.is_clickable_now(&self.locators.takeout_option).await
        {
            return Ok(());
        }
        debug!("Expanding service type switcher");
        self.actions.click(&self.locators.service_switcher).await
    }

    /// Both service types can be picked from the switcher
    #[instrument(skip(self))]
    pub async fn are_switcher_options_visible(&self) -> Result<bool> {
        self.expand_switcher().await?;
        Ok(self.actions.is_visible(&self.locators.delivery_option).await
            && self.actions.is_visible(&self.locators.takeout_option).await)
    }

    #[instrument(skip(self))]
    pub async fn select_service_type(&self, service: ServiceType) -> Result<()> {
        info!("Selecting service type {}", service);
        self.expand_switcher().await?;
        self.actions.click(self.option(service)).await
    }

    pub async fn is_delivery_prompt_message_visible(&self) -> bool {
        self.is_delivery_prompt_visible().await
    }

    /// The delivery prompt is gone or no longer displayed
    pub async fn is_delivery_prompt_message_hidden(&self) -> bool {
        self.actions
            .wait_for_not_clickable(&self.locators.delivery_prompt, None)
            .await
    }

    pub async fn delivery_prompt_text(&self) -> Result<String> {
        self.actions.get_text(&self.locators.delivery_prompt).await
    }

    #[instrument(skip(self))]
    pub async fn open_address_picker(&self) -> Result<()> {
        self.actions.open_url(&self.address_picker_url).await?;
        self.actions
            .wait_for_visible(&self.locators.address_input)
            .await?;
        Ok(())
    }

    /// Search for an address, take the first suggestion and confirm it.
    ///
    /// Returns the text of the chosen suggestion.
    #[instrument(skip(self))]
    pub async fn pick_address(&self, query: &str) -> Result<String> {
        self.actions
            .type_text(&self.locators.address_input, query)
            .await?;
        self.actions
            .wait_for_has_value(&self.locators.address_input, None)
            .await?;

        self.actions
            .wait_for_visible(&self.locators.address_suggestion)
            .await?;
        let suggestion = self
            .actions
            .get_text(&self.locators.address_suggestion)
            .await?;
        self.actions.click(&self.locators.address_suggestion).await?;

        self.actions
            .scroll_into_view(&self.locators.address_confirm)
            .await?;
        self.actions.click(&self.locators.address_confirm).await?;
        self.actions
            .wait_for_disappear(&self.locators.address_input, None)
            .await?;

        info!("Picked address {:?}", suggestion);
        Ok(suggestion.trim().to_string())
    }
}
