//! Common test utilities
//!
//! Fixture pages and runner wiring shared by the integration tests and the
//! cucumber suite.

#![allow(dead_code)]

use order_e2e::config::Config;
use order_e2e::driver::{ClickEffect, Driver, MockDriver, MockNode};
use order_e2e::scenario::ScenarioRunner;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const RESTAURANT_NAME: &str = "Inline Bistro Xinyi";
pub const BRANCH_ADDRESS: &str = "No. 7, Xinyi Rd. Sec. 5, Taipei";
pub const PROMPT_TEXT: &str = "Enter your address to check delivery availability";
pub const SUGGESTION: &str = "Taipei 101, Xinyi District, Taipei";

const PROMPT: &str = r#"[data-testid="GeneralIndicator"]"#;
const DELIVERY_OPTION: &str = r#"[data-cy="service-type-delivery"]"#;
const TAKEOUT_OPTION: &str = r#"[data-cy="service-type-takeout"]"#;
const ADDRESS_INPUT: &str = r#"[data-testid="address-input"]"#;

/// Order page markup with a working switcher and address picker
pub fn order_page_fixture() -> Vec<MockNode> {
    vec![
        MockNode::new("h1")
            .attr("data-cy", "branch-name-order-page")
            .text(RESTAURANT_NAME),
        MockNode::new("div")
            .attr("data-testid", "GeneralIndicator")
            .text(PROMPT_TEXT),
        MockNode::new("p")
            .attr("data-cy", "branch-address-order-page")
            .text(BRANCH_ADDRESS),
        MockNode::new("nav").id("category-navbar").text("Mains Drinks Desserts"),
        MockNode::new("button")
            .attr("data-testid", "service-type-switcher")
            .text("Delivery")
            .on_click(ClickEffect::Show(DELIVERY_OPTION.to_string()))
            .on_click(ClickEffect::Show(TAKEOUT_OPTION.to_string())),
        MockNode::new("button")
            .attr("data-cy", "service-type-delivery")
            .text("Delivery")
            .hidden()
            .on_click(ClickEffect::Show(PROMPT.to_string()))
            .on_click(ClickEffect::Hide(DELIVERY_OPTION.to_string()))
            .on_click(ClickEffect::Hide(TAKEOUT_OPTION.to_string())),
        MockNode::new("button")
            .attr("data-cy", "service-type-takeout")
            .text("Takeout")
            .hidden()
            .on_click(ClickEffect::Hide(PROMPT.to_string()))
            .on_click(ClickEffect::Hide(DELIVERY_OPTION.to_string()))
            .on_click(ClickEffect::Hide(TAKEOUT_OPTION.to_string())),
        MockNode::new("input").attr("data-testid", "address-input"),
        MockNode::new("li")
            .attr("data-cy", "address-suggestion")
            .text(SUGGESTION),
        MockNode::new("li")
            .attr("data-cy", "address-suggestion")
            .text("Taipei 101 Mall, Xinyi District, Taipei"),
        MockNode::new("button")
            .attr("data-testid", "address-confirm-button")
            .text("Confirm")
            .on_click(ClickEffect::SetText(
                PROMPT.to_string(),
                format!("Delivering to {}", SUGGESTION),
            ))
            .on_click(ClickEffect::Remove(ADDRESS_INPUT.to_string())),
    ]
}

/// Order page whose heading never renders
pub fn broken_page_fixture() -> Vec<MockNode> {
    order_page_fixture()
        .into_iter()
        .filter(|node| node.tag() != "h1")
        .collect()
}

/// Configuration with one-second waits and screenshots under `dir`
pub fn test_config(dir: &Path) -> Config {
    Config {
        default_timeout: 1,
        poll_frequency: 0.05,
        retry_times: 1,
        retry_delay: 0,
        screenshot_path: dir.join("screenshots").to_string_lossy().into_owned(),
        ..Config::default()
    }
}

/// The order page feature file
pub fn features_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/features/order_page.feature")
}

/// Runner serving a fresh mock driver per scenario.
///
/// Every driver handed out is also recorded so tests can inspect it.
pub fn mock_runner(
    page: Vec<MockNode>,
    config: Config,
) -> (ScenarioRunner, Arc<Mutex<Vec<MockDriver>>>) {
    let sessions = Arc::new(Mutex::new(Vec::new()));
    let created = sessions.clone();

    let factory = move || {
        let driver = MockDriver::new(page.clone());
        created.lock().unwrap().push(driver.clone());
        async move { Ok::<_, order_e2e::Error>(Arc::new(driver) as Arc<dyn Driver>) }
    };

    (
        ScenarioRunner::new(Arc::new(factory), Arc::new(config)),
        sessions,
    )
}
