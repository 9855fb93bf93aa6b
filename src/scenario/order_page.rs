//! Order page feature
//!
//! Step definitions for `order_page.feature` and the runner executing feature
//! files with one driver session per scenario. The session opens in the
//! `before` hook; the `after` hook screenshots a failed scenario and always
//! quits the session.

use cucumber::event::ScenarioFinished;
use cucumber::{given, then, when, World};
use futures::FutureExt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::report::{capture_failure, ensure, ScenarioReport};
use super::session::DriverFactory;
use crate::actions::ElementActions;
use crate::config::Config;
use crate::driver::Driver;
use crate::pages::{OrderPage, ServiceType};
use crate::{Error, ErrorKind, Result};

#[derive(Debug, Clone)]
struct Failure {
    kind: ErrorKind,
    message: String,
}

/// Per-scenario state of the order page steps
#[derive(Debug, Default, World)]
pub struct OrderWorld {
    config: Arc<Config>,
    driver: Option<Arc<dyn Driver>>,
    page: Option<OrderPage>,
    picked_address: Option<String>,
    failure: Option<Failure>,
    started: Option<Instant>,
}

impl OrderWorld {
    /// Open a driver session and build the page object on it.
    ///
    /// A failure is recorded and surfaces from the first step.
    pub async fn start(&mut self, factory: &dyn DriverFactory, config: Arc<Config>) {
        self.started = Some(Instant::now());
        self.config = config;

        if let Err(e) = self.open_session(factory).await {
            error!("Failed to open a driver session: {}", e);
            self.record(&e);
        }
    }

    async fn open_session(&mut self, factory: &dyn DriverFactory) -> Result<()> {
        let driver = factory.create().await?;
        self.driver = Some(driver.clone());

        let actions = ElementActions::new(driver, self.config.wait_policy());
        self.page = Some(OrderPage::new(actions, &self.config)?);
        Ok(())
    }

    pub fn page(&self) -> Result<OrderPage> {
        self.page
            .clone()
            .ok_or_else(|| Error::webdriver("no driver session for this scenario"))
    }

    pub fn driver(&self) -> Option<&Arc<dyn Driver>> {
        self.driver.as_ref()
    }

    /// Run a step body against the page, recording its failure
    async fn step<T, F, Fut>(&mut self, body: F) -> Result<T>
    where
        F: FnOnce(OrderPage) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let result = match self.page() {
            Ok(page) => body(page).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            error!("Step execution failed: [{:?}] {}", e.kind(), e);
            self.record(e);
        }
        result
    }

    /// Keep the first failure; later ones are consequences of it
    fn record(&mut self, e: &Error) {
        if self.failure.is_none() {
            self.failure = Some(Failure {
                kind: e.kind(),
                message: e.to_string(),
            });
        }
    }

    /// Screenshot a failed scenario, release the session and fill the report
    pub async fn finish(
        &mut self,
        mut report: ScenarioReport,
        finished: &ScenarioFinished,
    ) -> ScenarioReport {
        if !matches!(finished, ScenarioFinished::StepPassed) {
            match self.failure.take() {
                Some(failure) => {
                    report.error_kind = Some(failure.kind);
                    report.error = Some(failure.message);
                }
                None => report.error = Some(describe(finished).to_string()),
            }

            if let Some(driver) = &self.driver {
                let dir = PathBuf::from(&self.config.screenshot_path);
                report.screenshot = capture_failure(driver.as_ref(), &dir, &report.name).await;
            }
        }

        self.page = None;
        if let Some(driver) = self.driver.take() {
            if let Err(e) = driver.quit().await {
                warn!("Failed to close driver session: {}", e);
            }
        }

        report.duration = self.started.map(|t| t.elapsed()).unwrap_or_default();
        report
    }
}

fn describe(finished: &ScenarioFinished) -> &'static str {
    match finished {
        ScenarioFinished::StepSkipped => "a step has no matching definition",
        ScenarioFinished::BeforeHookFailed(..) => "the before hook failed",
        _ => "a step failed",
    }
}

#[given("I open the Food Ordering company page")]
async fn open_company_page(world: &mut OrderWorld) -> Result<()> {
    world.step(open).await
}

#[given("I have opened the Food Ordering page")]
async fn opened_order_page(world: &mut OrderWorld) -> Result<()> {
    world.step(open).await
}

async fn open(page: OrderPage) -> Result<()> {
    page.open().await?;
    page.wait_for_page_loaded().await
}

#[then("the page should load successfully")]
async fn page_loaded(world: &mut OrderWorld) -> Result<()> {
    world
        .step(|page| async move { page.wait_for_page_loaded().await })
        .await
}

#[then("the page should display the company's food ordering options and relevant information")]
async fn ordering_information(world: &mut OrderWorld) -> Result<()> {
    world
        .step(|page| async move {
            let name = page.restaurant_name().await?;
            ensure(!name.trim().is_empty(), "Restaurant name heading is empty.")?;
            ensure(
                page.is_delivery_prompt_visible().await,
                "Delivery prompt card is not visible.",
            )?;
            ensure(
                page.is_menu_navigation_visible().await,
                "Menu navigation is not visible.",
            )?;
            let address = page.branch_address().await?;
            ensure(!address.trim().is_empty(), "Branch address text is empty.")
        })
        .await
}

#[then("the Delivery/Takeout switcher should be visible")]
async fn switcher_visible(world: &mut OrderWorld) -> Result<()> {
    world
        .step(|page| async move {
            ensure(
                page.is_switcher_visible().await,
                "Delivery/Takeout switcher button is not visible.",
            )
        })
        .await
}

#[then("the switcher should allow me to select my desired service type")]
async fn switcher_selectable(world: &mut OrderWorld) -> Result<()> {
    world
        .step(|page| async move {
            let visible = page.are_switcher_options_visible().await?;
            ensure(visible, "Switcher options are not visible.")
        })
        .await
}

#[when(regex = r#"^I select "([^"]+)"$"#)]
async fn select_service_type(world: &mut OrderWorld, service: String) -> Result<()> {
    world
        .step(|page| async move {
            let service: ServiceType = service.parse()?;
            page.select_service_type(service).await
        })
        .await
}

#[then("the delivery prompt message should be visible")]
async fn prompt_visible(world: &mut OrderWorld) -> Result<()> {
    world
        .step(|page| async move {
            ensure(
                page.is_delivery_prompt_message_visible().await,
                "Delivery prompt message is not visible after selecting Delivery.",
            )
        })
        .await
}

#[then("the delivery prompt message should not be visible")]
async fn prompt_hidden(world: &mut OrderWorld) -> Result<()> {
    world
        .step(|page| async move {
            ensure(
                page.is_delivery_prompt_message_hidden().await,
                "Delivery prompt message is still visible after selecting Takeout.",
            )
        })
        .await
}

#[when("I open the address picker")]
async fn open_address_picker(world: &mut OrderWorld) -> Result<()> {
    world
        .step(|page| async move { page.open_address_picker().await })
        .await
}

#[when(regex = r#"^I pick the first suggestion for "([^"]+)"$"#)]
async fn pick_first_suggestion(world: &mut OrderWorld, query: String) -> Result<()> {
    let picked = world
        .step(|page| async move { page.pick_address(&query).await })
        .await?;
    world.picked_address = Some(picked);
    Ok(())
}

#[then("the delivery prompt should show the picked address")]
async fn prompt_shows_address(world: &mut OrderWorld) -> Result<()> {
    let picked = world.picked_address.clone();
    world
        .step(|page| async move {
            let picked = picked.ok_or_else(|| Error::assertion("No address has been picked."))?;
            ensure(!picked.is_empty(), "Address suggestion text is empty.")?;
            let prompt = page.delivery_prompt_text().await?;
            ensure(
                prompt.contains(&picked),
                format!(
                    "Delivery prompt {:?} does not mention the picked address {:?}.",
                    prompt, picked
                ),
            )
        })
        .await
}

/// Whether a scenario matches a `--scenario` name or tag
fn selected(filter: Option<&str>, name: &str, tags: &[String]) -> bool {
    let Some(wanted) = filter else {
        return true;
    };
    let wanted = wanted.trim().trim_start_matches('@');
    name.eq_ignore_ascii_case(wanted)
        || tags.iter().any(|t| t.trim_start_matches('@') == wanted)
}

/// Runs feature files with one driver session per scenario
pub struct ScenarioRunner {
    factory: Arc<dyn DriverFactory>,
    config: Arc<Config>,
    filter: Option<String>,
}

impl ScenarioRunner {
    pub fn new(factory: Arc<dyn DriverFactory>, config: Arc<Config>) -> Self {
        Self {
            factory,
            config,
            filter: None,
        }
    }

    /// Only run scenarios with this name or tag
    pub fn only(mut self, name_or_tag: impl Into<String>) -> Self {
        self.filter = Some(name_or_tag.into());
        self
    }

    /// Run every selected scenario of the feature file (or directory), one
    /// at a time, and report each
    pub async fn run(&self, features: impl AsRef<Path>) -> Vec<ScenarioReport> {
        let reports = Arc::new(Mutex::new(Vec::new()));
        let collected = reports.clone();
        let factory = self.factory.clone();
        let config = self.config.clone();
        let filter = self.filter.clone();

        OrderWorld::cucumber()
            .max_concurrent_scenarios(1)
            .with_default_cli()
            .before(move |feature, _rule, scenario, world| {
                let factory = factory.clone();
                let config = config.clone();
                async move {
                    info!("{}", "─".repeat(70));
                    info!("Feature: {}", feature.name);
                    info!("Scenario: {}", scenario.name);
                    world.start(factory.as_ref(), config).await;
                }
                .boxed_local()
            })
            .after(move |feature, _rule, scenario, finished, world| {
                let collected = collected.clone();
                async move {
                    let tags = scenario
                        .tags
                        .iter()
                        .map(|t| t.trim_start_matches('@').to_string())
                        .collect();
                    let mut report = ScenarioReport::new(&scenario.name, &feature.name, tags);
                    report = match world {
                        Some(world) => world.finish(report, finished).await,
                        None => {
                            report.error = Some(describe(finished).to_string());
                            report
                        }
                    };

                    log_outcome(&report);
                    collected.lock().await.push(report);
                }
                .boxed_local()
            })
            .filter_run(
                features.as_ref().to_path_buf(),
                move |_feature, _rule, scenario| {
                    selected(filter.as_deref(), &scenario.name, &scenario.tags)
                },
            )
            .await;

        let mut reports = reports.lock().await;
        std::mem::take(&mut *reports)
    }
}

fn log_outcome(report: &ScenarioReport) {
    if report.passed() {
        info!("Scenario passed in {:.2}s", report.duration.as_secs_f64());
    } else {
        error!(
            "Scenario failed in {:.2}s: {}",
            report.duration.as_secs_f64(),
            report.error.as_deref().unwrap_or_default()
        );
    }
}
