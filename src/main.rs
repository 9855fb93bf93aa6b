//! Order-E2E runner
//!
//! Runs the order page feature files against a WebDriver endpoint and prints
//! a pass/fail summary. Exits non-zero when any scenario fails.
//!
//! ## Environment variables
//! - `E2E_BROWSER`: chrome, firefox or safari (default: chrome)
//! - `E2E_ENV`: dev, staging or prod (default: staging)
//! - `E2E_DEVICE`: device profile name (default: desktop)
//! - `E2E_WEBDRIVER_URL`: WebDriver endpoint (default: local driver of the browser)
//! - `RUST_LOG`: log filter, overrides the configured log level

use anyhow::Context;
use clap::Parser;
use order_e2e::{
    config::{Config, Environment},
    driver::BrowserKind,
    scenario::{ScenarioRunner, WebDriverFactory, FEATURES_DIR},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "order-e2e")]
#[command(about = "End-to-end scenarios for the food-ordering page")]
#[command(version)]
struct Cli {
    /// Run the browser without a window
    #[arg(long)]
    headless: bool,

    /// Target environment (dev, staging, prod)
    #[arg(long)]
    env: Option<Environment>,

    /// Browser to drive (chrome, firefox, safari)
    #[arg(long)]
    browser: Option<BrowserKind>,

    /// Device profile to emulate
    #[arg(long)]
    device: Option<String>,

    /// TOML configuration file; environment variables are used otherwise
    #[arg(short, long)]
    config: Option<String>,

    /// WebDriver endpoint
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Only run scenarios matching this name or tag
    #[arg(short, long)]
    scenario: Option<String>,

    /// Feature file or directory of feature files
    #[arg(short, long, default_value = FEATURES_DIR)]
    features: PathBuf,
}

impl Cli {
    fn load_config(&self) -> order_e2e::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::from_env()?,
        };

        if self.headless {
            config.headless = true;
        }
        if let Some(env) = self.env {
            config.env = env;
        }
        if let Some(browser) = self.browser {
            config.browser = browser;
        }
        if let Some(device) = &self.device {
            config.device = device.clone();
        }
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url = Some(url.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config().context("failed to load configuration")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    info!("Order-E2E v{}", order_e2e::VERSION);
    info!(
        "Target {} with {} ({}, headless={})",
        config.base_url(),
        config.browser,
        config.device,
        config.headless
    );

    if !cli.features.exists() {
        anyhow::bail!("feature path {} does not exist", cli.features.display());
    }

    let factory = WebDriverFactory::from_config(&config)?;
    let mut runner = ScenarioRunner::new(Arc::new(factory), Arc::new(config));
    if let Some(name) = &cli.scenario {
        runner = runner.only(name.clone());
    }
    let reports = runner.run(&cli.features).await;
    if reports.is_empty() {
        anyhow::bail!(
            "no scenario matches {:?}",
            cli.scenario.as_deref().unwrap_or_default()
        );
    }

    let failed = reports.iter().filter(|r| !r.passed()).count();
    info!("{}", "═".repeat(70));
    for report in &reports {
        if report.passed() {
            info!("PASSED  {} ({:.2}s)", report.name, report.duration.as_secs_f64());
        } else {
            error!(
                "FAILED  {} ({:.2}s): {}",
                report.name,
                report.duration.as_secs_f64(),
                report.error.as_deref().unwrap_or_default()
            );
            if let Some(path) = &report.screenshot {
                error!("        screenshot: {}", path.display());
            }
        }
    }
    info!(
        "{} scenarios, {} passed, {} failed",
        reports.len(),
        reports.len() - failed,
        failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
