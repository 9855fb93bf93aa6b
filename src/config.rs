//! Configuration management for Order-E2E

use crate::actions::WaitPolicy;
use crate::device::DeviceProfile;
use crate::driver::{BrowserKind, BrowserOptions};
use crate::{Error, Result};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Every environment is served from the staging domain
const STAGING_DOMAIN: &str = "staging.inline.app";

const DEFAULT_BASE_PATH: &str =
    "/order/-N86uOXnWsyA-7n8EKma:inline-staging-2a466/-NEdHYAxrToGxfj4BxSw?language=en";

/// Upper bound on `default_timeout`, one hour
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Fragment that opens the address and date picker
pub const ADDRESS_AND_DATE_PICKER_FRAGMENT: &str = "#address-and-date-picker";

/// Target environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    #[default]
    Staging,
    Prod,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Staging => "staging",
            Environment::Prod => "prod",
        }
    }

    /// Host serving this environment
    pub fn domain(&self) -> &'static str {
        match self {
            Environment::Dev | Environment::Staging | Environment::Prod => STAGING_DOMAIN,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "staging" => Ok(Environment::Staging),
            "prod" => Ok(Environment::Prod),
            _ => Err(Error::configuration(format!("Unsupported environment: {}", s))),
        }
    }
}

/// Test run configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Browser to drive
    pub browser: BrowserKind,

    /// Run the browser without a window
    pub headless: bool,

    /// Default wait timeout in seconds
    pub default_timeout: u64,

    /// Polling interval in seconds
    pub poll_frequency: f64,

    /// Session creation attempts
    pub retry_times: u32,

    /// Pause between session attempts in seconds
    pub retry_delay: u64,

    /// Target environment
    pub env: Environment,

    /// Path of the ordering page below the domain
    pub base_path: String,

    /// Device profile name
    pub device: String,

    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,

    /// Directory for failure screenshots
    pub screenshot_path: String,

    /// WebDriver endpoint; defaults to the local driver of the browser
    pub webdriver_url: Option<String>,

    /// Firefox executable path
    pub firefox_bin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser: BrowserKind::Chrome,
            headless: false,
            default_timeout: 20,
            poll_frequency: 0.5,
            retry_times: 3,
            retry_delay: 2,
            env: Environment::Staging,
            base_path: DEFAULT_BASE_PATH.to_string(),
            device: "desktop".to_string(),
            log_level: "info".to_string(),
            screenshot_path: "screenshots".to_string(),
            webdriver_url: None,
            firefox_bin: None,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::configuration(format!("Invalid {}", name)))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(Error::configuration(format!("Invalid {}", name))),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from a variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(browser) = lookup("E2E_BROWSER") {
            config.browser = browser.parse()?;
        }

        if let Some(headless) = lookup("E2E_HEADLESS") {
            config.headless = parse_bool("E2E_HEADLESS", &headless)?;
        }

        if let Some(timeout) = lookup("E2E_DEFAULT_TIMEOUT") {
            config.default_timeout = parse_var("E2E_DEFAULT_TIMEOUT", &timeout)?;
        }

        if let Some(frequency) = lookup("E2E_POLL_FREQUENCY") {
            config.poll_frequency = parse_var("E2E_POLL_FREQUENCY", &frequency)?;
        }

        if let Some(retry_times) = lookup("E2E_RETRY_TIMES") {
            config.retry_times = parse_var("E2E_RETRY_TIMES", &retry_times)?;
        }

        if let Some(retry_delay) = lookup("E2E_RETRY_DELAY") {
            config.retry_delay = parse_var("E2E_RETRY_DELAY", &retry_delay)?;
        }

        if let Some(env) = lookup("E2E_ENV") {
            config.env = env.parse()?;
        }

        if let Some(base_path) = lookup("E2E_BASE_PATH") {
            config.base_path = base_path;
        }

        if let Some(device) = lookup("E2E_DEVICE") {
            config.device = device;
        }

        if let Some(log_level) = lookup("E2E_LOG_LEVEL") {
            config.log_level = log_level;
        }

        if let Some(path) = lookup("E2E_SCREENSHOT_PATH") {
            config.screenshot_path = path;
        }

        if let Some(url) = lookup("E2E_WEBDRIVER_URL") {
            config.webdriver_url = Some(url);
        }

        if let Some(firefox_bin) = lookup("FIREFOX_BIN") {
            config.firefox_bin = Some(firefox_bin);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::configuration(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values no run could use
    pub fn validate(&self) -> Result<()> {
        if self.default_timeout == 0 {
            return Err(Error::configuration("default_timeout must be positive"));
        }
        if self.default_timeout > MAX_TIMEOUT_SECS {
            return Err(Error::configuration(format!(
                "default_timeout must not exceed {} seconds",
                MAX_TIMEOUT_SECS
            )));
        }
        if !self.poll_frequency.is_finite() || self.poll_frequency <= 0.0 {
            return Err(Error::configuration("poll_frequency must be a positive number"));
        }
        DeviceProfile::lookup(&self.device)?;
        Ok(())
    }

    /// Ordering page URL, e.g. `https://staging.inline.app/order/...`
    pub fn base_url(&self) -> String {
        let path = self.base_path.trim_start_matches('/');
        if path.is_empty() {
            format!("https://{}", self.env.domain())
        } else {
            format!("https://{}/{}", self.env.domain(), path)
        }
    }

    /// URL of a page below the base URL
    pub fn page_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.base_url()
        } else {
            format!("{}/{}", self.base_url(), path)
        }
    }

    /// URL that opens the address and date picker
    pub fn address_picker_url(&self) -> String {
        format!("{}{}", self.base_url(), ADDRESS_AND_DATE_PICKER_FRAGMENT)
    }

    pub fn wait_policy(&self) -> WaitPolicy {
        let poll_interval = Duration::try_from_secs_f64(self.poll_frequency)
            .unwrap_or(crate::actions::wait::DEFAULT_POLL_INTERVAL);
        WaitPolicy::new(Duration::from_secs(self.default_timeout), poll_interval)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay)
    }

    pub fn device_profile(&self) -> Result<DeviceProfile> {
        DeviceProfile::lookup(&self.device)
    }

    /// Launch options for the configured browser and device
    pub fn browser_options(&self) -> Result<BrowserOptions> {
        let device = self.device_profile()?;
        let mut options = BrowserOptions::for_device(self.browser, self.headless, &device);
        options.firefox_binary = self.firefox_bin.clone();
        Ok(options)
    }

    /// WebDriver endpoint to open sessions against
    pub fn webdriver_endpoint(&self) -> String {
        self.webdriver_url
            .clone()
            .unwrap_or_else(|| self.browser.default_webdriver_url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.browser, BrowserKind::Chrome);
        assert!(!config.headless);
        assert_eq!(config.default_timeout, 20);
        assert_eq!(config.retry_times, 3);
        assert_eq!(config.env, Environment::Staging);
        assert_eq!(
            config.base_url(),
            "https://staging.inline.app/order/-N86uOXnWsyA-7n8EKma:inline-staging-2a466/-NEdHYAxrToGxfj4BxSw?language=en"
        );
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("E2E_BROWSER", "firefox"),
            ("E2E_HEADLESS", "True"),
            ("E2E_DEFAULT_TIMEOUT", "5"),
            ("E2E_POLL_FREQUENCY", "0.25"),
            ("E2E_ENV", "prod"),
            ("E2E_BASE_PATH", "order/demo"),
            ("E2E_DEVICE", "iphone17"),
            ("FIREFOX_BIN", "/usr/bin/firefox"),
        ]))
        .unwrap();

        assert_eq!(config.browser, BrowserKind::Firefox);
        assert!(config.headless);
        assert_eq!(config.base_url(), "https://staging.inline.app/order/demo");

        let policy = config.wait_policy();
        assert_eq!(policy.timeout, Duration::from_secs(5));
        assert_eq!(policy.poll_interval, Duration::from_millis(250));

        let options = config.browser_options().unwrap();
        assert_eq!(options.window_width, 402);
        assert_eq!(options.firefox_binary.as_deref(), Some("/usr/bin/firefox"));
        assert_eq!(config.webdriver_endpoint(), "http://localhost:4444");
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup(&[("E2E_DEFAULT_TIMEOUT", "soon")])).unwrap_err();
        assert!(err.to_string().contains("Invalid E2E_DEFAULT_TIMEOUT"));

        assert!(Config::from_lookup(lookup(&[("E2E_HEADLESS", "maybe")])).is_err());
        assert!(Config::from_lookup(lookup(&[("E2E_ENV", "qa")])).is_err());
        assert!(Config::from_lookup(lookup(&[("E2E_POLL_FREQUENCY", "-1")])).is_err());
        assert!(Config::from_lookup(lookup(&[("E2E_DEVICE", "nokia")])).is_err());
    }

    #[test]
    fn test_timeout_upper_bound() {
        let err = Config::from_lookup(lookup(&[("E2E_DEFAULT_TIMEOUT", "18446744073709551615")]))
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
        assert!(err.to_string().contains("must not exceed"));

        let config =
            Config::from_lookup(lookup(&[("E2E_DEFAULT_TIMEOUT", "3600")])).unwrap();
        assert_eq!(config.wait_policy().timeout, Duration::from_secs(MAX_TIMEOUT_SECS));
    }

    #[test]
    fn test_urls() {
        let config = Config::default();
        assert!(config.address_picker_url().ends_with("language=en#address-and-date-picker"));

        let config = Config {
            base_path: "/order/demo".to_string(),
            ..Default::default()
        };
        assert_eq!(config.page_url("/menu"), "https://staging.inline.app/order/demo/menu");
        assert_eq!(config.page_url(""), config.base_url());

        let config = Config {
            base_path: String::new(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "https://staging.inline.app");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("e2e.toml");
        std::fs::write(
            &path,
            "browser = \"safari\"\nenv = \"dev\"\ndevice = \"ipadpro\"\ndefault_timeout = 7\n",
        )
        .unwrap();

        let config = Config::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.browser, BrowserKind::Safari);
        assert_eq!(config.env, Environment::Dev);
        assert_eq!(config.default_timeout, 7);
        assert_eq!(config.screenshot_path, "screenshots");
        assert_eq!(config.device_profile().unwrap().width, 1024);
    }

    #[test]
    fn test_from_file_errors() {
        assert!(Config::from_file("/nonexistent/e2e.toml").is_err());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "browser = \"netscape\"\n").unwrap();
        let err = Config::from_file(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
