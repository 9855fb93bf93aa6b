//! Driver sessions
//!
//! Every scenario gets a fresh session from a [`DriverFactory`].

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::driver::{BrowserKind, BrowserOptions, Driver, WebDriverClient};
use crate::Result;

/// Driver factory trait
///
/// Creates one fresh driver session per scenario.
#[async_trait]
pub trait DriverFactory: Send + Sync {
    async fn create(&self) -> Result<Arc<dyn Driver>>;
}

#[async_trait]
impl<F, Fut> DriverFactory for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Arc<dyn Driver>>> + Send,
{
    async fn create(&self) -> Result<Arc<dyn Driver>> {
        (self)().await
    }
}

/// Factory opening WebDriver sessions
#[derive(Debug, Clone)]
pub struct WebDriverFactory {
    endpoint: String,
    options: BrowserOptions,
    retry_times: u32,
    retry_delay: Duration,
}

impl WebDriverFactory {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            endpoint: config.webdriver_endpoint(),
            options: config.browser_options()?,
            retry_times: config.retry_times,
            retry_delay: config.retry_delay(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DriverFactory for WebDriverFactory {
    async fn create(&self) -> Result<Arc<dyn Driver>> {
        let client = WebDriverClient::connect_with_retry(
            &self.endpoint,
            &self.options,
            self.retry_times,
            self.retry_delay,
        )
        .await?;

        // safaridriver ignores launch arguments, so size the window afterwards
        if self.options.browser == BrowserKind::Safari {
            client
                .set_window_size(self.options.window_width, self.options.window_height)
                .await?;
        }

        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;

    #[tokio::test]
    async fn test_closure_factory() {
        let factory = || async {
            Ok::<_, crate::Error>(Arc::new(MockDriver::new(vec![])) as Arc<dyn Driver>)
        };
        let driver = factory.create().await.unwrap();
        assert_eq!(driver.current_url().await.unwrap(), "about:blank");
    }

    #[test]
    fn test_webdriver_factory_from_config() {
        let config = Config {
            webdriver_url: Some("http://grid:4444".to_string()),
            ..Config::default()
        };
        let factory = WebDriverFactory::from_config(&config).unwrap();
        assert_eq!(factory.endpoint(), "http://grid:4444");
        assert_eq!(factory.retry_times, config.retry_times);
    }
}
