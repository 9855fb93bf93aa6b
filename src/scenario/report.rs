//! Scenario outcomes and failure screenshots

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::driver::Driver;
use crate::{Error, ErrorKind, Result};

/// Result of one scenario run
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub feature: String,
    pub tags: Vec<String>,
    pub duration: Duration,
    pub error: Option<String>,
    #[serde(skip)]
    pub error_kind: Option<ErrorKind>,
    pub screenshot: Option<PathBuf>,
}

impl ScenarioReport {
    pub fn new(name: impl Into<String>, feature: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            name: name.into(),
            feature: feature.into(),
            tags,
            duration: Duration::ZERO,
            error: None,
            error_kind: None,
            screenshot: None,
        }
    }

    pub fn passed(&self) -> bool {
        self.error.is_none()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Replace everything but ASCII letters and digits with `_`
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Save `<dir>/<sanitized name>.png` from the driver's current viewport
pub async fn save_screenshot(driver: &dyn Driver, dir: &Path, name: &str) -> Result<PathBuf> {
    let png = driver.screenshot().await?;
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(format!("{}.png", sanitize_name(name)));
    tokio::fs::write(&path, &png).await?;
    Ok(path)
}

/// Save a failure screenshot; failing to do so is only logged
pub async fn capture_failure(driver: &dyn Driver, dir: &Path, name: &str) -> Option<PathBuf> {
    match save_screenshot(driver, dir, name).await {
        Ok(path) => {
            info!("Saved failure screenshot to {}", path.display());
            Some(path)
        }
        Err(e) => {
            warn!("Failed to save failure screenshot: {}", e);
            None
        }
    }
}

/// Turn a failed check into an assertion error
pub fn ensure(condition: bool, message: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::assertion(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(
            sanitize_name("Select \"Takeout\" option"),
            "Select__Takeout__option"
        );
        assert_eq!(sanitize_name("open_page_01"), "open_page_01");
    }

    #[tokio::test]
    async fn test_save_screenshot_uses_sanitized_name() {
        let dir = TempDir::new().unwrap();
        let shots = dir.path().join("screenshots");
        let driver = MockDriver::new(vec![]);

        let path = save_screenshot(&driver, &shots, "Delivery/Takeout switcher")
            .await
            .unwrap();

        assert_eq!(path, shots.join("Delivery_Takeout_switcher.png"));
        let png = std::fs::read(&path).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[tokio::test]
    async fn test_capture_failure_after_quit() {
        let dir = TempDir::new().unwrap();
        let driver = MockDriver::new(vec![]);
        driver.quit().await.unwrap();

        assert!(capture_failure(&driver, dir.path(), "closed").await.is_none());
    }

    #[test]
    fn test_ensure() {
        assert!(ensure(true, "unused").is_ok());
        let err = ensure(false, "Menu navigation is not visible.").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AssertionFailed);
    }
}
