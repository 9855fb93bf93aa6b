//! Browser launch options
//!
//! Builds the W3C capabilities a new session is requested with.

use serde::{Deserialize, Serialize};
use fantoccini::wd::Capabilities;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use crate::device::DeviceProfile;
use crate::Error;

/// Supported browsers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chrome,
    Firefox,
    Safari,
}

impl BrowserKind {
    /// Browser name as used in capabilities
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Safari => "safari",
        }
    }

    /// Conventional local endpoint of the matching driver binary
    pub fn default_webdriver_url(&self) -> &'static str {
        match self {
            BrowserKind::Chrome => "http://localhost:9515",
            BrowserKind::Firefox => "http://localhost:4444",
            BrowserKind::Safari => "http://localhost:4445",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chrome" | "chromium" => Ok(BrowserKind::Chrome),
            "firefox" => Ok(BrowserKind::Firefox),
            "safari" => Ok(BrowserKind::Safari),
            _ => Err(Error::configuration(format!("Unsupported browser type: {}", s))),
        }
    }
}

/// Browser options for opening a session
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Browser to launch
    pub browser: BrowserKind,
    /// Headless mode (no GUI)
    pub headless: bool,
    /// Window width
    pub window_width: u32,
    /// Window height
    pub window_height: u32,
    /// User agent string
    pub user_agent: Option<String>,
    /// Firefox executable path
    pub firefox_binary: Option<String>,
    /// Additional arguments to pass to the browser
    pub args: Vec<String>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            browser: BrowserKind::Chrome,
            headless: false,
            window_width: 1920,
            window_height: 1080,
            user_agent: None,
            firefox_binary: None,
            args: vec![],
        }
    }
}

impl BrowserOptions {
    /// Options sized and identified like the given device
    pub fn for_device(browser: BrowserKind, headless: bool, device: &DeviceProfile) -> Self {
        Self {
            browser,
            headless,
            window_width: device.width,
            window_height: device.height,
            user_agent: Some(device.user_agent.to_string()),
            ..Default::default()
        }
    }

    /// Capabilities every new session must match
    pub fn capabilities(&self) -> Capabilities {
        let always_match = match self.browser {
            BrowserKind::Chrome => {
                let mut args = Vec::new();
                if self.headless {
                    args.push("--headless".to_string());
                }
                args.push("--no-sandbox".to_string());
                args.push("--disable-dev-shm-usage".to_string());
                args.push(format!(
                    "--window-size={},{}",
                    self.window_width, self.window_height
                ));
                if let Some(ua) = &self.user_agent {
                    args.push(format!("--user-agent={}", ua));
                }
                args.push("--disable-protocol-handler-prompt".to_string());
                args.push("--disable-external-protocol-handler".to_string());
                args.extend(self.args.iter().cloned());

                json!({
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args },
                })
            }
            BrowserKind::Firefox => {
                let mut args = Vec::new();
                if self.headless {
                    args.push("--headless".to_string());
                }
                args.push(format!("--width={}", self.window_width));
                args.push(format!("--height={}", self.window_height));
                args.extend(self.args.iter().cloned());

                let mut options = json!({ "args": args });
                if let Some(ua) = &self.user_agent {
                    options["prefs"] = json!({ "general.useragent.override": ua });
                }
                if let Some(binary) = &self.firefox_binary {
                    options["binary"] = json!(binary);
                }

                json!({
                    "browserName": "firefox",
                    "moz:firefoxOptions": options,
                })
            }
            // safaridriver takes no launch arguments
            BrowserKind::Safari => json!({ "browserName": "safari" }),
        };

        match always_match {
            Value::Object(map) => map,
            _ => Capabilities::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_kind_from_str() {
        assert_eq!("Chrome".parse::<BrowserKind>().unwrap(), BrowserKind::Chrome);
        assert_eq!("firefox".parse::<BrowserKind>().unwrap(), BrowserKind::Firefox);
        assert_eq!("SAFARI".parse::<BrowserKind>().unwrap(), BrowserKind::Safari);
        assert!("opera".parse::<BrowserKind>().is_err());
    }

    #[test]
    fn test_chrome_capabilities() {
        let options = BrowserOptions {
            headless: true,
            window_width: 402,
            window_height: 874,
            user_agent: Some("UA".to_string()),
            ..Default::default()
        };
        let always = Value::Object(options.capabilities());
        assert_eq!(always["browserName"], "chrome");

        let args: Vec<&str> = always["goog:chromeOptions"]["args"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(args[0], "--headless");
        assert!(args.contains(&"--window-size=402,874"));
        assert!(args.contains(&"--user-agent=UA"));
    }

    #[test]
    fn test_firefox_capabilities() {
        let options = BrowserOptions {
            browser: BrowserKind::Firefox,
            user_agent: Some("UA".to_string()),
            firefox_binary: Some("/opt/firefox/firefox".to_string()),
            ..Default::default()
        };
        let caps = Value::Object(options.capabilities());
        let firefox = &caps["moz:firefoxOptions"];
        assert_eq!(firefox["prefs"]["general.useragent.override"], "UA");
        assert_eq!(firefox["binary"], "/opt/firefox/firefox");
        assert!(!firefox["args"]
            .as_array()
            .unwrap()
            .iter()
            .any(|a| a == "--headless"));
    }

    #[test]
    fn test_for_device() {
        let device = DeviceProfile::lookup("pixel9pro").unwrap();
        let options = BrowserOptions::for_device(BrowserKind::Chrome, true, &device);
        assert_eq!(options.window_width, 427);
        assert_eq!(options.window_height, 952);
        assert!(options.user_agent.unwrap().contains("Pixel 9 Pro"));
    }
}
