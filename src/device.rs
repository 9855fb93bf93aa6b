//! Device profiles
//!
//! Viewport and user-agent presets used to emulate the devices the ordering
//! page is tested on.

use phf::phf_map;
use serde::Serialize;
use std::fmt;

use crate::{Error, Result};

/// Device form factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Desktop,
    Mobile,
    Tablet,
}

/// Device profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeviceProfile {
    /// Display name
    pub name: &'static str,
    /// Viewport width in CSS pixels
    pub width: u32,
    /// Viewport height in CSS pixels
    pub height: u32,
    /// Device pixel ratio
    pub pixel_ratio: f64,
    /// User agent string
    pub user_agent: &'static str,
    /// Form factor
    pub device_type: DeviceType,
}

const DESKTOP: DeviceProfile = DeviceProfile {
    name: "Desktop",
    width: 1920,
    height: 1080,
    pixel_ratio: 1.0,
    user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    device_type: DeviceType::Desktop,
};

const IPHONE_17_PRO_MAX: DeviceProfile = DeviceProfile {
    name: "iPhone 17 Pro Max",
    width: 440,
    height: 956,
    pixel_ratio: 3.0,
    user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 18_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Mobile/15E148 Safari/604.1",
    device_type: DeviceType::Mobile,
};

const IPHONE_17: DeviceProfile = DeviceProfile {
    name: "iPhone 17",
    width: 402,
    height: 874,
    pixel_ratio: 3.0,
    user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 18_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Mobile/15E148 Safari/604.1",
    device_type: DeviceType::Mobile,
};

const IPAD_PRO: DeviceProfile = DeviceProfile {
    name: "iPad Pro 12.9-inch",
    width: 1024,
    height: 1366,
    pixel_ratio: 2.0,
    user_agent: "Mozilla/5.0 (iPad; CPU OS 17_2_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Mobile/15E148 Safari/604.1",
    device_type: DeviceType::Tablet,
};

const PIXEL_9_PRO: DeviceProfile = DeviceProfile {
    name: "Google Pixel 9 Pro",
    width: 427,
    height: 952,
    pixel_ratio: 3.0,
    user_agent: "Mozilla/5.0 (Linux; Android 14; Pixel 9 Pro) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Mobile Safari/537.36",
    device_type: DeviceType::Mobile,
};

static DEVICES: phf::Map<&'static str, DeviceProfile> = phf_map! {
    "desktop" => DESKTOP,
    "iphone17promax" => IPHONE_17_PRO_MAX,
    "iphone17" => IPHONE_17,
    "ipadpro" => IPAD_PRO,
    "pixel9pro" => PIXEL_9_PRO,
};

impl DeviceProfile {
    /// Look up a profile by its short name (case-insensitive)
    pub fn lookup(name: &str) -> Result<Self> {
        DEVICES
            .get(name.to_lowercase().as_str())
            .copied()
            .ok_or_else(|| Error::configuration(format!("Unsupported device type: {}", name)))
    }

    /// Short names of every known profile
    pub fn names() -> Vec<&'static str> {
        let mut names: Vec<_> = DEVICES.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn is_mobile(&self) -> bool {
        self.device_type == DeviceType::Mobile
    }

    pub fn is_tablet(&self) -> bool {
        self.device_type == DeviceType::Tablet
    }

    pub fn is_desktop(&self) -> bool {
        self.device_type == DeviceType::Desktop
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        DESKTOP
    }
}

impl fmt::Display for DeviceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}x{})", self.name, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let device = DeviceProfile::lookup("iPhone17ProMax").unwrap();
        assert_eq!(device.width, 440);
        assert_eq!(device.height, 956);
        assert!(device.is_mobile());
    }

    #[test]
    fn test_unknown_device() {
        let err = DeviceProfile::lookup("nokia3310").unwrap_err();
        assert!(err.to_string().contains("Unsupported device type: nokia3310"));
    }

    #[test]
    fn test_default_is_desktop() {
        let device = DeviceProfile::default();
        assert!(device.is_desktop());
        assert_eq!(device.to_string(), "Desktop (1920x1080)");
    }

    #[test]
    fn test_ipad_is_tablet() {
        let device = DeviceProfile::lookup("ipadpro").unwrap();
        assert!(device.is_tablet());
        assert_eq!(device.pixel_ratio, 2.0);
    }

    #[test]
    fn test_names() {
        assert_eq!(
            DeviceProfile::names(),
            vec!["desktop", "ipadpro", "iphone17", "iphone17promax", "pixel9pro"]
        );
    }
}
