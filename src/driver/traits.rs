//! Driver capability traits
//!
//! This module defines the abstract interfaces the element actions are built
//! on: a page-level [`Driver`] and the [`ElementHandle`]s it returns.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use std::sync::Arc;

use crate::locator::Locator;
use crate::Error;

/// Script argument
#[derive(Debug, Clone)]
pub enum ScriptArg {
    /// Reference to a located element, by driver element id
    Element(String),
    /// Plain JSON value
    Value(Value),
}

impl ScriptArg {
    /// Reference an element handle
    pub fn element(handle: &dyn ElementHandle) -> Self {
        ScriptArg::Element(handle.id().to_string())
    }
}

/// Element handle trait
///
/// An opaque reference to a DOM node located by the driver. A handle is only
/// meaningful until the page mutates; operations on a detached node fail with
/// [`Error::StaleElement`].
#[async_trait]
pub trait ElementHandle: Send + Sync + std::fmt::Debug {
    /// Driver-assigned element id
    fn id(&self) -> &str;

    /// Native click
    async fn click(&self) -> Result<(), Error>;

    /// Send keystrokes
    async fn send_keys(&self, text: &str) -> Result<(), Error>;

    /// Clear an editable element
    async fn clear(&self) -> Result<(), Error>;

    /// Read an attribute (or the live property for `value` and `checked`)
    async fn attribute(&self, name: &str) -> Result<Option<String>, Error>;

    /// Rendered text
    async fn text(&self) -> Result<String, Error>;

    /// Check if element is enabled
    async fn is_enabled(&self) -> Result<bool, Error>;

    /// Check if element is displayed
    async fn is_displayed(&self) -> Result<bool, Error>;
}

/// Browser driver trait
///
/// One driver owns one browser session.
#[async_trait]
pub trait Driver: Send + Sync + std::fmt::Debug {
    /// Locate the first element matching the locator's strategy and value.
    ///
    /// Fails immediately with [`Error::NoSuchElement`] when nothing matches.
    /// The locator's match index is not applied here.
    async fn find_element(&self, locator: &Locator) -> Result<Arc<dyn ElementHandle>, Error>;

    /// Locate every element matching the locator's strategy and value
    async fn find_elements(&self, locator: &Locator) -> Result<Vec<Arc<dyn ElementHandle>>, Error>;

    /// Navigate to URL
    async fn navigate(&self, url: &str) -> Result<(), Error>;

    /// Reload page
    async fn refresh(&self) -> Result<(), Error>;

    /// Current page URL
    async fn current_url(&self) -> Result<String, Error>;

    /// Execute synchronous JavaScript; elements are passed via `arguments[i]`
    async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> Result<Value, Error>;

    /// Capture a PNG screenshot of the viewport
    async fn screenshot(&self) -> Result<Bytes, Error>;

    /// Resize the browser window
    async fn set_window_size(&self, width: u32, height: u32) -> Result<(), Error>;

    /// End the browser session
    async fn quit(&self) -> Result<(), Error>;
}
