//! Mock driver implementation for testing
//!
//! [`MockDriver`] serves an in-memory page built from [`MockNode`]s. Nodes can
//! appear, become visible, change text or disappear on a schedule measured
//! from the last page load, which is enough to exercise every polling path of
//! the element actions without a browser.

use async_trait::async_trait;
use bytes::Bytes;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use uuid::Uuid;

use super::traits::{Driver, ElementHandle, ScriptArg};
use crate::locator::{Locator, Strategy};
use crate::Error;

const MOCK_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

const SCRIPT_CLICK: &str = "arguments[0].click();";
const SCRIPT_SCROLL: &str = "arguments[0].scrollIntoView(arguments[1]);";

/// How a node reacts to a native click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickBehavior {
    #[default]
    Normal,
    /// Another element receives the click
    Intercepted,
    /// The driver refuses to interact
    NotInteractable,
}

/// Page mutation applied when a node is clicked.
///
/// Targets are bare selectors; every matching node is affected.
#[derive(Debug, Clone)]
pub enum ClickEffect {
    Hide(String),
    Show(String),
    Remove(String),
    SetText(String, String),
}

/// Fixture node description
#[derive(Debug, Clone, Default)]
pub struct MockNode {
    tag: String,
    attributes: HashMap<String, String>,
    text: String,
    value: String,
    hidden: bool,
    disabled: bool,
    appears_after: Option<Duration>,
    disappears_after: Option<Duration>,
    visible_after: Option<Duration>,
    enabled_after: Option<Duration>,
    text_after: Option<(Duration, String)>,
    value_after: Option<(Duration, String)>,
    click_behavior: ClickBehavior,
    clear_resistance: u32,
    on_click: Vec<ClickEffect>,
}

impl MockNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_lowercase(),
            ..Default::default()
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Absent from the document until `delay` after load
    pub fn appears_after(mut self, delay: Duration) -> Self {
        self.appears_after = Some(delay);
        self
    }

    /// Removed from the document `delay` after load
    pub fn disappears_after(mut self, delay: Duration) -> Self {
        self.disappears_after = Some(delay);
        self
    }

    /// Present but not displayed until `delay` after load
    pub fn visible_after(mut self, delay: Duration) -> Self {
        self.visible_after = Some(delay);
        self
    }

    /// Disabled until `delay` after load
    pub fn enabled_after(mut self, delay: Duration) -> Self {
        self.enabled_after = Some(delay);
        self
    }

    pub fn text_after(mut self, delay: Duration, text: &str) -> Self {
        self.text_after = Some((delay, text.to_string()));
        self
    }

    pub fn value_after(mut self, delay: Duration, value: &str) -> Self {
        self.value_after = Some((delay, value.to_string()));
        self
    }

    pub fn click_behavior(mut self, behavior: ClickBehavior) -> Self {
        self.click_behavior = behavior;
        self
    }

    /// Ignore the first `count` clear requests
    pub fn clear_resistance(mut self, count: u32) -> Self {
        self.clear_resistance = count;
        self
    }

    pub fn on_click(mut self, effect: ClickEffect) -> Self {
        self.on_click.push(effect);
        self
    }

    fn has_class(&self, class: &str) -> bool {
        self.attributes
            .get("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

fn reached(after: Option<Duration>, elapsed: Duration) -> bool {
    after.map_or(true, |after| elapsed >= after)
}

/// Node as it currently exists in the loaded page
#[derive(Debug)]
struct LiveNode {
    handle: String,
    spec: MockNode,
    removed: bool,
    hidden: bool,
    text: Option<String>,
    value: Option<String>,
    clears_ignored: u32,
}

impl LiveNode {
    fn new(spec: MockNode) -> Self {
        Self {
            handle: Uuid::new_v4().to_string(),
            hidden: spec.hidden,
            spec,
            removed: false,
            text: None,
            value: None,
            clears_ignored: 0,
        }
    }

    fn is_present(&self, elapsed: Duration) -> bool {
        !self.removed
            && reached(self.spec.appears_after, elapsed)
            && self.spec.disappears_after.map_or(true, |d| elapsed < d)
    }

    fn is_displayed(&self, elapsed: Duration) -> bool {
        !self.hidden && reached(self.spec.visible_after, elapsed)
    }

    fn is_enabled(&self, elapsed: Duration) -> bool {
        !self.spec.disabled && reached(self.spec.enabled_after, elapsed)
    }

    fn text(&self, elapsed: Duration) -> String {
        if let Some(text) = &self.text {
            return text.clone();
        }
        match &self.spec.text_after {
            Some((delay, text)) if elapsed >= *delay => text.clone(),
            _ => self.spec.text.clone(),
        }
    }

    fn value(&self, elapsed: Duration) -> String {
        if let Some(value) = &self.value {
            return value.clone();
        }
        match &self.spec.value_after {
            Some((delay, value)) if elapsed >= *delay => value.clone(),
            _ => self.spec.value.clone(),
        }
    }
}

#[derive(Debug)]
struct Dom {
    loaded_at: Instant,
    nodes: Vec<LiveNode>,
}

impl Dom {
    fn load(page: &[MockNode]) -> Self {
        Self {
            loaded_at: Instant::now(),
            nodes: page.iter().cloned().map(LiveNode::new).collect(),
        }
    }

    fn elapsed(&self) -> Duration {
        self.loaded_at.elapsed()
    }

    fn matching(&self, locator: &Locator) -> Result<Vec<&LiveNode>, Error> {
        let selector = Selector::compile(locator)?;
        let elapsed = self.elapsed();
        Ok(self
            .nodes
            .iter()
            .filter(|n| n.is_present(elapsed) && selector.matches(&n.spec))
            .collect())
    }

    fn attached(&self, handle: &str) -> Result<&LiveNode, Error> {
        let elapsed = self.elapsed();
        self.nodes
            .iter()
            .find(|n| n.handle == handle && n.is_present(elapsed))
            .ok_or_else(|| Error::stale_element(format!("element {} is detached", handle)))
    }

    fn attached_mut(&mut self, handle: &str) -> Result<&mut LiveNode, Error> {
        let elapsed = self.elapsed();
        self.nodes
            .iter_mut()
            .find(|n| n.handle == handle && n.is_present(elapsed))
            .ok_or_else(|| Error::stale_element(format!("element {} is detached", handle)))
    }

    fn apply(&mut self, effects: &[ClickEffect]) -> Result<(), Error> {
        for effect in effects {
            let target = match effect {
                ClickEffect::Hide(target)
                | ClickEffect::Show(target)
                | ClickEffect::Remove(target)
                | ClickEffect::SetText(target, _) => target,
            };

            let selector = Selector::compile(&Locator::parse(target)?)?;
            for node in self.nodes.iter_mut().filter(|n| selector.matches(&n.spec)) {
                match effect {
                    ClickEffect::Hide(_) => node.hidden = true,
                    ClickEffect::Show(_) => node.hidden = false,
                    ClickEffect::Remove(_) => node.removed = true,
                    ClickEffect::SetText(_, text) => node.text = Some(text.clone()),
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Inner {
    page: RwLock<Vec<MockNode>>,
    dom: RwLock<Dom>,
    url: RwLock<String>,
    window: RwLock<(u32, u32)>,
    journal: Mutex<Vec<String>>,
    native_clicks: AtomicUsize,
    script_clicks: AtomicUsize,
    scrolls: AtomicUsize,
    closed: AtomicBool,
}

impl Inner {
    fn ensure_open(&self) -> Result<(), Error> {
        if self.closed.load(Ordering::Relaxed) {
            return Err(Error::webdriver("invalid session id: session was closed"));
        }
        Ok(())
    }

    async fn record(&self, entry: String) {
        self.journal.lock().await.push(entry);
    }
}

/// Mock browser driver
#[derive(Debug, Clone)]
pub struct MockDriver {
    inner: Arc<Inner>,
}

impl MockDriver {
    /// Create a driver with the given page already loaded
    pub fn new(page: Vec<MockNode>) -> Self {
        let dom = Dom::load(&page);
        Self {
            inner: Arc::new(Inner {
                page: RwLock::new(page),
                dom: RwLock::new(dom),
                url: RwLock::new("about:blank".to_string()),
                window: RwLock::new((1920, 1080)),
                journal: Mutex::new(Vec::new()),
                native_clicks: AtomicUsize::new(0),
                script_clicks: AtomicUsize::new(0),
                scrolls: AtomicUsize::new(0),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Replace the page served on the next load
    pub async fn set_page(&self, page: Vec<MockNode>) {
        *self.inner.page.write().await = page;
    }

    /// Commands received so far
    pub async fn journal(&self) -> Vec<String> {
        self.inner.journal.lock().await.clone()
    }

    pub fn native_clicks(&self) -> usize {
        self.inner.native_clicks.load(Ordering::Relaxed)
    }

    pub fn script_clicks(&self) -> usize {
        self.inner.script_clicks.load(Ordering::Relaxed)
    }

    pub fn scrolls(&self) -> usize {
        self.inner.scrolls.load(Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Relaxed)
    }

    pub async fn window_size(&self) -> (u32, u32) {
        *self.inner.window.read().await
    }

    async fn reload(&self) {
        let page = self.inner.page.read().await;
        *self.inner.dom.write().await = Dom::load(&page);
    }

    fn handle(&self, node: &LiveNode) -> Arc<dyn ElementHandle> {
        Arc::new(MockElement {
            inner: self.inner.clone(),
            id: node.handle.clone(),
        })
    }

    async fn script_click(&self, handle: &str) -> Result<(), Error> {
        let mut dom = self.inner.dom.write().await;
        let effects = dom.attached(handle)?.spec.on_click.clone();
        dom.apply(&effects)?;
        self.inner.script_clicks.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn find_element(&self, locator: &Locator) -> Result<Arc<dyn ElementHandle>, Error> {
        self.inner.ensure_open()?;
        let dom = self.inner.dom.read().await;
        dom.matching(locator)?
            .first()
            .map(|node| self.handle(node))
            .ok_or_else(|| Error::no_such_element(format!("no element matches {}", locator)))
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<Arc<dyn ElementHandle>>, Error> {
        self.inner.ensure_open()?;
        let dom = self.inner.dom.read().await;
        Ok(dom
            .matching(locator)?
            .into_iter()
            .map(|node| self.handle(node))
            .collect())
    }

    async fn navigate(&self, url: &str) -> Result<(), Error> {
        self.inner.ensure_open()?;
        self.inner.record(format!("navigate {}", url)).await;
        *self.inner.url.write().await = url.to_string();
        self.reload().await;
        Ok(())
    }

    async fn refresh(&self) -> Result<(), Error> {
        self.inner.ensure_open()?;
        self.inner.record("refresh".to_string()).await;
        self.reload().await;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, Error> {
        self.inner.ensure_open()?;
        Ok(self.inner.url.read().await.clone())
    }

    async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> Result<Value, Error> {
        self.inner.ensure_open()?;
        self.inner.record(format!("script {}", script)).await;

        let target = match args.first() {
            Some(ScriptArg::Element(id)) => Some(id.as_str()),
            _ => None,
        };

        match (script, target) {
            (SCRIPT_CLICK, Some(handle)) => {
                self.script_click(handle).await?;
                Ok(Value::Null)
            }
            (SCRIPT_SCROLL, Some(handle)) => {
                if !matches!(args.get(1), Some(ScriptArg::Value(Value::Bool(_)))) {
                    return Err(Error::script_execution_failed(
                        "arguments[1] is not a boolean",
                    ));
                }
                self.inner.dom.read().await.attached(handle)?;
                self.inner.scrolls.fetch_add(1, Ordering::Relaxed);
                Ok(Value::Null)
            }
            (SCRIPT_CLICK, None) | (SCRIPT_SCROLL, None) => Err(Error::script_execution_failed(
                "arguments[0] is not an element",
            )),
            _ => Ok(Value::Null),
        }
    }

    async fn screenshot(&self) -> Result<Bytes, Error> {
        self.inner.ensure_open()?;
        let png = BASE64
            .decode(MOCK_PNG)
            .map_err(|e| Error::internal(format!("mock screenshot: {}", e)))?;
        Ok(Bytes::from(png))
    }

    async fn set_window_size(&self, width: u32, height: u32) -> Result<(), Error> {
        self.inner.ensure_open()?;
        *self.inner.window.write().await = (width, height);
        Ok(())
    }

    async fn quit(&self) -> Result<(), Error> {
        self.inner.ensure_open()?;
        self.inner.record("quit".to_string()).await;
        self.inner.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}

/// Mock element handle
#[derive(Debug)]
pub struct MockElement {
    inner: Arc<Inner>,
    id: String,
}

impl MockElement {
    fn interactable(&self, dom: &Dom) -> Result<(), Error> {
        let node = dom.attached(&self.id)?;
        let elapsed = dom.elapsed();
        if !node.is_displayed(elapsed) || !node.is_enabled(elapsed) {
            return Err(Error::not_interactable(format!(
                "element {} is hidden or disabled",
                self.id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ElementHandle for MockElement {
    fn id(&self) -> &str {
        &self.id
    }

    async fn click(&self) -> Result<(), Error> {
        self.inner.ensure_open()?;
        let mut dom = self.inner.dom.write().await;
        let node = dom.attached(&self.id)?;
        let elapsed = dom.elapsed();

        match node.spec.click_behavior {
            ClickBehavior::Intercepted => {
                return Err(Error::click_intercepted(format!(
                    "element {} is covered by another element",
                    self.id
                )))
            }
            ClickBehavior::NotInteractable => {
                return Err(Error::not_interactable(format!(
                    "element {} cannot be clicked",
                    self.id
                )))
            }
            ClickBehavior::Normal if !node.is_displayed(elapsed) => {
                return Err(Error::not_interactable(format!(
                    "element {} is not displayed",
                    self.id
                )))
            }
            ClickBehavior::Normal => {}
        }

        let effects = node.spec.on_click.clone();
        dom.apply(&effects)?;
        self.inner.native_clicks.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<(), Error> {
        self.inner.ensure_open()?;
        let mut dom = self.inner.dom.write().await;
        self.interactable(&dom)?;
        let elapsed = dom.elapsed();
        let node = dom.attached_mut(&self.id)?;
        let mut value = node.value(elapsed);
        value.push_str(text);
        node.value = Some(value);
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        self.inner.ensure_open()?;
        let mut dom = self.inner.dom.write().await;
        self.interactable(&dom)?;
        let node = dom.attached_mut(&self.id)?;
        if node.clears_ignored < node.spec.clear_resistance {
            node.clears_ignored += 1;
        } else {
            node.value = Some(String::new());
        }
        Ok(())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, Error> {
        self.inner.ensure_open()?;
        let dom = self.inner.dom.read().await;
        let node = dom.attached(&self.id)?;
        let elapsed = dom.elapsed();
        Ok(match name {
            "value" => Some(node.value(elapsed)),
            "disabled" => (!node.is_enabled(elapsed)).then(|| "true".to_string()),
            _ => node.spec.attributes.get(name).cloned(),
        })
    }

    async fn text(&self) -> Result<String, Error> {
        self.inner.ensure_open()?;
        let dom = self.inner.dom.read().await;
        let node = dom.attached(&self.id)?;
        Ok(node.text(dom.elapsed()))
    }

    async fn is_enabled(&self) -> Result<bool, Error> {
        self.inner.ensure_open()?;
        let dom = self.inner.dom.read().await;
        let node = dom.attached(&self.id)?;
        Ok(node.is_enabled(dom.elapsed()))
    }

    async fn is_displayed(&self) -> Result<bool, Error> {
        self.inner.ensure_open()?;
        let dom = self.inner.dom.read().await;
        let node = dom.attached(&self.id)?;
        Ok(node.is_displayed(dom.elapsed()))
    }
}

/// Attribute condition of a compound selector
#[derive(Debug, Clone, PartialEq)]
enum AttrTest {
    Exists(String),
    Equals(String, String),
    TextEquals(String),
}

/// The selector subset the mock understands: one compound selector
#[derive(Debug, Default, PartialEq)]
struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    tests: Vec<AttrTest>,
}

impl Selector {
    fn compile(locator: &Locator) -> Result<Self, Error> {
        let value = locator.value();
        match locator.strategy() {
            Strategy::Id => Ok(Self {
                id: Some(value.to_string()),
                ..Default::default()
            }),
            Strategy::ClassName => Ok(Self {
                classes: vec![value.to_string()],
                ..Default::default()
            }),
            Strategy::CssSelector => Self::css(value),
            Strategy::XPath => Self::xpath(value),
        }
    }

    fn matches(&self, node: &MockNode) -> bool {
        self.tag.as_ref().map_or(true, |t| *t == node.tag)
            && self
                .id
                .as_ref()
                .map_or(true, |id| node.attributes.get("id") == Some(id))
            && self.classes.iter().all(|c| node.has_class(c))
            && self.tests.iter().all(|test| match test {
                AttrTest::Exists(name) => node.attributes.contains_key(name),
                AttrTest::Equals(name, value) => node.attributes.get(name) == Some(value),
                AttrTest::TextEquals(text) => node.text.trim() == text,
            })
    }

    fn css(selector: &str) -> Result<Self, Error> {
        let unsupported =
            || Error::invalid_selector(format!("unsupported css selector: {}", selector));
        let mut out = Selector::default();
        let mut rest = selector;

        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '*'))
            .unwrap_or(rest.len());
        if tag_len > 0 {
            let tag = &rest[..tag_len];
            if tag != "*" {
                out.tag = Some(tag.to_lowercase());
            }
            rest = &rest[tag_len..];
        }

        while let Some(c) = rest.chars().next() {
            match c {
                '#' | '.' => {
                    let body = &rest[1..];
                    let len = body
                        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
                        .unwrap_or(body.len());
                    if len == 0 {
                        return Err(unsupported());
                    }
                    if c == '#' {
                        out.id = Some(body[..len].to_string());
                    } else {
                        out.classes.push(body[..len].to_string());
                    }
                    rest = &body[len..];
                }
                '[' => {
                    let end = rest.find(']').ok_or_else(unsupported)?;
                    out.tests.push(parse_attr_test(&rest[1..end]).ok_or_else(unsupported)?);
                    rest = &rest[end + 1..];
                }
                _ => return Err(unsupported()),
            }
        }

        if out == Selector::default() {
            return Err(unsupported());
        }
        Ok(out)
    }

    fn xpath(selector: &str) -> Result<Self, Error> {
        let unsupported =
            || Error::invalid_selector(format!("unsupported xpath: {}", selector));
        let body = selector.strip_prefix("//").ok_or_else(unsupported)?;
        let (tag, mut rest) = match body.find('[') {
            Some(pos) => (&body[..pos], &body[pos..]),
            None => (body, ""),
        };

        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '*') {
            return Err(unsupported());
        }

        let mut out = Selector {
            tag: (tag != "*").then(|| tag.to_lowercase()),
            ..Default::default()
        };

        while !rest.is_empty() {
            let end = rest.find(']').ok_or_else(unsupported)?;
            let predicate = rest[1..end].trim();
            let test = if let Some(attr) = predicate.strip_prefix('@') {
                parse_attr_test(attr)
            } else if let Some(text) = predicate.strip_prefix("text()") {
                text.trim()
                    .strip_prefix('=')
                    .and_then(|v| strip_quotes(v.trim()))
                    .map(|v| AttrTest::TextEquals(v.to_string()))
            } else {
                None
            };
            out.tests.push(test.ok_or_else(unsupported)?);
            rest = &rest[end + 1..];
        }

        Ok(out)
    }
}

fn parse_attr_test(body: &str) -> Option<AttrTest> {
    match body.split_once('=') {
        Some((name, value)) => {
            let value = strip_quotes(value.trim())?;
            Some(AttrTest::Equals(name.trim().to_string(), value.to_string()))
        }
        None if !body.trim().is_empty() => Some(AttrTest::Exists(body.trim().to_string())),
        None => None,
    }
}

fn strip_quotes(value: &str) -> Option<&str> {
    ['"', '\'']
        .iter()
        .find_map(|q| value.strip_prefix(*q)?.strip_suffix(*q))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_compound_selector() {
        let selector = Selector::css("button#go.primary.large[data-cy='x'][disabled]").unwrap();
        assert_eq!(selector.tag.as_deref(), Some("button"));
        assert_eq!(selector.id.as_deref(), Some("go"));
        assert_eq!(selector.classes, vec!["primary", "large"]);
        assert_eq!(
            selector.tests,
            vec![
                AttrTest::Equals("data-cy".to_string(), "x".to_string()),
                AttrTest::Exists("disabled".to_string()),
            ]
        );
    }

    #[test]
    fn test_css_unsupported() {
        assert!(Selector::css("div > span").is_err());
        assert!(Selector::css("li:nth-child(2)").is_err());
        assert!(Selector::css("[data-cy=x]").is_err());
    }

    #[test]
    fn test_xpath_predicates() {
        let selector = Selector::xpath("//button[@type=\"submit\"][text()='Go']").unwrap();
        assert_eq!(selector.tag.as_deref(), Some("button"));
        assert_eq!(selector.tests.len(), 2);

        let any = Selector::xpath("//*[@id='x']").unwrap();
        assert!(any.tag.is_none());

        assert!(Selector::xpath("//div/span").is_err());
        assert!(Selector::xpath("//div[contains(@class,'x')]").is_err());
    }

    #[test]
    fn test_matches_node() {
        let node = MockNode::new("div")
            .id("menu")
            .class("nav sticky")
            .attr("data-cy", "nav")
            .text(" Menu ");

        assert!(Selector::css("div.nav").unwrap().matches(&node));
        assert!(Selector::css("#menu.sticky").unwrap().matches(&node));
        assert!(Selector::css("[data-cy=\"nav\"]").unwrap().matches(&node));
        assert!(!Selector::css("span.nav").unwrap().matches(&node));
        assert!(Selector::xpath("//div[text()='Menu']").unwrap().matches(&node));
    }

    #[tokio::test]
    async fn test_scheduled_presence() {
        let driver = MockDriver::new(vec![MockNode::new("div")
            .id("late")
            .appears_after(Duration::from_millis(50))]);
        let locator = Locator::id("late").unwrap();

        assert!(driver.find_element(&locator).await.unwrap_err().is_transient_lookup());
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(driver.find_element(&locator).await.is_ok());
    }

    #[tokio::test]
    async fn test_reload_detaches_handles() {
        let driver = MockDriver::new(vec![MockNode::new("input").id("name")]);
        let element = driver.find_element(&Locator::id("name").unwrap()).await.unwrap();
        driver.refresh().await.unwrap();

        let err = element.text().await.unwrap_err();
        assert!(matches!(err, Error::StaleElement(_)));
    }

    #[tokio::test]
    async fn test_quit_closes_session() {
        let driver = MockDriver::default();
        driver.quit().await.unwrap();
        assert!(driver.is_closed());
        assert!(driver.navigate("https://example.com").await.is_err());
    }
}
