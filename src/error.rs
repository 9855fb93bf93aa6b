//! Unified error types for Order-E2E

use thiserror::Error;

/// Unified Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
///
/// Every wait-based operation reports its failure through one of these kinds,
/// so callers can branch on the category without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Element never became present
    NotFound,
    /// Element present but never visible
    NotVisible,
    /// Explicit contract violation
    AssertionFailed,
    /// Timed-out precondition
    Timeout,
    /// Selector could not be normalized
    InvalidSelector,
    /// Failure reported by the browser driver
    Driver,
    /// Invalid configuration
    Configuration,
    /// Local I/O
    Io,
}

/// Unified error type for Order-E2E
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// WebDriver protocol errors not covered by a dedicated variant
    #[error("WebDriver error: {0}")]
    WebDriver(String),

    /// Driver found no element for a single immediate lookup
    #[error("No such element: {0}")]
    NoSuchElement(String),

    /// Element handle no longer attached to the document
    #[error("Stale element reference: {0}")]
    StaleElement(String),

    /// Native click landed on another element
    #[error("Element click intercepted: {0}")]
    ClickIntercepted(String),

    /// Element cannot be interacted with natively
    #[error("Element not interactable: {0}")]
    NotInteractable(String),

    /// Script execution failed
    #[error("Script execution failed: {0}")]
    ScriptExecutionFailed(String),

    /// Element never became present before the timeout
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Element present but never visible before the timeout
    #[error("Element not visible: {0}")]
    ElementNotVisible(String),

    /// Assertion failed
    #[error("Assertion failed: {0}")]
    Assertion(String),

    /// Timeout
    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// Selector string could not be normalized
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new WebDriver error
    pub fn webdriver<S: Into<String>>(msg: S) -> Self {
        Error::WebDriver(msg.into())
    }

    /// Create a new no-such-element error
    pub fn no_such_element<S: Into<String>>(msg: S) -> Self {
        Error::NoSuchElement(msg.into())
    }

    /// Create a new stale element error
    pub fn stale_element<S: Into<String>>(msg: S) -> Self {
        Error::StaleElement(msg.into())
    }

    /// Create a new click intercepted error
    pub fn click_intercepted<S: Into<String>>(msg: S) -> Self {
        Error::ClickIntercepted(msg.into())
    }

    /// Create a new not interactable error
    pub fn not_interactable<S: Into<String>>(msg: S) -> Self {
        Error::NotInteractable(msg.into())
    }

    /// Create a new script execution failed error
    pub fn script_execution_failed<S: Into<String>>(msg: S) -> Self {
        Error::ScriptExecutionFailed(msg.into())
    }

    /// Create a new element not found error
    pub fn element_not_found<S: Into<String>>(msg: S) -> Self {
        Error::ElementNotFound(msg.into())
    }

    /// Create a new element not visible error
    pub fn element_not_visible<S: Into<String>>(msg: S) -> Self {
        Error::ElementNotVisible(msg.into())
    }

    /// Create a new assertion error
    pub fn assertion<S: Into<String>>(msg: S) -> Self {
        Error::Assertion(msg.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Error::Timeout(msg.into())
    }

    /// Create a new invalid selector error
    pub fn invalid_selector<S: Into<String>>(msg: S) -> Self {
        Error::InvalidSelector(msg.into())
    }

    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NoSuchElement(_) | Error::ElementNotFound(_) => ErrorKind::NotFound,
            Error::ElementNotVisible(_) => ErrorKind::NotVisible,
            Error::Assertion(_) => ErrorKind::AssertionFailed,
            Error::Timeout(_) => ErrorKind::Timeout,
            Error::InvalidSelector(_) => ErrorKind::InvalidSelector,
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::Io(_) => ErrorKind::Io,
            Error::Serialization(_)
            | Error::WebDriver(_)
            | Error::StaleElement(_)
            | Error::ClickIntercepted(_)
            | Error::NotInteractable(_)
            | Error::ScriptExecutionFailed(_)
            | Error::Internal(_) => ErrorKind::Driver,
        }
    }

    /// Lookup failures that a polling loop should absorb and retry.
    pub fn is_transient_lookup(&self) -> bool {
        matches!(self, Error::NoSuchElement(_) | Error::StaleElement(_))
    }

    /// Native click failures that warrant the scripted click fallback.
    pub fn is_click_fallback_trigger(&self) -> bool {
        matches!(
            self,
            Error::Timeout(_) | Error::ClickIntercepted(_) | Error::NotInteractable(_)
        )
    }
}
