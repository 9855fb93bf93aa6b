//! Locator types
//!
//! A [`Locator`] is the normalized `(strategy, value)` pair handed to the
//! browser driver, optionally narrowed to one match by a [`MatchIndex`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Element lookup strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Match the `id` attribute
    Id,
    /// Match a single class name
    ClassName,
    /// XPath expression
    XPath,
    /// CSS selector
    CssSelector,
}

impl Strategy {
    /// Human-readable strategy name
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Id => "id",
            Strategy::ClassName => "class name",
            Strategy::XPath => "xpath",
            Strategy::CssSelector => "css selector",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of several matching elements a locator refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchIndex {
    /// `.first`
    First,
    /// `.nth(n)`, zero-based
    Nth(usize),
}

impl MatchIndex {
    /// Zero-based position among all matches
    pub fn position(&self) -> usize {
        match self {
            MatchIndex::First => 0,
            MatchIndex::Nth(n) => *n,
        }
    }
}

/// Normalized element locator
///
/// Deserialization goes through [`Locator::new`], so a serialized locator
/// with an empty value is rejected like a constructed one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLocator")]
pub struct Locator {
    strategy: Strategy,
    value: String,
    index: Option<MatchIndex>,
}

#[derive(Deserialize)]
struct RawLocator {
    strategy: Strategy,
    value: String,
    #[serde(default)]
    index: Option<MatchIndex>,
}

impl TryFrom<RawLocator> for Locator {
    type Error = Error;

    fn try_from(raw: RawLocator) -> Result<Self> {
        let locator = Locator::new(raw.strategy, raw.value)?;
        Ok(match raw.index {
            Some(index) => locator.with_index(index),
            None => locator,
        })
    }
}

impl Locator {
    /// Create a locator, rejecting an empty value
    pub fn new<S: Into<String>>(strategy: Strategy, value: S) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(Error::invalid_selector(format!(
                "empty {} value",
                strategy.as_str()
            )));
        }
        Ok(Self {
            strategy,
            value,
            index: None,
        })
    }

    /// Locator by element id
    pub fn id<S: Into<String>>(value: S) -> Result<Self> {
        Self::new(Strategy::Id, value)
    }

    /// Locator by class name
    pub fn class_name<S: Into<String>>(value: S) -> Result<Self> {
        Self::new(Strategy::ClassName, value)
    }

    /// Locator by XPath
    pub fn xpath<S: Into<String>>(value: S) -> Result<Self> {
        Self::new(Strategy::XPath, value)
    }

    /// Locator by CSS selector
    pub fn css<S: Into<String>>(value: S) -> Result<Self> {
        Self::new(Strategy::CssSelector, value)
    }

    /// Parse any accepted selector notation
    pub fn parse(raw: &str) -> Result<Self> {
        super::normalizer::normalize(raw)
    }

    /// Narrow this locator to one match
    pub fn with_index(mut self, index: MatchIndex) -> Self {
        self.index = Some(index);
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn index(&self) -> Option<MatchIndex> {
        self.index
    }

    /// Render back to the bare selector notation.
    ///
    /// The match index is not part of the bare notation and is dropped.
    pub fn to_selector(&self) -> String {
        match self.strategy {
            Strategy::Id => format!("#{}", self.value),
            Strategy::ClassName => format!(".{}", self.value),
            Strategy::XPath | Strategy::CssSelector => self.value.clone(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.strategy, self.value)?;
        match self.index {
            Some(MatchIndex::First) => write!(f, ".first"),
            Some(MatchIndex::Nth(n)) => write!(f, ".nth({})", n),
            None => Ok(()),
        }
    }
}

impl std::str::FromStr for Locator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
