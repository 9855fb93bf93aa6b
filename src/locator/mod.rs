//! # Locator normalization
//!
//! Page objects describe elements with selector strings written in whichever
//! notation was convenient when the page was recorded. This module turns
//! those strings into a normalized [`Locator`] the driver understands.
//!
//! ## Accepted notations
//! - `page.get_by_test_id('component-id')`
//! - `page.locator('[data-cy="x"]')`, with `"`, `'` or `` ` `` delimiters
//! - `page.locator(".item").first` / `page.locator(".item").nth(2)`
//! - bare selectors: `//xpath`, `#id`, `.class`, anything else is CSS
//!
//! ## Example
//! ```rust
//! use order_e2e::locator::{Locator, Strategy};
//!
//! let locator = Locator::parse("#category-navbar").unwrap();
//! assert_eq!(locator.strategy(), Strategy::Id);
//! assert_eq!(locator.value(), "category-navbar");
//! ```

pub mod types;
pub mod normalizer;

#[cfg(test)]
pub mod tests;

pub use normalizer::normalize;
pub use types::{Locator, MatchIndex, Strategy};
