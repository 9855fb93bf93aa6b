//! # Element actions
//!
//! Wait-aware element operations for page objects.
//!
//! Every operation re-resolves its locator on each poll; element handles are
//! never cached across polls because the page may re-render at any time.
//!
//! ## Module structure
//! - `wait`: the [`WaitPolicy`] and the bounded [`Waiter`] poller
//! - `conditions`: single-shot checks (presence, visibility, clickability, ...)
//! - `element`: [`ElementActions`], the operations page objects call
//!
//! ## Example
//! ```rust
//! use order_e2e::actions::{ElementActions, WaitPolicy};
//! use order_e2e::driver::{MockDriver, MockNode};
//! use order_e2e::locator::Locator;
//! use std::sync::Arc;
//!
//! # async fn example() -> order_e2e::Result<()> {
//! let driver = MockDriver::new(vec![MockNode::new("nav").id("category-navbar")]);
//! let actions = ElementActions::new(Arc::new(driver), WaitPolicy::default());
//!
//! let menu = Locator::parse("page.locator(\"#category-navbar\")")?;
//! assert!(actions.is_visible(&menu).await);
//! # Ok(())
//! # }
//! ```

pub mod wait;
pub mod conditions;
pub mod element;


pub use element::ElementActions;
pub use wait::{WaitPolicy, Waiter};
