//! Page objects
//!
//! Each page object owns the locators of one page and exposes the steps a
//! scenario performs on it, delegating every element interaction to
//! [`ElementActions`](crate::actions::ElementActions).

pub mod order_page;

pub use order_page::{OrderPage, OrderPageLocators, ServiceType};
