//! Normalizer behaviour tests

use super::normalize;
use super::types::{Locator, MatchIndex, Strategy};
use crate::ErrorKind;

fn pair(raw: &str) -> (Strategy, String) {
    let locator = normalize(raw).expect("selector should normalize");
    (locator.strategy(), locator.value().to_string())
}

#[test]
fn test_bare_xpath() {
    assert_eq!(
        pair("//button[@type='submit']"),
        (Strategy::XPath, "//button[@type='submit']".to_string())
    );
}

#[test]
fn test_bare_id() {
    assert_eq!(
        pair("#category-navbar"),
        (Strategy::Id, "category-navbar".to_string())
    );
}

#[test]
fn test_bare_class_name() {
    assert_eq!(
        pair(".menu-item"),
        (Strategy::ClassName, "menu-item".to_string())
    );
}

#[test]
fn test_bare_css_unescapes_quotes() {
    assert_eq!(
        pair(r#"[data-cy=\"x\"]"#),
        (Strategy::CssSelector, "[data-cy='x']".to_string())
    );
}

#[test]
fn test_bare_css_keeps_plain_quotes() {
    assert_eq!(
        pair(r#"button[data-cy="submit"]"#),
        (Strategy::CssSelector, r#"button[data-cy="submit"]"#.to_string())
    );
}

#[test]
fn test_get_by_test_id() {
    assert_eq!(
        pair(r#"page.get_by_test_id("foo")"#),
        (Strategy::CssSelector, r#"[data-testid="foo"]"#.to_string())
    );
    assert_eq!(
        pair("page.get_by_test_id('component-id')"),
        (Strategy::CssSelector, r#"[data-testid="component-id"]"#.to_string())
    );
}

#[test]
fn test_locator_wrapper_delimiters() {
    let expected = (
        Strategy::CssSelector,
        r#"[data-sentry-component="HeaderAvatar"]"#.to_string(),
    );
    assert_eq!(pair(r#"page.locator('[data-sentry-component="HeaderAvatar"]')"#), expected);
    assert_eq!(pair(r#"page.locator(`[data-sentry-component="HeaderAvatar"]`)"#), expected);
    assert_eq!(pair(r#"page.locator("[data-sentry-component="HeaderAvatar"]")"#), expected);
}

#[test]
fn test_locator_wrapper_escaped_quotes() {
    assert_eq!(
        pair(r#"page.locator("[data-testid=\"GeneralIndicator\"]")"#),
        (Strategy::CssSelector, "[data-testid='GeneralIndicator']".to_string())
    );
}

#[test]
fn test_locator_wrapper_classifies_inner_selector() {
    assert_eq!(
        pair(r##"page.locator("#category-navbar")"##),
        (Strategy::Id, "category-navbar".to_string())
    );
    assert_eq!(
        pair("page.locator('.address-suggestion')"),
        (Strategy::ClassName, "address-suggestion".to_string())
    );
    assert_eq!(
        pair(r#"page.locator("//li[@role='option']")"#),
        (Strategy::XPath, "//li[@role='option']".to_string())
    );
}

#[test]
fn test_first_modifier_is_kept() {
    let locator = normalize("page.locator('.address-suggestion').first").unwrap();
    assert_eq!(locator.strategy(), Strategy::ClassName);
    assert_eq!(locator.value(), "address-suggestion");
    assert_eq!(locator.index(), Some(MatchIndex::First));
}

#[test]
fn test_nth_modifier_is_kept() {
    let locator = normalize(r#"page.locator("[role=\"tab\"]").nth(1)"#).unwrap();
    assert_eq!(locator.value(), "[role='tab']");
    assert_eq!(locator.index(), Some(MatchIndex::Nth(1)));
    assert_eq!(locator.to_string(), "(css selector, [role='tab']).nth(1)");
}

#[test]
fn test_nth_inside_literal_is_not_a_modifier() {
    let locator = normalize(r#"page.locator("li.nth(2)")"#).unwrap();
    assert_eq!(locator.value(), "li.nth(2)");
    assert_eq!(locator.index(), None);
}

#[test]
fn test_dotted_namespace() {
    assert_eq!(
        pair("self.page.get_by_test_id('cart')"),
        (Strategy::CssSelector, r#"[data-testid="cart"]"#.to_string())
    );
}

#[test]
fn test_surrounding_whitespace_ignored() {
    assert_eq!(pair("  #main  "), (Strategy::Id, "main".to_string()));
}

#[test]
fn test_pseudo_class_call_is_bare_css() {
    assert_eq!(
        pair("li:not(.disabled)"),
        (Strategy::CssSelector, "li:not(.disabled)".to_string())
    );
}

#[test]
fn test_failures_are_invalid_selector() {
    let cases = [
        "",
        "   ",
        "#",
        ".",
        "page.locator('')",
        "page.locator(\"abc')",
        "page.locator(abc)",
        "page.locator('abc'",
        "page.get_by_test_id('')",
        "page.locator('li').first.nth(2)",
    ];
    for raw in cases {
        let err = normalize(raw).expect_err(raw);
        assert_eq!(err.kind(), ErrorKind::InvalidSelector, "{raw}");
    }
}

#[test]
fn test_bare_normalization_is_idempotent() {
    let cases = [
        "//div[@id='x']",
        "#category-navbar",
        ".menu-item",
        r#"[data-cy=\"x\"]"#,
        r#"page.get_by_test_id("foo")"#,
        "div > span.price",
    ];
    for raw in cases {
        let once = normalize(raw).unwrap();
        let twice = normalize(&once.to_selector()).unwrap();
        assert_eq!(once, twice, "{raw}");
    }
}

#[test]
fn test_from_str() {
    let locator: Locator = "#cart".parse().unwrap();
    assert_eq!(locator, Locator::id("cart").unwrap());
}

#[test]
fn test_locator_rejects_empty_value() {
    assert!(Locator::css("").is_err());
    assert!(Locator::xpath("").is_err());
}

#[test]
fn test_deserialize_rejects_empty_value() {
    let err = serde_json::from_str::<Locator>(r#"{"strategy":"id","value":"","index":null}"#)
        .unwrap_err();
    assert!(err.to_string().contains("empty id value"), "{err}");

    let locator: Locator =
        serde_json::from_str(r#"{"strategy":"css_selector","value":"li","index":{"Nth":2}}"#)
            .unwrap();
    assert_eq!(locator, Locator::css("li").unwrap().with_index(MatchIndex::Nth(2)));
}
