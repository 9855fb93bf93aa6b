//! Selector normalizer
//!
//! Translates the accepted selector notations into a [`Locator`]:
//!
//! 1. `<ns>.get_by_test_id(<literal>)` becomes `[data-testid="..."]`
//! 2. `<ns>.locator(<literal>)` with an optional `.first` / `.nth(n)` suffix
//! 3. a bare selector, classified by its leading characters
//!
//! String literals may be delimited by backticks, double or single quotes.
//! The opening and closing delimiters must match; the literal ends at the
//! delimiter that closes the call, so `page.locator("[data-cy="x"]")` keeps
//! its inner quotes.

use tracing::trace;

use super::types::{Locator, MatchIndex};
use crate::{Error, Result};

const TEST_ID_CALL: &str = "get_by_test_id";
const LOCATOR_CALL: &str = "locator";
const FIRST_MODIFIER: &str = ".first";
const NTH_MODIFIER: &str = ".nth(";
const QUOTES: [char; 3] = ['`', '"', '\''];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wrapper {
    TestId,
    Locator,
}

#[derive(Debug)]
struct Call<'a> {
    body: &'a str,
    index: Option<MatchIndex>,
}

/// Normalize a raw selector string into a [`Locator`]
pub fn normalize(raw: &str) -> Result<Locator> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(Error::invalid_selector("empty selector"));
    }

    let locator = match split_wrapper(input) {
        Some((Wrapper::TestId, rest)) => {
            let call = parse_call(rest, raw)?;
            with_index(
                Locator::css(format!("[data-testid=\"{}\"]", call.body))?,
                call.index,
            )
        }
        Some((Wrapper::Locator, rest)) => {
            let call = parse_call(rest, raw)?;
            with_index(classify(call.body)?, call.index)
        }
        None => classify(input)?,
    };

    trace!("Normalized selector {:?} to {}", raw, locator);
    Ok(locator)
}

fn with_index(locator: Locator, index: Option<MatchIndex>) -> Locator {
    match index {
        Some(index) => locator.with_index(index),
        None => locator,
    }
}

/// Classify a bare selector by its leading characters
fn classify(selector: &str) -> Result<Locator> {
    if selector.starts_with("//") {
        Locator::xpath(selector)
    } else if let Some(id) = selector.strip_prefix('#') {
        Locator::id(id)
    } else if let Some(class) = selector.strip_prefix('.') {
        Locator::class_name(class)
    } else {
        Locator::css(selector.replace("\\\"", "'"))
    }
}

/// Recognize `<ns>.<keyword>(` and return the text after the open paren
fn split_wrapper(input: &str) -> Option<(Wrapper, &str)> {
    let paren = input.find('(')?;
    let (namespace, keyword) = input[..paren].rsplit_once('.')?;

    if !is_identifier_path(namespace) {
        return None;
    }

    let wrapper = match keyword {
        TEST_ID_CALL => Wrapper::TestId,
        LOCATOR_CALL => Wrapper::Locator,
        _ => return None,
    };

    Some((wrapper, &input[paren + 1..]))
}

fn is_identifier_path(path: &str) -> bool {
    !path.is_empty() && path.split('.').all(is_identifier)
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Parse `<literal>)<modifiers>` following a wrapper's open paren
fn parse_call<'a>(rest: &'a str, raw: &str) -> Result<Call<'a>> {
    let mut remaining = rest.trim_end();
    let mut modifiers = Vec::new();

    loop {
        if let Some(stripped) = remaining.strip_suffix(FIRST_MODIFIER) {
            modifiers.push(MatchIndex::First);
            remaining = stripped;
        } else if let Some((stripped, n)) = strip_nth(remaining) {
            modifiers.push(MatchIndex::Nth(n));
            remaining = stripped;
        } else {
            break;
        }
    }

    if modifiers.len() > 1 {
        return Err(Error::invalid_selector(format!(
            "more than one match modifier in {:?}",
            raw
        )));
    }

    let args = remaining
        .strip_suffix(')')
        .ok_or_else(|| Error::invalid_selector(format!("unterminated call in {:?}", raw)))?;

    let body = unquote(args.trim(), raw)?;
    if body.is_empty() {
        return Err(Error::invalid_selector(format!("empty selector body in {:?}", raw)));
    }

    Ok(Call {
        body,
        index: modifiers.pop(),
    })
}

/// Strip a trailing `.nth(<digits>)` that follows the call or another modifier
fn strip_nth(s: &str) -> Option<(&str, usize)> {
    let inner = s.strip_suffix(')')?;
    let pos = inner.rfind(NTH_MODIFIER)?;
    let digits = &inner[pos + NTH_MODIFIER.len()..];
    let head = &inner[..pos];

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !(head.ends_with(')') || head.ends_with(FIRST_MODIFIER)) {
        return None;
    }

    digits.parse().ok().map(|n| (head, n))
}

/// Remove one layer of matching quote delimiters
fn unquote<'a>(literal: &'a str, raw: &str) -> Result<&'a str> {
    let open = literal.chars().next();
    let close = literal.chars().last();

    match (open, close) {
        (Some(open), Some(close)) if QUOTES.contains(&open) && literal.len() >= 2 => {
            if open != close {
                return Err(Error::invalid_selector(format!(
                    "mismatched quote delimiters {}...{} in {:?}",
                    open, close, raw
                )));
            }
            Ok(&literal[1..literal.len() - 1])
        }
        _ => Err(Error::invalid_selector(format!(
            "expected a quoted string literal in {:?}",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_path() {
        assert!(is_identifier_path("page"));
        assert!(is_identifier_path("self.page"));
        assert!(is_identifier_path("_p2"));
        assert!(!is_identifier_path(""));
        assert!(!is_identifier_path("div:not"));
        assert!(!is_identifier_path("2page"));
        assert!(!is_identifier_path("page."));
    }

    #[test]
    fn test_strip_nth() {
        assert_eq!(strip_nth(r#""li").nth(3)"#), Some((r#""li")"#, 3)));
        assert_eq!(strip_nth(r#""li.nth(2)")"#), None);
        assert_eq!(strip_nth(r#""li").nth()"#), None);
        assert_eq!(strip_nth(r#""li").nth(x)"#), None);
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'abc'", "raw").unwrap(), "abc");
        assert_eq!(unquote("`abc`", "raw").unwrap(), "abc");
        assert_eq!(unquote(r#""a"b""#, "raw").unwrap(), r#"a"b"#);
        assert!(unquote(r#""abc'"#, "raw").is_err());
        assert!(unquote("abc", "raw").is_err());
        assert!(unquote("\"", "raw").is_err());
    }
}
