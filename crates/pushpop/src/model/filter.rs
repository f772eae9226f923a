//! Filter predicates.
//!
//! A predicate decides whether an item belongs in the filtered set for the
//! current search pattern. Predicates receive a compiled [`Matcher`] rather
//! than the raw pattern so text matching stays consistent across stores.

use std::sync::Arc;

use regex::{Regex, RegexBuilder};

use crate::error::{Error, PredicateError, Result};
use crate::model::item::Item;

/// A compiled search pattern.
///
/// The pattern is matched literally, as a substring, case-insensitively unless
/// case sensitivity was requested.
#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: String,
    case_sensitive: bool,
    regex: Regex,
}

impl Matcher {
    pub fn new(pattern: &str, case_sensitive: bool) -> Result<Self> {
        let regex = RegexBuilder::new(&regex::escape(pattern))
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self {
            pattern: pattern.to_string(),
            case_sensitive,
            regex,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Whether `text` contains the pattern.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// A shared, fallible filter predicate.
///
/// Returning `Ok(true)` keeps the item. Predicates should be monotonic: if an
/// item fails pattern `p`, it must also fail every pattern that starts with
/// `p`. Stores rely on this to refine the previous result instead of
/// rescanning every item.
pub type FilterPredicate =
    Arc<dyn Fn(&Matcher, &Item) -> std::result::Result<bool, PredicateError> + Send + Sync>;

/// The default predicate: the item's title contains the pattern.
///
/// Items without a string title never match.
pub fn title_contains() -> FilterPredicate {
    Arc::new(|matcher: &Matcher, item: &Item| {
        Ok(item.title().is_some_and(|title| matcher.is_match(title)))
    })
}

/// Wrap an infallible predicate.
pub fn infallible<F>(predicate: F) -> FilterPredicate
where
    F: Fn(&Matcher, &Item) -> bool + Send + Sync + 'static,
{
    Arc::new(move |matcher: &Matcher, item: &Item| Ok(predicate(matcher, item)))
}
