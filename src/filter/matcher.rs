//! Operator semantics.
//!
//! `=~` / `!~` run the match expression as a regular expression.
//! `#` / `!#` treat it as a comma-separated list of terms, each matched
//! literally between word boundaries. A term prefixed with `(?i)` is matched
//! case-insensitively.
//!
//! Term boundaries are ASCII word boundaries. Regex rules are compiled with
//! the `regex` crate defaults, where `\b`, `\w` and `\d` are Unicode-aware:
//! `=~ \bfoo\b` does not match `éfoo`, because `é` counts as a word character.

use std::collections::HashMap;

use regex::Regex;
use tracing::error;

use crate::rules::Operator;

/// Marker that makes a single term case-insensitive.
pub const CASE_INSENSITIVE: &str = "(?i)";

/// ASCII word boundary, so `\w` means `[0-9A-Za-z_]` around terms.
const WORD_BOUNDARY: &str = r"(?-u:\b)";

/// Evaluates operators, caching compiled patterns.
///
/// A pattern that fails to compile is logged once and then never matches.
#[derive(Debug, Default)]
pub struct Matcher {
    cache: HashMap<String, Option<Regex>>,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matches(&mut self, operator: &Operator, expr: &str, target: &str) -> bool {
        match operator {
            Operator::Matches | Operator::NotMatches => match self.compiled(expr) {
                Some(re) => re.is_match(target) != operator.is_negated(),
                None => false,
            },
            Operator::Contains | Operator::NotContains => {
                self.contains_term(expr, target) != operator.is_negated()
            }
            Operator::Unknown(_) => false,
        }
    }

    fn contains_term(&mut self, expr: &str, target: &str) -> bool {
        expr.split(',').any(|token| {
            let pattern = term_pattern(token);
            self.compiled(&pattern)
                .is_some_and(|re| re.is_match(target))
        })
    }

    fn compiled(&mut self, pattern: &str) -> Option<&Regex> {
        if !self.cache.contains_key(pattern) {
            let compiled = match Regex::new(pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    error!(pattern, error = %e, "invalid pattern in killfile, rule will not match");
                    None
                }
            };
            self.cache.insert(pattern.to_string(), compiled);
        }
        self.cache.get(pattern).and_then(Option::as_ref)
    }
}

/// One-shot evaluation without a shared pattern cache.
pub fn matches(operator: &Operator, expr: &str, target: &str) -> bool {
    Matcher::new().matches(operator, expr, target)
}

/// Regex source for a single term: escaped and anchored on word boundaries.
pub fn term_pattern(token: &str) -> String {
    let (flags, term) = match token.strip_prefix(CASE_INSENSITIVE) {
        Some(term) => (CASE_INSENSITIVE, term),
        None => ("", token),
    };
    format!(
        "{flags}{WORD_BOUNDARY}{}{WORD_BOUNDARY}",
        regex::escape(term)
    )
}
