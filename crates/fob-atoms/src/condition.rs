//! Rule match conditions.

use regex::Regex;
use serde::{Serialize, Serializer};

/// A compiled path pattern.
///
/// Serializes as its regex source and compares by source, so two rules built
/// from the same pattern are structurally equal.
#[derive(Debug, Clone)]
pub struct Matcher(Regex);

impl Matcher {
    /// Compile a pattern known to be valid.
    ///
    /// Only used for the crate's built-in extension patterns; user supplied
    /// patterns go through `AtomsOptions::vendor_regex`.
    pub(crate) fn builtin(pattern: &'static str) -> Self {
        match Regex::new(pattern) {
            Ok(regex) => Self(regex),
            Err(err) => unreachable!("built-in pattern {pattern:?} failed to compile: {err}"),
        }
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.0.is_match(path)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.0
    }
}

impl From<Regex> for Matcher {
    fn from(regex: Regex) -> Self {
        Self(regex)
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Matcher {}

impl Serialize for Matcher {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One pattern or a list of patterns where any may match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Condition {
    Match(Matcher),
    Any(Vec<Matcher>),
}

impl Condition {
    pub fn is_match(&self, path: &str) -> bool {
        match self {
            Condition::Match(matcher) => matcher.is_match(path),
            Condition::Any(matchers) => matchers.iter().any(|m| m.is_match(path)),
        }
    }
}

impl From<Matcher> for Condition {
    fn from(matcher: Matcher) -> Self {
        Condition::Match(matcher)
    }
}

impl From<Vec<Matcher>> for Condition {
    fn from(matchers: Vec<Matcher>) -> Self {
        Condition::Any(matchers)
    }
}
