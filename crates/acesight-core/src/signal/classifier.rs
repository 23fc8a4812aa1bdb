//! Fragment matching against noisy recognized text.

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{Error, Result};

/// How the fragments of a rule combine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// At least one fragment must be present
    AnyOf,
    /// Every fragment must be present
    AllOf,
}

/// One tag and the fragments that detect it
#[derive(Debug, Clone)]
pub struct FragmentRule<T> {
    pub tag: T,
    pub policy: MatchPolicy,
    /// Lowercased fragments
    fragments: Vec<String>,
}

impl<T> FragmentRule<T> {
    pub fn new<S: AsRef<str>>(tag: T, policy: MatchPolicy, fragments: &[S]) -> Self {
        Self {
            tag,
            policy,
            fragments: fragments
                .iter()
                .map(|f| f.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Match against text that is already lowercased
    fn matches_lowercase(&self, text: &str) -> bool {
        match self.policy {
            MatchPolicy::AnyOf => fuzzy_contains(text, &self.fragments),
            MatchPolicy::AllOf => self.fragments.iter().all(|f| text.contains(f.as_str())),
        }
    }
}

/// Return true if any of the fragments occurs in the text
pub fn fuzzy_contains<S: AsRef<str>>(text: &str, fragments: &[S]) -> bool {
    fragments.iter().any(|f| text.contains(f.as_ref()))
}

/// Validated, ordered table of fragment rules
///
/// Construction rejects empty fragments, rules without fragments and
/// duplicate tags.
#[derive(Debug, Clone)]
pub struct FragmentTable<T> {
    rules: Vec<FragmentRule<T>>,
}

impl<T> FragmentTable<T>
where
    T: Copy + Eq + Hash + Debug,
{
    pub fn new(rules: Vec<FragmentRule<T>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.tag) {
                return Err(Error::InvalidFragmentTable(format!(
                    "duplicate tag {:?}",
                    rule.tag
                )));
            }
            if rule.fragments.is_empty() {
                return Err(Error::InvalidFragmentTable(format!(
                    "tag {:?} has no fragments",
                    rule.tag
                )));
            }
            if rule.fragments.iter().any(|f| f.is_empty()) {
                return Err(Error::InvalidFragmentTable(format!(
                    "tag {:?} has an empty fragment",
                    rule.tag
                )));
            }
        }
        Ok(Self { rules })
    }

    /// Build a table from static `(tag, policy, fragments)` entries
    pub fn from_entries(entries: &[(T, MatchPolicy, &[&str])]) -> Result<Self> {
        Self::new(
            entries
                .iter()
                .map(|(tag, policy, fragments)| FragmentRule::new(*tag, *policy, *fragments))
                .collect(),
        )
    }

    /// Tags whose rule matches, in table order
    pub fn classify(&self, text: &str) -> Vec<T> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let text = text.to_lowercase();
        self.rules
            .iter()
            .filter(|rule| rule.matches_lowercase(&text))
            .map(|rule| rule.tag)
            .collect()
    }

    /// Whether a single tag matches the text
    pub fn matches(&self, tag: T, text: &str) -> bool {
        let text = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.tag == tag)
            .is_some_and(|rule| rule.matches_lowercase(&text))
    }

    pub fn rules(&self) -> &[FragmentRule<T>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Classify `text` against `table`
pub fn classify<T>(text: &str, table: &FragmentTable<T>) -> Vec<T>
where
    T: Copy + Eq + Hash + Debug,
{
    table.classify(text)
}
