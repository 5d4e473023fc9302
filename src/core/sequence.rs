//! Claim sequence keys.
//!
//! Claims print in ascending claim-sequence order, which is encoded in the
//! semi-structured claim id ("K-2024_12", "C007"). Ids that carry no usable
//! number sort after every numbered claim.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::types::LineItem;

/// Sort key derived from a claim id.
///
/// `Number` always orders before `Unparsed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SequenceKey {
    Number(i64),
    Unparsed,
}

/// Rules for extracting a [`SequenceKey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencePolicy {
    /// Letter prefix of claim ids whose last digit run is the sequence number.
    pub prefix: char,
}

impl Default for SequencePolicy {
    fn default() -> Self {
        Self { prefix: 'C' }
    }
}

impl SequencePolicy {
    /// Derive the sort key of a claim id. First matching rule wins:
    ///
    /// 1. contains `_`: the integer after the last underscore;
    /// 2. starts with the prefix and has more characters: the last digit run;
    /// 3. otherwise [`SequenceKey::Unparsed`].
    pub fn key(&self, identifier: &str) -> SequenceKey {
        let id = identifier.trim();

        if let Some((_, tail)) = id.rsplit_once('_') {
            return tail
                .trim()
                .parse::<i64>()
                .map(SequenceKey::Number)
                .unwrap_or(SequenceKey::Unparsed);
        }

        let mut chars = id.chars();
        if chars.next() == Some(self.prefix) && chars.next().is_some() {
            return last_digit_run(id)
                .and_then(|run| run.parse::<i64>().ok())
                .map(SequenceKey::Number)
                .unwrap_or(SequenceKey::Unparsed);
        }

        SequenceKey::Unparsed
    }

    /// Stable sort of line items by the key of their claim id.
    pub fn sort(&self, items: &mut [LineItem]) {
        items.sort_by_cached_key(|item| self.key(&item.claim_id));
    }

    /// Compare two claim ids by key.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.key(a).cmp(&self.key(b))
    }
}

fn last_digit_run(s: &str) -> Option<&str> {
    let end = s.rfind(|c: char| c.is_ascii_digit())? + 1;
    let (start, _) = s[..end]
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()?;
    Some(&s[start..end])
}
