//! Worksheet naming.
//!
//! Names are derived from the creditor's bare name (no city), never empty, free of
//! characters a workbook rejects and at most `max_len` characters long.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Characters a worksheet name may not contain.
const FORBIDDEN: &[char] = &['\\', '/', '*', '?', '[', ']', ':'];

/// Limits and fallback labels for worksheet names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetNamePolicy {
    /// Maximum length in characters (31 for xlsx).
    pub max_len: usize,
    /// Used when a creditor has neither name nor code.
    pub fallback_label: String,
    /// Used when sanitizing leaves nothing.
    pub default_label: String,
}

impl Default for SheetNamePolicy {
    fn default() -> Self {
        Self {
            max_len: 31,
            fallback_label: "Kreditor".into(),
            default_label: "Sheet".into(),
        }
    }
}

impl SheetNamePolicy {
    /// Base name for a creditor: bare name, else code, else the fallback label.
    pub fn base_name(&self, name: &str, code: &str) -> String {
        let raw = [name, code, self.fallback_label.as_str()]
            .into_iter()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or("");
        self.sanitize(raw)
    }

    /// Replace each run of forbidden characters with one underscore, trim and
    /// truncate.
    pub fn sanitize(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        let mut in_run = false;
        for c in raw.chars() {
            if FORBIDDEN.contains(&c) {
                if !in_run {
                    out.push('_');
                }
                in_run = true;
            } else {
                in_run = false;
                if !c.is_control() {
                    out.push(c);
                }
            }
        }
        let name = truncate(out.trim().trim_matches('\''), self.max_len);
        if name.is_empty() || name.eq_ignore_ascii_case("history") {
            return truncate(&self.default_label, self.max_len);
        }
        name
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    s.chars()
        .take(max_len)
        .collect::<String>()
        .trim_end()
        .trim_end_matches('\'')
        .to_string()
}

/// Hands out case-insensitively unique sheet names for one workbook.
#[derive(Debug, Clone, Default)]
pub struct SheetNamer {
    policy: SheetNamePolicy,
    taken: HashSet<String>,
}

impl SheetNamer {
    pub fn new(policy: SheetNamePolicy) -> Self {
        Self {
            policy,
            taken: HashSet::new(),
        }
    }

    pub fn policy(&self) -> &SheetNamePolicy {
        &self.policy
    }

    /// Claim a unique name for a creditor, appending " (2)", " (3)", ... on
    /// collision and shortening the base so the suffix fits.
    pub fn claim(&mut self, name: &str, code: &str) -> String {
        let base = self.policy.base_name(name, code);
        if self.taken.insert(base.to_lowercase()) {
            return base;
        }
        let mut n: usize = 2;
        loop {
            let suffix = format!(" ({n})");
            let room = self.policy.max_len.saturating_sub(suffix.chars().count());
            let candidate = format!("{}{suffix}", truncate(&base, room));
            if self.taken.insert(candidate.to_lowercase()) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_runs_become_one_underscore() {
        let policy = SheetNamePolicy::default();
        assert_eq!(policy.sanitize("Müller/Schmidt GmbH"), "Müller_Schmidt GmbH");
        assert_eq!(policy.sanitize("A[*?]B"), "A_B");
        assert_eq!(policy.sanitize("Bau: Nord"), "Bau_ Nord");
        assert_eq!(policy.sanitize("  'Quote'  "), "Quote");
    }

    #[test]
    fn truncates_to_31_characters() {
        let policy = SheetNamePolicy::default();
        let name = policy.sanitize(&"ä".repeat(40));
        assert_eq!(name.chars().count(), 31);
    }

    #[test]
    fn never_empty() {
        let policy = SheetNamePolicy::default();
        assert_eq!(policy.sanitize("   "), "Sheet");
        assert_eq!(policy.sanitize("History"), "Sheet");
        assert_eq!(policy.base_name("", "4711"), "4711");
        assert_eq!(policy.base_name(" ", ""), "Kreditor");
    }

    #[test]
    fn collisions_get_numbered() {
        let mut namer = SheetNamer::default();
        assert_eq!(namer.claim("Acme", "1"), "Acme");
        assert_eq!(namer.claim("ACME", "2"), "ACME (2)");
        assert_eq!(namer.claim("Acme", "3"), "Acme (3)");
    }

    #[test]
    fn suffix_fits_within_limit() {
        let mut namer = SheetNamer::default();
        let long = "X".repeat(40);
        let first = namer.claim(&long, "1");
        let second = namer.claim(&long, "2");
        assert_eq!(first.chars().count(), 31);
        assert_eq!(second.chars().count(), 31);
        assert!(second.ends_with(" (2)"));
    }
}
