//! Cost-center legend: classification code → claim status label.

use serde::{Deserialize, Serialize};

use super::normalize::digits_only;

/// Lookup table from classification codes to human-readable labels.
///
/// Entries keep their insertion order; the first entry for a code wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostCenterTable {
    entries: Vec<(String, String)>,
}

impl Default for CostCenterTable {
    fn default() -> Self {
        Self::from_pairs([
            ("9099100", "Anerkannt"),
            ("9099200", "Bedingt anerkannt"),
            ("9099300", "Bestritten"),
            ("9099400", "Massa"),
        ])
    }
}

impl CostCenterTable {
    /// An empty table; every code resolves to itself.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_pairs<C, L>(pairs: impl IntoIterator<Item = (C, L)>) -> Self
    where
        C: Into<String>,
        L: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(c, l)| (c.into(), l.into()))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    fn get(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, label)| label.as_str())
    }

    /// Map a raw classification code to its label.
    ///
    /// Looks up the digit-only form first, then the trimmed code itself;
    /// an unknown code is returned trimmed and otherwise unchanged.
    pub fn resolve(&self, code: &str) -> String {
        let code = code.trim();
        let digits = digits_only(code);
        let by_digits = if digits.is_empty() {
            None
        } else {
            self.get(&digits)
        };
        by_digits
            .or_else(|| self.get(code))
            .unwrap_or(code)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_codes() {
        let table = CostCenterTable::default();
        assert_eq!(table.resolve("9099100"), "Anerkannt");
        assert_eq!(table.resolve(" 9099200 "), "Bedingt anerkannt");
        assert_eq!(table.resolve("9099300"), "Bestritten");
        assert_eq!(table.resolve("9099400"), "Massa");
    }

    #[test]
    fn separators_are_ignored() {
        let table = CostCenterTable::default();
        assert_eq!(table.resolve("909-9100"), "Anerkannt");
        assert_eq!(table.resolve("9099100.0"), "Anerkannt");
    }

    #[test]
    fn unknown_code_passes_through() {
        let table = CostCenterTable::default();
        assert_eq!(table.resolve("9999999"), "9999999");
        assert_eq!(table.resolve("  XY "), "XY");
        assert_eq!(table.resolve(""), "");
    }

    #[test]
    fn falls_back_to_raw_code_key() {
        let table = CostCenterTable::from_pairs([("KS-A", "Sonderfall")]);
        assert_eq!(table.resolve(" KS-A "), "Sonderfall");
        // digit form "1" is unknown, raw key is unknown too
        assert_eq!(table.resolve("KS-1"), "KS-1");
    }
}
