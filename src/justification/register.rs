//! Justification register: free-text justifications keyed by
//! (creditor name, reference number), read from a secondary table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::normalize::{name_key, reference_key, text};
use crate::core::Table;

/// Accepted header spellings per logical register field, in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterSynonyms {
    pub name: Vec<String>,
    pub reference: Vec<String>,
    pub text: Vec<String>,
}

impl Default for RegisterSynonyms {
    fn default() -> Self {
        fn list(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }
        Self {
            name: list(&[
                "Name",
                "Kreditor",
                "Kreditorname",
                "Lieferant",
                "ithSupplierName",
                "Supplier",
            ]),
            reference: list(&["ER", "ER Nr.", "ER-Nr.", "RE-Nr.", "Rechnungsnummer", "Reference"]),
            text: list(&[
                "Kommentar Begründung",
                "Begründung",
                "Kommentar",
                "Justification",
            ]),
        }
    }
}

/// Column positions of the three logical register fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterColumns {
    pub name: usize,
    pub reference: usize,
    pub text: usize,
}

fn header_eq(a: &str, b: &str) -> bool {
    let fold = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    fold(a) == fold(b)
}

/// First synonym (in priority order) that matches any header wins; among
/// equal headers the leftmost column wins.
fn find_column(headers: &[String], synonyms: &[String]) -> Option<usize> {
    synonyms
        .iter()
        .find_map(|syn| headers.iter().position(|h| header_eq(h, syn)))
}

impl RegisterSynonyms {
    /// Resolve all three fields against `headers`, or `None` if any is missing.
    pub fn resolve(&self, headers: &[String]) -> Option<RegisterColumns> {
        Some(RegisterColumns {
            name: find_column(headers, &self.name)?,
            reference: find_column(headers, &self.reference)?,
            text: find_column(headers, &self.text)?,
        })
    }
}

/// Composite register key: normalized creditor name and reference number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegisterKey {
    pub name: String,
    pub reference: String,
}

impl RegisterKey {
    pub fn new(name: &str, reference: &str) -> Self {
        Self {
            name: name_key(name),
            reference: reference_key(reference),
        }
    }

    fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.reference.is_empty()
    }
}

/// Read-only index of justification texts, built once per run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JustificationRegister {
    index: HashMap<RegisterKey, Vec<String>>,
}

impl JustificationRegister {
    /// A register without entries; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the register from a table.
    ///
    /// The header row is the first of the leading `header_scan_rows` rows
    /// (the table's own header row counts as row 0) in which every field
    /// resolves. When none does, the register is empty. Rows without text,
    /// name or reference number are skipped; texts for the same key
    /// accumulate in row order.
    pub fn from_table(table: &Table, synonyms: &RegisterSynonyms, header_scan_rows: usize) -> Self {
        let Some((header_row, columns)) = locate_header(table, synonyms, header_scan_rows) else {
            warn!(
                headers = ?table.headers,
                "justification register: name/reference/text columns not found, register left empty"
            );
            return Self::empty();
        };
        let table = if header_row == 0 {
            table.clone()
        } else {
            table.promote_header(header_row)
        };

        let mut register = Self::empty();
        for (row_no, row) in table.rows.iter().enumerate() {
            let cell = |i: usize| row.get(i).map(text).unwrap_or_default();
            let reason = cell(columns.text);
            if reason.is_empty() {
                continue;
            }
            let key = RegisterKey::new(&cell(columns.name), &cell(columns.reference));
            if !key.is_complete() {
                debug!(row = row_no, "justification register: row without name or reference skipped");
                continue;
            }
            register.insert(key, reason);
        }

        info!(
            keys = register.index.len(),
            texts = register.text_count(),
            "justification register indexed"
        );
        register
    }

    /// Append `text` to the list at `key`.
    pub fn insert(&mut self, key: RegisterKey, text: impl Into<String>) {
        self.index.entry(key).or_default().push(text.into());
    }

    /// All texts for a creditor name and reference number, in insertion order.
    pub fn lookup(&self, creditor_name: &str, reference_number: &str) -> &[String] {
        self.index
            .get(&RegisterKey::new(creditor_name, reference_number))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn text_count(&self) -> usize {
        self.index.values().map(Vec::len).sum()
    }
}

fn locate_header(
    table: &Table,
    synonyms: &RegisterSynonyms,
    header_scan_rows: usize,
) -> Option<(usize, RegisterColumns)> {
    if let Some(columns) = synonyms.resolve(&table.headers) {
        return Some((0, columns));
    }
    table
        .rows
        .iter()
        .take(header_scan_rows)
        .enumerate()
        .find_map(|(i, row)| {
            let headers: Vec<String> = row.iter().map(text).collect();
            synonyms.resolve(&headers).map(|c| (i + 1, c))
        })
}

impl From<&[(&str, &str, &str)]> for JustificationRegister {
    fn from(rows: &[(&str, &str, &str)]) -> Self {
        let mut register = Self::empty();
        for (name, reference, reason) in rows {
            let key = RegisterKey::new(name, reference);
            if key.is_complete() && !reason.trim().is_empty() {
                register.insert(key, reason.trim());
            }
        }
        register
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RawValue;

    fn t(s: &str) -> RawValue {
        RawValue::Text(s.into())
    }

    #[test]
    fn synonyms_are_case_and_space_insensitive() {
        let headers: Vec<String> = vec!["  er nr. ".into(), "KREDITOR".into(), "kommentar  begründung".into()];
        let cols = RegisterSynonyms::default().resolve(&headers).unwrap();
        assert_eq!(cols, RegisterColumns { name: 1, reference: 0, text: 2 });
    }

    #[test]
    fn first_synonym_wins() {
        // "Kommentar Begründung" outranks "Begründung"
        let headers: Vec<String> = vec![
            "Name".into(),
            "ER".into(),
            "Begründung".into(),
            "Kommentar Begründung".into(),
        ];
        let cols = RegisterSynonyms::default().resolve(&headers).unwrap();
        assert_eq!(cols.text, 3);
    }

    #[test]
    fn builds_index_and_accumulates_duplicates() {
        let table = Table::new(
            vec!["Name".into(), "ER".into(), "Kommentar Begründung".into()],
            vec![
                vec![t("Acme"), t("0959-168"), t("Lorem")],
                vec![t("Acme"), RawValue::Number(959168.0), t("Ipsum")],
                vec![t("Acme"), t("111"), t("  ")],
                vec![t(""), t("222"), t("orphan")],
            ],
        );
        let register = JustificationRegister::from_table(&table, &RegisterSynonyms::default(), 5);
        assert_eq!(register.len(), 1);
        assert_eq!(register.lookup("Acme", "959168"), ["Lorem", "Ipsum"]);
        assert!(register.lookup("Acme", "111").is_empty());
    }

    #[test]
    fn header_below_title_row_is_found() {
        let table = Table::new(
            vec!["NA15 Begründungen".into()],
            vec![
                vec![t("ER"), t("Name"), t("Kommentar Begründung")],
                vec![t("4711"), t("Beta GmbH"), t("Doppelt verrechnet")],
            ],
        );
        let register = JustificationRegister::from_table(&table, &RegisterSynonyms::default(), 5);
        assert_eq!(register.lookup("beta gmbh", "4711"), ["Doppelt verrechnet"]);
    }

    #[test]
    fn unrecognized_headers_yield_empty_register() {
        let table = Table::new(
            vec!["Foo".into(), "Bar".into()],
            vec![vec![t("Acme"), t("1")]],
        );
        let register = JustificationRegister::from_table(&table, &RegisterSynonyms::default(), 5);
        assert!(register.is_empty());
    }

    #[test]
    fn header_scan_depth_is_bounded() {
        let mut rows = vec![vec![t("")]; 3];
        rows.push(vec![t("Name"), t("ER"), t("Begründung")]);
        rows.push(vec![t("Acme"), t("1"), t("x")]);
        let table = Table::new(vec!["".into()], rows);
        assert!(JustificationRegister::from_table(&table, &RegisterSynonyms::default(), 3).is_empty());
        assert_eq!(
            JustificationRegister::from_table(&table, &RegisterSynonyms::default(), 4).len(),
            1
        );
    }
}
