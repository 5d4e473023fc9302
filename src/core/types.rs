use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A raw cell value as delivered by a tabular dataset source.
///
/// The core never sees a file format; sources convert their cells into
/// this shape and the value normalizer turns them into typed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum RawValue {
    /// Absent or blank cell.
    #[default]
    Empty,
    /// Text cell.
    Text(String),
    /// Floating point cell (spreadsheets store every number this way).
    Number(f64),
    /// Integer cell.
    Int(i64),
    /// Boolean cell.
    Bool(bool),
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

/// A rectangular dataset with named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column names, in sheet order.
    pub headers: Vec<String>,
    /// Data rows. Rows may be shorter than `headers`; missing cells read as empty.
    pub rows: Vec<Vec<RawValue>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<RawValue>>) -> Self {
        Self { headers, rows }
    }

    /// Index of the column whose header equals `name` exactly (after trimming).
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name.trim())
    }

    /// Cell at `(row, col)`, or [`RawValue::Empty`] when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &RawValue {
        static EMPTY: RawValue = RawValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Re-read this table with row `index` as the header row.
    ///
    /// The current headers become the first data row, so `promote_header(0)`
    /// yields the first data row as headers. Rows above the new header are dropped.
    pub fn promote_header(&self, index: usize) -> Table {
        let mut all: Vec<Vec<RawValue>> = Vec::with_capacity(self.rows.len() + 1);
        all.push(self.headers.iter().map(|h| RawValue::Text(h.clone())).collect());
        all.extend(self.rows.iter().cloned());

        let mut rest = all.into_iter().skip(index);
        let headers = rest
            .next()
            .map(|row| row.iter().map(super::normalize::text).collect())
            .unwrap_or_default();
        Table {
            headers,
            rows: rest.collect(),
        }
    }
}

/// One claim / invoice record of the ledger, already normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Creditor (supplier) code; the grouping key.
    pub creditor_code: String,
    /// Creditor display name.
    pub creditor_name: String,
    /// Creditor city; empty when unknown or the column is absent.
    pub creditor_city: String,
    /// Claim reference id, semi-structured (e.g. "K_12", "C007").
    pub claim_id: String,
    /// Reference number ("ER"), numeric-looking, may contain separators.
    pub reference_number: String,
    /// Claimed amount.
    pub amount: Decimal,
    /// Classification code, mapped to a cost-center label on output.
    pub classification: String,
    /// Disposition code (e.g. "NA14", "NA15").
    pub disposition: String,
    /// Free-text justification, may be empty.
    pub justification: String,
}

impl LineItem {
    /// Whether this item carries disposition `code` (case-insensitive).
    pub fn has_disposition(&self, code: &str) -> bool {
        self.disposition.trim().eq_ignore_ascii_case(code.trim())
    }
}

/// All line items sharing one creditor code, in statement order.
///
/// Membership is fixed at construction; the total is derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditorGroup {
    /// Creditor code, unique across the group set.
    pub code: String,
    /// Display name (first occurrence in the dataset).
    pub name: String,
    /// City (first occurrence in the dataset), may be empty.
    pub city: String,
    items: Vec<LineItem>,
}

impl CreditorGroup {
    /// Create a group; `items` must already be in statement order.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        city: impl Into<String>,
        items: Vec<LineItem>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            city: city.into(),
            items,
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all item amounts, or `None` if the sum overflows [`Decimal`].
    pub fn total(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.amount))
    }

    /// Header line: `"<name>, <city>"`, or just the name when city is empty.
    pub fn name_with_city(&self) -> String {
        if self.city.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.city)
        }
    }
}
