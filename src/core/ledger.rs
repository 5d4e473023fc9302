//! Ledger ingestion: column mapping, row normalization and creditor grouping.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::StatementError;
use super::normalize::{amount, text};
use super::sequence::SequencePolicy;
use super::types::{CreditorGroup, LineItem, RawValue, Table};

static EMPTY_CELL: RawValue = RawValue::Empty;

/// Input column names by logical role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub creditor_code: String,
    pub creditor_name: String,
    /// Optional column; its absence is not an error.
    pub creditor_city: String,
    pub claim_id: String,
    pub reference_number: String,
    pub amount: String,
    pub classification: String,
    pub disposition: String,
    pub justification: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            creditor_code: "ithSupplierCode".into(),
            creditor_name: "ithSupplierName".into(),
            creditor_city: "ithSupplierCity".into(),
            claim_id: "ithSupplierExternalNbr1".into(),
            reference_number: "ER".into(),
            amount: "itlTotalAmount".into(),
            classification: "itlCostCentreCode1".into(),
            disposition: "Code".into(),
            justification: "Begründung".into(),
        }
    }
}

impl ColumnMap {
    /// Column names that must be present, in report order.
    pub fn required(&self) -> [&str; 8] {
        [
            self.creditor_code.as_str(),
            self.creditor_name.as_str(),
            self.claim_id.as_str(),
            self.reference_number.as_str(),
            self.amount.as_str(),
            self.classification.as_str(),
            self.disposition.as_str(),
            self.justification.as_str(),
        ]
    }
}

/// Resolved column positions of one table.
struct ColumnIndex {
    code: usize,
    name: usize,
    city: Option<usize>,
    claim: usize,
    reference: usize,
    amount: usize,
    classification: usize,
    disposition: usize,
    justification: usize,
}

impl ColumnIndex {
    fn resolve(table: &Table, columns: &ColumnMap) -> Result<Self, StatementError> {
        let missing: Vec<String> = columns
            .required()
            .iter()
            .filter(|name| table.column(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(StatementError::MissingColumns {
                missing,
                available: table.headers.clone(),
            });
        }

        // every required column was just checked
        let col = |name: &str| table.column(name).unwrap_or_default();
        Ok(Self {
            code: col(&columns.creditor_code),
            name: col(&columns.creditor_name),
            city: table.column(&columns.creditor_city),
            claim: col(&columns.claim_id),
            reference: col(&columns.reference_number),
            amount: col(&columns.amount),
            classification: col(&columns.classification),
            disposition: col(&columns.disposition),
            justification: col(&columns.justification),
        })
    }

    fn is_blank(&self, row: &[RawValue]) -> bool {
        let cell = |i: usize| row.get(i).map(text).unwrap_or_default();
        [
            self.code,
            self.name,
            self.claim,
            self.reference,
            self.amount,
            self.classification,
            self.disposition,
            self.justification,
        ]
        .into_iter()
        .all(|i| cell(i).is_empty())
    }
}

/// Validate the table shape and normalize every row into a [`LineItem`].
///
/// Fails with [`StatementError::MissingColumns`] before any row is read.
/// Rows whose required cells are all blank are skipped.
pub fn read_line_items(table: &Table, columns: &ColumnMap) -> Result<Vec<LineItem>, StatementError> {
    let idx = ColumnIndex::resolve(table, columns)?;

    let mut items = Vec::with_capacity(table.len());
    for (row_no, row) in table.rows.iter().enumerate() {
        if idx.is_blank(row) {
            debug!(row = row_no + 2, "skipping blank ledger row");
            continue;
        }
        let cell = |i: usize| row.get(i).unwrap_or(&EMPTY_CELL);
        items.push(LineItem {
            creditor_code: text(cell(idx.code)),
            creditor_name: text(cell(idx.name)),
            creditor_city: idx.city.map(|i| text(cell(i))).unwrap_or_default(),
            claim_id: text(cell(idx.claim)),
            reference_number: text(cell(idx.reference)),
            amount: amount(cell(idx.amount)),
            classification: text(cell(idx.classification)),
            disposition: text(cell(idx.disposition)),
            justification: text(cell(idx.justification)),
        });
    }

    info!(rows = items.len(), "ledger normalized");
    Ok(items)
}

/// Partition line items by creditor code.
///
/// Name and city come from the first row of each creditor. Groups are ordered
/// by (name, code); items inside a group are stably ordered by claim sequence key.
pub fn group_by_creditor(items: Vec<LineItem>, sequence: &SequencePolicy) -> Vec<CreditorGroup> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<LineItem>> = HashMap::new();
    for item in items {
        let bucket = buckets.entry(item.creditor_code.clone()).or_insert_with(|| {
            order.push(item.creditor_code.clone());
            Vec::new()
        });
        bucket.push(item);
    }

    let mut groups: Vec<CreditorGroup> = order
        .into_iter()
        .filter_map(|code| {
            let mut members = buckets.remove(&code)?;
            let first = members.first()?;
            let (name, city) = (first.creditor_name.clone(), first.creditor_city.clone());
            sequence.sort(&mut members);
            Some(CreditorGroup::new(code, name, city, members))
        })
        .collect();

    groups.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)));
    debug!(creditors = groups.len(), "ledger grouped");
    groups
}
