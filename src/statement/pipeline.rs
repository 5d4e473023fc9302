use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::StatementConfig;
use crate::core::{StatementError, Table, group_by_creditor, read_line_items};
use crate::justification::{
    JustificationRegister, JustificationResolver, JustificationStrategy, ResolveJustification,
};

use super::section::StatementSection;
use super::sheet_name::SheetNamer;

/// A justification block that may not fit on the first printed page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverflowAdvisory {
    pub creditor: String,
    pub sheet_name: String,
    pub start_row: u32,
}

/// Result of one batch run.
#[derive(Debug, Default)]
pub struct RunOutcome {
    /// Assembled sections, sorted by (display name, code).
    pub sections: Vec<StatementSection>,
    /// Creditors that were skipped, as [`StatementError::RowProcessing`].
    pub failures: Vec<StatementError>,
    pub advisories: Vec<OverflowAdvisory>,
}

impl RunOutcome {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Build every creditor's statement section from the ledger table and the
/// optional justification register table.
///
/// Fails only when the configuration is unusable or required ledger columns
/// are missing; a creditor whose section cannot be assembled is logged,
/// recorded in [`RunOutcome::failures`] and skipped.
pub fn build_statements(
    ledger: &Table,
    register: Option<&Table>,
    config: &StatementConfig,
) -> Result<RunOutcome, StatementError> {
    config.validate()?;
    let items = read_line_items(ledger, &config.columns)?;
    let groups = group_by_creditor(items, &config.sequence);
    info!(creditors = groups.len(), "ledger grouped");

    let justification = &config.justification;
    let register = match (justification.strategy, register) {
        (JustificationStrategy::CrossReference, Some(table)) => Some(JustificationRegister::from_table(
            table,
            &justification.synonyms,
            justification.header_scan_rows,
        )),
        (JustificationStrategy::CrossReference, None) => {
            warn!(
                sheet = %justification.register_sheet,
                "no justification register; cross-reference blocks will be empty"
            );
            None
        }
        (JustificationStrategy::Inline, _) => None,
    };
    let resolver = JustificationResolver::from_config(justification, register);
    let assembler = config.assembler();
    let mut namer = SheetNamer::new(config.sheet_names.clone());

    let mut outcome = RunOutcome::default();
    for group in &groups {
        debug!(creditor = %group.code, rows = group.len(), "assembling");
        let mut section = match assembler.assemble(group, resolver.resolve(group)) {
            Ok(section) => section,
            Err(err) => {
                error!(creditor = %group.code, error = %err, "creditor skipped");
                outcome.failures.push(err);
                continue;
            }
        };
        section.sheet_name = namer.claim(&group.name, &group.code);

        if let Some(placed) = section.justification.as_ref().filter(|p| p.may_overflow) {
            warn!(
                creditor = %group.code,
                sheet = %section.sheet_name,
                start_row = placed.start_row,
                "justification block may overflow onto a continuation page"
            );
            outcome.advisories.push(OverflowAdvisory {
                creditor: group.code.clone(),
                sheet_name: section.sheet_name.clone(),
                start_row: placed.start_row,
            });
        }
        outcome.sections.push(section);
    }

    info!(
        sections = outcome.sections.len(),
        failures = outcome.failures.len(),
        advisories = outcome.advisories.len(),
        strategy = %resolver.strategy(),
        "statements assembled"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RawValue;

    fn ledger(rows: &[[&str; 9]]) -> Table {
        let headers = [
            "ithSupplierCode",
            "ithSupplierName",
            "ithSupplierCity",
            "ithSupplierExternalNbr1",
            "ER",
            "itlTotalAmount",
            "itlCostCentreCode1",
            "Code",
            "Begründung",
        ]
        .map(String::from)
        .to_vec();
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|v| RawValue::from(*v)).collect())
            .collect();
        Table::new(headers, rows)
    }

    #[test]
    fn duplicate_names_get_unique_sheets() {
        let table = ledger(&[
            ["1", "Acme", "", "C1", "1", "10", "9099100", "", ""],
            ["2", "Acme", "", "C1", "2", "20", "9099100", "", ""],
        ]);
        let outcome = build_statements(&table, None, &StatementConfig::default()).unwrap();
        let names: Vec<_> = outcome.sections.iter().map(|s| s.sheet_name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Acme (2)"]);
    }

    #[test]
    fn sheet_name_leaves_out_the_city() {
        let table = ledger(&[
            ["1", "Acme AG", "Zürich", "C1", "1", "10", "9099100", "", ""],
            ["2", "Acme AG", "Basel", "C1", "2", "20", "9099100", "", ""],
        ]);
        let outcome = build_statements(&table, None, &StatementConfig::default()).unwrap();
        let sections: Vec<_> = outcome
            .sections
            .iter()
            .map(|s| (s.header.display.as_str(), s.sheet_name.as_str()))
            .collect();
        assert_eq!(
            sections,
            vec![("Acme AG, Zürich", "Acme AG"), ("Acme AG, Basel", "Acme AG (2)")]
        );
    }

    #[test]
    fn long_sections_raise_advisories() {
        let rows: Vec<[&str; 9]> = (0..20)
            .map(|_| ["1", "Acme", "", "C1", "1", "1", "", "NA14", "siehe Akte"])
            .collect();
        let config = StatementConfig::builder()
            .strategy(JustificationStrategy::Inline)
            .build()
            .unwrap();
        let outcome = build_statements(&ledger(&rows), None, &config).unwrap();
        assert_eq!(outcome.advisories.len(), 1);
        assert_eq!(outcome.advisories[0].start_row, 34);
        assert!(!outcome.has_failures());
    }

    #[test]
    fn failing_creditor_does_not_stop_the_batch() {
        let max = rust_decimal::Decimal::MAX.to_string();
        let table = ledger(&[
            ["1", "Acme", "", "C1", "1", &max, "", "", ""],
            ["1", "Acme", "", "C2", "1", &max, "", "", ""],
            ["2", "Beta", "", "C1", "1", "5", "", "", ""],
        ]);
        let outcome = build_statements(&table, None, &StatementConfig::default()).unwrap();
        assert_eq!(outcome.sections.len(), 1);
        assert_eq!(outcome.sections[0].header.code, "2");
        assert_eq!(outcome.failures.len(), 1);
        assert!(!outcome.failures[0].is_fatal());
    }
}
