//! Excel workbook input and output.
//!
//! [`XlsxSource`] reads the ledger and the justification register with
//! `calamine`; [`XlsxBackend`] writes one statement sheet per creditor with
//! `rust_xlsxwriter`. [`run`] wires both around the core pipeline.
//!
//! ```no_run
//! use beilage::config::StatementConfig;
//! use beilage::xlsx::run;
//!
//! let report = run("mock.xlsx", "Beilage Verfuegung.xlsx", "out.xlsx", &StatementConfig::default()).unwrap();
//! println!("{} sheets", report.persisted.sheets_written);
//! ```

mod backend;
mod source;
mod template;

use std::path::Path;

use tracing::info;

use crate::config::StatementConfig;
use crate::core::StatementError;
use crate::justification::JustificationStrategy;
use crate::statement::{DocumentBackend, PersistReport, RunOutcome, build_statements};

pub use backend::XlsxBackend;
pub use source::XlsxSource;
pub use template::{Template, TemplateCell};

/// Result of a complete workbook-to-workbook run.
#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub persisted: PersistReport,
}

/// Read the ledger (and register) from `input`, assemble all statements and
/// write them to `output` on top of the labels in `template`.
///
/// Missing inputs and missing columns abort before anything is written.
pub fn run(
    input: impl AsRef<Path>,
    template: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &StatementConfig,
) -> Result<RunReport, StatementError> {
    config.validate()?;
    let template = Template::load(template)?;
    let mut source = XlsxSource::open(input)?;

    let ledger = source.read_sheet(Some(&config.input_sheet))?;
    let register = match config.justification.strategy {
        JustificationStrategy::CrossReference => {
            source.read_optional_sheet(&config.justification.register_sheet)?
        }
        JustificationStrategy::Inline => None,
    };

    let outcome = build_statements(&ledger, register.as_ref(), config)?;
    let mut backend = XlsxBackend::new(output, template, config);
    let persisted = backend.persist(&outcome.sections)?;
    info!(
        sheets = persisted.sheets_written,
        failures = outcome.failures.len(),
        "run complete"
    );
    Ok(RunReport { outcome, persisted })
}
