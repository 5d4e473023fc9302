//! Statement assembly.
//!
//! Creditor groups become self-contained [`StatementSection`]s: header cell
//! targets, one body row per line item, a totals row and an optional
//! justification block placed below it. Sections are plain data; rendering
//! happens afterwards in a [`DocumentBackend`].

mod backend;
mod layout;
mod pipeline;
mod section;
mod sheet_name;
mod template;

pub use backend::{DocumentBackend, PersistReport};
pub use layout::{LayoutPlan, LayoutPolicy};
pub use pipeline::{OverflowAdvisory, RunOutcome, build_statements};
pub use section::{
    BodyRow, CellValue, MAX_SHEET_ROW, PlacedCell, PlacedJustification, RowStyle, SectionHeader,
    StatementAssembler, StatementSection, TotalsRow,
};
pub use sheet_name::{SheetNamePolicy, SheetNamer};
pub use template::{BodyColumns, CellRef, Column, PageSetup, TemplateLayout};
