//! Ledger types, value normalization, cost-center labels, claim ordering
//! and creditor grouping.
//!
//! Everything in this module is pure: normalization and lookup functions
//! degrade to defaults instead of failing. Only [`read_line_items`] can
//! fail, when the ledger lacks required columns.

mod cost_center;
mod error;
mod ledger;
pub mod normalize;
mod sequence;
mod types;

pub use cost_center::CostCenterTable;
pub use error::*;
pub use ledger::{ColumnMap, group_by_creditor, read_line_items};
pub use sequence::{SequenceKey, SequencePolicy};
pub use types::*;
