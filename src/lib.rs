//! # beilage
//!
//! Creditor statement enclosures ("Beilagen") from a claims ledger.
//!
//! Ledger rows are normalized, grouped per creditor and ordered by claim
//! sequence; each creditor becomes one statement sheet with a header, one row
//! per claim, a totals row and, where disposition codes ask for it, a block of
//! justification texts taken either from the rows themselves or from a
//! separate justification register.
//!
//! All monetary values use [`rust_decimal::Decimal`]; amounts only turn into
//! floating point when a backend writes them to a spreadsheet cell.
//!
//! ## Quick Start
//!
//! ```rust
//! use beilage::config::StatementConfig;
//! use beilage::core::{RawValue, Table};
//! use beilage::statement::build_statements;
//! use rust_decimal_macros::dec;
//!
//! let headers = ["ithSupplierCode", "ithSupplierName", "ithSupplierExternalNbr1", "ER",
//!     "itlTotalAmount", "itlCostCentreCode1", "Code", "Begründung"];
//! let ledger = Table::new(
//!     headers.map(String::from).to_vec(),
//!     vec![
//!         ["4711", "Acme", "C2", "959168", "1250.50", "9099100", "", ""].map(RawValue::from).to_vec(),
//!         ["4711", "Acme", "C1", "959169", "100", "9099300", "", ""].map(RawValue::from).to_vec(),
//!     ],
//! );
//!
//! let outcome = build_statements(&ledger, None, &StatementConfig::default()).unwrap();
//! let section = &outcome.sections[0];
//! assert_eq!(section.rows[0].claim_id, "C1");
//! assert_eq!(section.rows[0].cost_center, "Bestritten");
//! assert_eq!(section.totals.row, 12);
//! assert_eq!(section.totals.amount, dec!(1350.50));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Normalization, grouping, justification, layout, statement assembly |
//! | `config` | TOML configuration files |
//! | `xlsx` | Excel source (calamine) and backend (rust_xlsxwriter) |
//! | `cli` | The `beilage` command-line tool |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod justification;

#[cfg(feature = "core")]
pub mod statement;

#[cfg(feature = "core")]
pub mod config;

#[cfg(feature = "xlsx")]
pub mod xlsx;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
