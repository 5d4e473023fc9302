use thiserror::Error;

/// Errors that can occur while reading the ledger, assembling statements
/// or persisting the output document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatementError {
    /// A required input file or sheet is missing or unreadable.
    #[error("source unavailable: {path}: {reason}")]
    SourceUnavailable {
        /// File path (and sheet, if any) that could not be read.
        path: String,
        /// Underlying cause.
        reason: String,
    },

    /// Required columns are absent from the dataset.
    #[error(
        "missing required column(s) [{}]; available columns: [{}]",
        .missing.join(", "),
        .available.join(", ")
    )]
    MissingColumns {
        /// Every required column that was not found.
        missing: Vec<String>,
        /// Every column name the dataset does provide.
        available: Vec<String>,
    },

    /// Assembling one creditor's section failed. Recoverable: the run
    /// continues with the next creditor.
    #[error("creditor {creditor}: {reason}")]
    RowProcessing {
        /// Creditor code of the failed section.
        creditor: String,
        /// Human-readable cause.
        reason: String,
    },

    /// Writing the output document failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Configuration could not be parsed or is unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl StatementError {
    /// Whether this error aborts the whole run.
    ///
    /// Only [`StatementError::RowProcessing`] is local to one creditor.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::RowProcessing { .. })
    }

    pub(crate) fn row(creditor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RowProcessing {
            creditor: creditor.into(),
            reason: reason.into(),
        }
    }

    #[cfg(feature = "xlsx")]
    pub(crate) fn unavailable(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_lists_everything() {
        let err = StatementError::MissingColumns {
            missing: vec!["ER".into(), "Code".into()],
            available: vec!["ithSupplierCode".into(), "ithSupplierName".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("[ER, Code]"));
        assert!(msg.contains("[ithSupplierCode, ithSupplierName]"));
        assert!(err.is_fatal());
    }

    #[test]
    fn row_processing_is_recoverable() {
        let err = StatementError::row("70001", "amount overflow");
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "creditor 70001: amount overflow");
    }
}
