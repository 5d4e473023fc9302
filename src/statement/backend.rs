use std::path::PathBuf;

use crate::core::StatementError;

use super::section::StatementSection;

/// What a backend wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistReport {
    pub sheets_written: usize,
    /// Output location, for file-based backends.
    pub path: Option<PathBuf>,
}

/// Renders and persists a complete list of statement sections.
///
/// Sections arrive fully assembled; a backend only applies presentation
/// and writes. Any failure is a [`StatementError::Persistence`].
pub trait DocumentBackend {
    fn persist(&mut self, sections: &[StatementSection]) -> Result<PersistReport, StatementError>;
}
