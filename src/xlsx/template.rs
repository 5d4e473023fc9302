use std::path::Path;

use tracing::info;

use crate::core::StatementError;
use crate::statement::{CellRef, Column};

use super::source::XlsxSource;

/// One static label of the template sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCell {
    pub cell: CellRef,
    pub text: String,
}

/// Static labels copied onto every statement sheet (title, "Kreditor Nr.",
/// column titles, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    cells: Vec<TemplateCell>,
}

impl Template {
    /// Read the text cells of the template workbook's first sheet.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StatementError> {
        let mut source = XlsxSource::open(path.as_ref())?;
        let cells: Vec<TemplateCell> = source
            .first_sheet_cells()?
            .into_iter()
            .filter_map(|(row, col, text)| {
                let col = u16::try_from(col).ok()?;
                Some(TemplateCell {
                    cell: CellRef::new(row + 1, Column(col)),
                    text,
                })
            })
            .collect();
        info!(path = %path.as_ref().display(), cells = cells.len(), "template loaded");
        Ok(Self { cells })
    }

    pub fn from_cells(cells: impl IntoIterator<Item = TemplateCell>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }

    pub fn cells(&self) -> &[TemplateCell] {
        &self.cells
    }

    /// Text at `cell`, if the template has one.
    pub fn text_at(&self, cell: CellRef) -> Option<&str> {
        self.cells.iter().find(|c| c.cell == cell).map(|c| c.text.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
