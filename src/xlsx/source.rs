use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use tracing::{debug, info};

use crate::core::normalize;
use crate::core::{RawValue, StatementError, Table};

/// Reads worksheets of an xlsx/xls/ods workbook into [`Table`]s.
pub struct XlsxSource {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
}

impl std::fmt::Debug for XlsxSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsxSource").field("path", &self.path).finish_non_exhaustive()
    }
}

impl XlsxSource {
    /// Open a workbook. A missing or unreadable file is
    /// [`StatementError::SourceUnavailable`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StatementError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StatementError::unavailable(path.display().to_string(), "file not found"));
        }
        let workbook = open_workbook_auto(path)
            .map_err(|e| StatementError::unavailable(path.display().to_string(), e))?;
        debug!(path = %path.display(), "workbook opened");
        Ok(Self {
            path: path.to_path_buf(),
            workbook,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// Read a sheet whose first row holds the column names.
    ///
    /// `None` reads the first sheet. A missing sheet is
    /// [`StatementError::SourceUnavailable`].
    pub fn read_sheet(&mut self, name: Option<&str>) -> Result<Table, StatementError> {
        let names = self.sheet_names();
        let name = match name {
            Some(name) => name.to_string(),
            None => names
                .first()
                .cloned()
                .ok_or_else(|| self.unavailable("", "workbook contains no sheets"))?,
        };
        if !names.iter().any(|n| *n == name) {
            return Err(self.unavailable(&name, format!("no such sheet; sheets: [{}]", names.join(", "))));
        }
        let range = self
            .workbook
            .worksheet_range(&name)
            .map_err(|e| self.unavailable(&name, e))?;
        let table = range_to_table(&range);
        info!(sheet = %name, rows = table.len(), columns = table.headers.len(), "sheet loaded");
        Ok(table)
    }

    /// Like [`read_sheet`](Self::read_sheet), but an absent sheet is `Ok(None)`.
    pub fn read_optional_sheet(&mut self, name: &str) -> Result<Option<Table>, StatementError> {
        if !self.sheet_names().iter().any(|n| n == name) {
            debug!(sheet = %name, "optional sheet absent");
            return Ok(None);
        }
        self.read_sheet(Some(name)).map(Some)
    }

    /// Text cells of the first sheet with their absolute 0-based positions.
    pub(crate) fn first_sheet_cells(&mut self) -> Result<Vec<(u32, u32, String)>, StatementError> {
        let Some(name) = self.sheet_names().into_iter().next() else {
            return Err(self.unavailable("", "workbook contains no sheets"));
        };
        let range = self
            .workbook
            .worksheet_range(&name)
            .map_err(|e| self.unavailable(&name, e))?;
        let (row0, col0) = range.start().unwrap_or((0, 0));
        Ok(range
            .cells()
            .filter_map(|(r, c, data)| {
                let text = normalize::text(&raw_value(data));
                if text.trim().is_empty() {
                    return None;
                }
                let r = u32::try_from(r).ok()?;
                let c = u32::try_from(c).ok()?;
                Some((row0 + r, col0 + c, text))
            })
            .collect())
    }

    fn unavailable(&self, sheet: &str, reason: impl std::fmt::Display) -> StatementError {
        let path = if sheet.is_empty() {
            self.path.display().to_string()
        } else {
            format!("{} [{sheet}]", self.path.display())
        };
        StatementError::unavailable(path, reason)
    }
}

/// First row becomes the header, the rest the body.
fn range_to_table(range: &Range<Data>) -> Table {
    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|row| row.iter().map(|d| normalize::text(&raw_value(d))).collect())
        .unwrap_or_default();
    let body = rows.map(|row| row.iter().map(raw_value).collect()).collect();
    Table::new(headers, body)
}

/// Convert a calamine cell into the core's value shape.
pub(crate) fn raw_value(data: &Data) -> RawValue {
    match data {
        Data::Empty => RawValue::Empty,
        Data::String(s) => RawValue::Text(normalize::clean_text(s)),
        Data::Float(n) => RawValue::Number(*n),
        Data::Int(n) => RawValue::Int(*n),
        Data::Bool(b) => RawValue::Bool(*b),
        // Dates stay serial numbers; no ledger column is a date.
        Data::DateTime(dt) => RawValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawValue::Text(s.clone()),
        Data::Error(e) => RawValue::Text(e.to_string()),
    }
}
