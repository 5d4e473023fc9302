//! Template geometry: where header fields, body columns and stale template
//! rows sit on the shared statement sheet. Rows are 1-based as printed;
//! columns are 0-based and written as letters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A sheet column, written as letters ("A", "F", "AA").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Column(pub u16);

/// Largest column index of an xlsx sheet ("XFD").
const MAX_COLUMN: u32 = 16_383;

impl Column {
    pub fn letters(self) -> String {
        let mut out = Vec::new();
        let mut n = u32::from(self.0) + 1;
        while n > 0 {
            let rem = ((n - 1) % 26) as u8;
            out.push((b'A' + rem) as char);
            n = (n - 1) / 26;
        }
        out.iter().rev().collect()
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!("invalid column '{s}'"));
        }
        let mut n: u32 = 0;
        for c in s.chars() {
            n = n * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
            if n - 1 > MAX_COLUMN {
                return Err(format!("column '{s}' out of range"));
            }
        }
        Ok(Column((n - 1) as u16))
    }
}

impl TryFrom<String> for Column {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Column> for String {
    fn from(c: Column) -> Self {
        c.letters()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letters())
    }
}

/// A cell address such as "B4": 1-based row, 0-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellRef {
    pub row: u32,
    pub col: Column,
}

impl CellRef {
    pub fn new(row: u32, col: Column) -> Self {
        Self { row, col }
    }
}

impl FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| format!("invalid cell reference '{s}'"))?;
        let (letters, digits) = s.split_at(split);
        let col: Column = letters.parse()?;
        let row: u32 = digits
            .parse()
            .map_err(|_| format!("invalid cell reference '{s}'"))?;
        if row == 0 {
            return Err(format!("invalid cell reference '{s}': rows start at 1"));
        }
        Ok(Self { row, col })
    }
}

impl TryFrom<String> for CellRef {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CellRef> for String {
    fn from(c: CellRef) -> Self {
        c.to_string()
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.col, self.row)
    }
}

/// Target column of every body field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyColumns {
    pub claim_id: Column,
    pub reference_number: Column,
    pub amount: Column,
    pub cost_center: Column,
    pub disposition: Column,
    pub justification: Column,
}

impl Default for BodyColumns {
    fn default() -> Self {
        Self {
            claim_id: Column(0),
            reference_number: Column(1),
            amount: Column(2),
            cost_center: Column(3),
            disposition: Column(4),
            justification: Column(5),
        }
    }
}

impl BodyColumns {
    /// All body columns in field order.
    pub fn all(&self) -> [Column; 6] {
        [
            self.claim_id,
            self.reference_number,
            self.amount,
            self.cost_center,
            self.disposition,
            self.justification,
        ]
    }

    /// Leftmost and rightmost body column.
    pub fn span(&self) -> (Column, Column) {
        let all = self.all();
        let first = all.iter().min().copied().unwrap_or(Column(0));
        let last = all.iter().max().copied().unwrap_or(Column(0));
        (first, last)
    }
}

/// Placement of statement content on the shared template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateLayout {
    /// Cell receiving the creditor code.
    pub code_cell: CellRef,
    /// Cell receiving "name, city".
    pub name_cell: CellRef,
    /// Row of the body column titles.
    pub header_row: u32,
    /// First body row.
    pub table_start_row: u32,
    /// Template rows that must be blanked on every sheet (technical column
    /// names, sample justification block).
    pub stale_rows: Vec<u32>,
    pub columns: BodyColumns,
}

impl Default for TemplateLayout {
    fn default() -> Self {
        Self {
            code_cell: CellRef::new(4, Column(1)),
            name_cell: CellRef::new(5, Column(1)),
            header_row: 8,
            table_start_row: 10,
            stale_rows: vec![9, 23, 24, 25],
            columns: BodyColumns::default(),
        }
    }
}

/// Print settings handed to the document backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSetup {
    pub landscape: bool,
    /// Excel paper size code (9 = A4).
    pub paper_size: u8,
    pub fit_to_width: bool,
    /// Margins in inches: left, right, top, bottom, header, footer.
    pub margins: [f64; 6],
    /// Footer using Excel header/footer codes.
    pub footer: String,
    /// Column widths in character units.
    pub column_widths: Vec<(Column, f64)>,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            landscape: true,
            paper_size: 9,
            fit_to_width: true,
            margins: [0.7, 0.7, 0.75, 1.0, 0.3, 0.5],
            footer: "&CSeite &P von &N".into(),
            column_widths: vec![
                (Column(0), 18.0),
                (Column(1), 12.0),
                (Column(2), 15.0),
                (Column(3), 18.0),
                (Column(4), 12.0),
                (Column(5), 25.0),
                (Column(6), 15.0),
            ],
        }
    }
}
