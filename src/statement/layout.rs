//! Row placement for one statement section.
//!
//! The planner only computes positions and flags a possible page overflow;
//! pagination itself belongs to the document backend.

use serde::{Deserialize, Serialize};

/// Gap, page capacity and text-height rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutPolicy {
    /// Blank rows between the totals row and a justification block.
    pub gap_rows: u32,
    /// Last row that still prints on the first page.
    pub page_capacity_rows: u32,
    /// Characters per printed line for height estimates.
    pub chars_per_line: usize,
    /// Upper bound of an estimated line count.
    pub max_lines: u32,
    /// Height of one printed line, in points.
    pub line_height: f64,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            gap_rows: 3,
            page_capacity_rows: 30,
            chars_per_line: 80,
            max_lines: 12,
            line_height: 15.0,
        }
    }
}

/// Computed row positions of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub table_start_row: u32,
    pub totals_row: u32,
    /// Where a justification block would start.
    pub justification_start_row: u32,
    /// The block starts past the first page's capacity.
    pub may_overflow: bool,
}

impl LayoutPolicy {
    /// Place totals and justification rows for `row_count` body rows.
    pub fn plan(&self, table_start_row: u32, row_count: u32) -> LayoutPlan {
        let totals_row = table_start_row.saturating_add(row_count);
        let justification_start_row = totals_row.saturating_add(self.gap_rows).saturating_add(1);
        LayoutPlan {
            table_start_row,
            totals_row,
            justification_start_row,
            may_overflow: justification_start_row > self.page_capacity_rows,
        }
    }

    /// Estimated printed lines of `text`:
    /// `max(1, chars / chars_per_line + line_breaks + 1)`, clamped to `max_lines`.
    pub fn estimate_lines(&self, text: &str) -> u32 {
        let per_line = self.chars_per_line.max(1);
        let chars = text.chars().count();
        let breaks = text.matches('\n').count();
        let lines = (chars / per_line + breaks + 1).max(1);
        u32::try_from(lines).unwrap_or(u32::MAX).min(self.max_lines.max(1))
    }

    /// Row height in points for `text`.
    pub fn row_height(&self, text: &str) -> f64 {
        f64::from(self.estimate_lines(text)) * self.line_height
    }
}
