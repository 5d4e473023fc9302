use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use tracing::{info, warn};

use crate::config::StatementConfig;
use crate::core::StatementError;
use crate::justification::JustificationBlock;
use crate::statement::{
    CellRef, CellValue, Column, DocumentBackend, LayoutPolicy, PageSetup, PersistReport,
    PlacedJustification, RowStyle, StatementSection, TemplateLayout,
};

use super::template::Template;

const HEADER_FILL: u32 = 0xD9D9D9;
const TOTALS_FILL: u32 = 0xF2F2F2;
const AMOUNT_FORMAT: &str = "#,##0";

/// How a body column is aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
    Wrap,
}

impl Align {
    fn apply(self, format: Format) -> Format {
        match self {
            Align::Left => format.set_align(FormatAlign::Left).set_indent(1),
            Align::Right => format.set_align(FormatAlign::Right).set_indent(1),
            Align::Center => format.set_align(FormatAlign::Center),
            Align::Wrap => format
                .set_align(FormatAlign::Left)
                .set_align(FormatAlign::Top)
                .set_text_wrap(),
        }
    }
}

struct Formats {
    header: Format,
    heading: Format,
    block_header: Format,
    block_text: Format,
    block_reference: Format,
}

impl Formats {
    fn new() -> Self {
        let grey = Color::RGB(HEADER_FILL);
        Self {
            header: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_background_color(grey)
                .set_border_bottom(FormatBorder::Thin),
            heading: Format::new().set_bold().set_font_size(12),
            block_header: Format::new()
                .set_bold()
                .set_background_color(grey)
                .set_border_bottom(FormatBorder::Thin),
            block_text: Align::Wrap.apply(Format::new()),
            block_reference: Format::new().set_align(FormatAlign::Left).set_align(FormatAlign::Top),
        }
    }

    fn cell(&self, align: Align, style: RowStyle, amount: Option<Decimal>) -> Format {
        let mut format = align.apply(Format::new());
        if style == RowStyle::Totals {
            format = format.set_bold().set_background_color(Color::RGB(TOTALS_FILL));
        }
        if amount.is_some_and(|a| !a.is_zero()) {
            format = format.set_num_format(AMOUNT_FORMAT);
        }
        format
    }
}

/// Renders statement sections into an xlsx workbook with `rust_xlsxwriter`,
/// one worksheet per section on top of the replayed template labels.
///
/// Only the template's cell text is replayed. Its fonts, borders, fills and
/// merged ranges are not carried over; the header row and the sections get
/// this backend's own formats instead.
#[derive(Debug, Clone)]
pub struct XlsxBackend {
    path: PathBuf,
    template: Template,
    layout: TemplateLayout,
    policy: LayoutPolicy,
    page: PageSetup,
}

impl XlsxBackend {
    pub fn new(path: impl AsRef<Path>, template: Template, config: &StatementConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            template,
            layout: config.template.clone(),
            policy: config.layout.clone(),
            page: config.page.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn align_of(&self, col: Column) -> Align {
        let cols = &self.layout.columns;
        if col == cols.claim_id {
            Align::Left
        } else if col == cols.disposition {
            Align::Center
        } else if col == cols.justification {
            Align::Wrap
        } else {
            Align::Right
        }
    }

    fn render(&self, sheet: &mut Worksheet, section: &StatementSection, formats: &Formats) -> Result<(), XlsxError> {
        self.apply_page_setup(sheet)?;

        let cells = section.cells();
        let mut filled: HashSet<CellRef> = cells.iter().map(|c| c.cell).collect();
        if let Some(placed) = &section.justification {
            filled.extend((placed.start_row..=section.last_row()).flat_map(|row| {
                let (first, last) = section.columns.span();
                (first.0..=last.0).map(move |c| CellRef::new(row, Column(c)))
            }));
        }

        let (first, last) = section.columns.span();
        let in_body = |col: Column| col >= first && col <= last;
        let stale: HashSet<u32> = self.layout.stale_rows.iter().copied().collect();

        for tc in self.template.cells() {
            if stale.contains(&tc.cell.row) || filled.contains(&tc.cell) {
                continue;
            }
            let (row, col) = xy(tc.cell);
            if tc.cell.row == self.layout.header_row && in_body(tc.cell.col) {
                sheet.write_string_with_format(row, col, &tc.text, &formats.header)?;
            } else {
                sheet.write_string(row, col, &tc.text)?;
            }
        }
        for c in first.0..=last.0 {
            let cell = CellRef::new(self.layout.header_row, Column(c));
            if self.template.text_at(cell).is_none() {
                let (row, col) = xy(cell);
                sheet.write_blank(row, col, &formats.header)?;
            }
        }

        for placed in cells {
            let (row, col) = xy(placed.cell);
            if placed.style == RowStyle::Header {
                sheet.write_string(row, col, cell_text(&placed.value))?;
                continue;
            }
            let align = self.align_of(placed.cell.col);
            match placed.value {
                CellValue::Amount(amount) => {
                    let format = formats.cell(align, placed.style, Some(amount));
                    sheet.write_number_with_format(row, col, amount.to_f64().unwrap_or_default(), &format)?;
                }
                CellValue::Text(ref text) if !text.is_empty() => {
                    let format = formats.cell(align, placed.style, None);
                    sheet.write_string_with_format(row, col, text, &format)?;
                }
                CellValue::Text(_) | CellValue::Blank => {
                    let format = formats.cell(align, placed.style, None);
                    sheet.write_blank(row, col, &format)?;
                }
            }
        }

        if let Some(placed) = &section.justification {
            self.render_justification(sheet, placed, section, formats)?;
        }
        Ok(())
    }

    fn render_justification(
        &self,
        sheet: &mut Worksheet,
        placed: &PlacedJustification,
        section: &StatementSection,
        formats: &Formats,
    ) -> Result<(), XlsxError> {
        let (first, last) = section.columns.span();
        let start = placed.start_row - 1;
        sheet.write_string_with_format(start, first.0, placed.block.heading(), &formats.heading)?;

        match &placed.block {
            JustificationBlock::Inline { text, .. } => {
                let row = start + 1;
                write_merged(sheet, row, first.0, last.0, text, &formats.block_text)?;
                sheet.set_row_height(row, self.policy.row_height(text))?;
            }
            JustificationBlock::CrossReference {
                reference_title,
                text_title,
                rows,
                ..
            } => {
                let text_col = first.0 + 1;
                sheet.write_string_with_format(start + 1, first.0, reference_title, &formats.block_header)?;
                write_merged(sheet, start + 1, text_col, last.0, text_title, &formats.block_header)?;
                for (row, entry) in (start + 2..).zip(rows) {
                    sheet.write_string_with_format(row, first.0, &entry.reference_number, &formats.block_reference)?;
                    write_merged(sheet, row, text_col, last.0, &entry.text, &formats.block_text)?;
                    sheet.set_row_height(row, self.policy.row_height(&entry.text))?;
                }
            }
        }
        Ok(())
    }

    fn apply_page_setup(&self, sheet: &mut Worksheet) -> Result<(), XlsxError> {
        let page = &self.page;
        if page.landscape {
            sheet.set_landscape();
        }
        sheet.set_paper_size(page.paper_size);
        if page.fit_to_width {
            sheet.set_print_fit_to_pages(1, 0);
        }
        let [left, right, top, bottom, header, footer] = page.margins;
        sheet.set_margins(left, right, top, bottom, header, footer);
        if !page.footer.is_empty() {
            sheet.set_footer(&page.footer);
        }
        for (col, width) in &page.column_widths {
            sheet.set_column_width(col.0, *width)?;
        }
        Ok(())
    }
}

impl DocumentBackend for XlsxBackend {
    fn persist(&mut self, sections: &[StatementSection]) -> Result<PersistReport, StatementError> {
        let mut workbook = Workbook::new();
        let formats = Formats::new();

        if sections.is_empty() {
            warn!(path = %self.path.display(), "no statement sections; writing an empty workbook");
        }
        for section in sections {
            let sheet = workbook
                .add_worksheet()
                .set_name(&section.sheet_name)
                .map_err(|e| persistence(&section.sheet_name, e))?;
            self.render(sheet, section, &formats)
                .map_err(|e| persistence(&section.sheet_name, e))?;
        }

        workbook
            .save(&self.path)
            .map_err(|e| StatementError::Persistence(format!("saving {}: {e}", self.path.display())))?;
        info!(path = %self.path.display(), sheets = sections.len(), "workbook saved");
        Ok(PersistReport {
            sheets_written: sections.len(),
            path: Some(self.path.clone()),
        })
    }
}

fn persistence(sheet: &str, e: XlsxError) -> StatementError {
    StatementError::Persistence(format!("sheet '{sheet}': {e}"))
}

/// 1-based cell reference to 0-based worksheet coordinates.
fn xy(cell: CellRef) -> (u32, u16) {
    (cell.row.saturating_sub(1), cell.col.0)
}

fn cell_text(value: &CellValue) -> String {
    match value {
        CellValue::Text(s) => s.clone(),
        CellValue::Amount(a) => a.to_string(),
        CellValue::Blank => String::new(),
    }
}

fn write_merged(
    sheet: &mut Worksheet,
    row: u32,
    first: u16,
    last: u16,
    text: &str,
    format: &Format,
) -> Result<(), XlsxError> {
    if last > first {
        sheet.merge_range(row, first, row, last, text, format)?;
    } else {
        sheet.write_string_with_format(row, first, text, format)?;
    }
    Ok(())
}
