use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{CostCenterTable, CreditorGroup, StatementError};
use crate::justification::JustificationBlock;

use super::layout::LayoutPolicy;
use super::sheet_name::SheetNamePolicy;
use super::template::{BodyColumns, CellRef, Column, TemplateLayout};

/// Last addressable row of an xlsx worksheet.
pub const MAX_SHEET_ROW: u32 = 1_048_576;

/// Creditor code and display name with their target cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionHeader {
    pub code: String,
    pub code_cell: CellRef,
    /// "name, city", or the bare name when the city is empty.
    pub display: String,
    pub name_cell: CellRef,
}

/// One line item as printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyRow {
    pub row: u32,
    pub claim_id: String,
    pub reference_number: String,
    pub amount: Decimal,
    /// Resolved cost-center label.
    pub cost_center: String,
    pub disposition: String,
    /// Inline justification text, verbatim.
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsRow {
    pub row: u32,
    pub label: String,
    pub amount: Decimal,
}

/// A justification block anchored below the totals row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedJustification {
    pub start_row: u32,
    pub block: JustificationBlock,
    /// Estimated printed lines per text of the block, in print order.
    pub line_estimates: Vec<u32>,
    /// The block starts past the first page's capacity.
    pub may_overflow: bool,
}

/// Visual role of a cell, for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowStyle {
    Header,
    Body,
    Totals,
}

/// Content of one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Amount(Decimal),
    Blank,
}

/// A value with its target cell and style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedCell {
    pub cell: CellRef,
    pub value: CellValue,
    pub style: RowStyle,
}

/// Everything a backend needs, together with the shared template, to render
/// one creditor's sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSection {
    pub sheet_name: String,
    pub header: SectionHeader,
    pub columns: BodyColumns,
    pub rows: Vec<BodyRow>,
    pub totals: TotalsRow,
    pub justification: Option<PlacedJustification>,
}

impl StatementSection {
    /// Header, body and totals cells in writing order.
    pub fn cells(&self) -> Vec<PlacedCell> {
        let cols = &self.columns;
        let mut cells = Vec::with_capacity(2 + (self.rows.len() + 1) * 6);
        let text = |s: &str| CellValue::Text(s.to_string());

        cells.push(PlacedCell {
            cell: self.header.code_cell,
            value: text(&self.header.code),
            style: RowStyle::Header,
        });
        cells.push(PlacedCell {
            cell: self.header.name_cell,
            value: text(&self.header.display),
            style: RowStyle::Header,
        });

        for row in &self.rows {
            let fields: [(Column, CellValue); 6] = [
                (cols.claim_id, text(&row.claim_id)),
                (cols.reference_number, text(&row.reference_number)),
                (cols.amount, CellValue::Amount(row.amount)),
                (cols.cost_center, text(&row.cost_center)),
                (cols.disposition, text(&row.disposition)),
                (cols.justification, text(&row.justification)),
            ];
            cells.extend(fields.into_iter().map(|(col, value)| PlacedCell {
                cell: CellRef::new(row.row, col),
                value,
                style: RowStyle::Body,
            }));
        }

        for col in cols.all() {
            let value = if col == cols.claim_id {
                text(&self.totals.label)
            } else if col == cols.amount {
                CellValue::Amount(self.totals.amount)
            } else {
                CellValue::Blank
            };
            cells.push(PlacedCell {
                cell: CellRef::new(self.totals.row, col),
                value,
                style: RowStyle::Totals,
            });
        }
        cells
    }

    /// Last row used by the section, justification block included.
    pub fn last_row(&self) -> u32 {
        match &self.justification {
            Some(placed) => {
                let extra = match &placed.block {
                    JustificationBlock::Inline { .. } => 1,
                    JustificationBlock::CrossReference { rows, .. } => 1 + rows.len() as u32,
                };
                placed.start_row + extra
            }
            None => self.totals.row,
        }
    }
}

/// Turns a creditor group into a [`StatementSection`].
#[derive(Debug, Clone, Default)]
pub struct StatementAssembler {
    pub template: TemplateLayout,
    pub layout: LayoutPolicy,
    pub cost_centers: CostCenterTable,
    pub sheet_names: SheetNamePolicy,
    pub totals_label: String,
}

impl StatementAssembler {
    pub fn new(
        template: TemplateLayout,
        layout: LayoutPolicy,
        cost_centers: CostCenterTable,
        sheet_names: SheetNamePolicy,
        totals_label: impl Into<String>,
    ) -> Self {
        Self {
            template,
            layout,
            cost_centers,
            sheet_names,
            totals_label: totals_label.into(),
        }
    }

    /// Assemble one section. The sheet name is the sanitized creditor name
    /// without the city; uniqueness across a workbook is the caller's job.
    ///
    /// Fails with [`StatementError::RowProcessing`] when the total
    /// overflows or the section does not fit on a worksheet.
    pub fn assemble(
        &self,
        group: &CreditorGroup,
        justification: Option<JustificationBlock>,
    ) -> Result<StatementSection, StatementError> {
        let row_count = u32::try_from(group.len())
            .map_err(|_| StatementError::row(&group.code, format!("{} rows exceed a worksheet", group.len())))?;
        let total = group
            .total()
            .ok_or_else(|| StatementError::row(&group.code, "amount total overflows"))?;

        let plan = self.layout.plan(self.template.table_start_row, row_count);
        if plan.totals_row > MAX_SHEET_ROW {
            return Err(StatementError::row(
                &group.code,
                format!("totals row {} is past the last worksheet row", plan.totals_row),
            ));
        }

        let rows = group
            .items()
            .iter()
            .zip(plan.table_start_row..)
            .map(|(item, row)| BodyRow {
                row,
                claim_id: item.claim_id.clone(),
                reference_number: item.reference_number.clone(),
                amount: item.amount,
                cost_center: self.cost_centers.resolve(&item.classification),
                disposition: item.disposition.clone(),
                justification: item.justification.clone(),
            })
            .collect();

        let justification = justification.map(|block| PlacedJustification {
            start_row: plan.justification_start_row,
            line_estimates: block.texts().into_iter().map(|t| self.layout.estimate_lines(t)).collect(),
            block,
            may_overflow: plan.may_overflow,
        });

        let display = group.name_with_city();
        debug!(creditor = %group.code, rows = row_count, totals_row = plan.totals_row, "section assembled");

        Ok(StatementSection {
            sheet_name: self.sheet_names.base_name(&group.name, &group.code),
            header: SectionHeader {
                code: group.code.clone(),
                code_cell: self.template.code_cell,
                display,
                name_cell: self.template.name_cell,
            },
            columns: self.template.columns,
            rows,
            totals: TotalsRow {
                row: plan.totals_row,
                label: self.totals_label.clone(),
                amount: total,
            },
            justification,
        })
    }
}
