//! Run configuration.
//!
//! Every column name, code table, cell address and layout constant used by
//! a run lives in one immutable [`StatementConfig`]. Defaults reproduce the
//! standard "Beilage" template; partial TOML files only override what they
//! name.

use serde::{Deserialize, Serialize};

use crate::core::{ColumnMap, CostCenterTable, SequencePolicy, StatementError};
use crate::justification::{JustificationConfig, JustificationStrategy};
use crate::statement::{
    LayoutPolicy, MAX_SHEET_ROW, PageSetup, SheetNamePolicy, StatementAssembler, TemplateLayout,
};

/// Longest worksheet name an xlsx workbook accepts.
const MAX_SHEET_NAME_LEN: usize = 31;

/// Complete configuration of a statement run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementConfig {
    /// Input sheet holding the ledger.
    pub input_sheet: String,
    /// Label in the first column of the totals row.
    pub totals_label: String,
    pub columns: ColumnMap,
    pub template: TemplateLayout,
    pub layout: LayoutPolicy,
    pub cost_centers: CostCenterTable,
    pub sequence: SequencePolicy,
    pub justification: JustificationConfig,
    pub sheet_names: SheetNamePolicy,
    pub page: PageSetup,
}

impl Default for StatementConfig {
    fn default() -> Self {
        Self {
            input_sheet: "Kontierung".into(),
            totals_label: "Total".into(),
            columns: ColumnMap::default(),
            template: TemplateLayout::default(),
            layout: LayoutPolicy::default(),
            cost_centers: CostCenterTable::default(),
            sequence: SequencePolicy::default(),
            justification: JustificationConfig::default(),
            sheet_names: SheetNamePolicy::default(),
            page: PageSetup::default(),
        }
    }
}

impl StatementConfig {
    pub fn builder() -> StatementConfigBuilder {
        StatementConfigBuilder::new()
    }

    /// Parse a TOML document; missing keys keep their defaults.
    ///
    /// ```
    /// use beilage::config::StatementConfig;
    ///
    /// let config = StatementConfig::from_toml_str(r#"
    ///     input_sheet = "Tabelle1"
    ///
    ///     [justification]
    ///     strategy = "inline"
    /// "#).unwrap();
    /// assert_eq!(config.input_sheet, "Tabelle1");
    /// assert_eq!(config.template.table_start_row, 10);
    /// ```
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, StatementError> {
        let config: Self = toml::from_str(s).map_err(|e| StatementError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML, e.g. to write out the defaults as a starting point.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, StatementError> {
        toml::to_string_pretty(self).map_err(|e| StatementError::Config(e.to_string()))
    }

    /// Reject settings no run can work with.
    pub fn validate(&self) -> Result<(), StatementError> {
        let fail = |msg: String| Err(StatementError::Config(msg));

        if self.input_sheet.trim().is_empty() {
            return fail("input sheet name is empty".into());
        }
        let columns = &self.columns;
        if columns.required().iter().any(|c| c.trim().is_empty()) {
            return fail("required column names must not be empty".into());
        }

        let template = &self.template;
        if template.table_start_row == 0 || template.header_row == 0 {
            return fail("rows start at 1".into());
        }
        if template.table_start_row <= template.header_row {
            return fail(format!(
                "table start row {} must follow header row {}",
                template.table_start_row, template.header_row
            ));
        }
        if template.table_start_row >= MAX_SHEET_ROW {
            return fail(format!("table start row {} is past the sheet", template.table_start_row));
        }
        let body = template.columns.all();
        for (i, col) in body.iter().enumerate() {
            if body[..i].contains(col) {
                return fail(format!("body column {col} is assigned twice"));
            }
        }

        let layout = &self.layout;
        if layout.chars_per_line == 0 || layout.max_lines == 0 {
            return fail("line estimate needs chars_per_line and max_lines above 0".into());
        }
        if !(layout.line_height.is_finite() && layout.line_height > 0.0) {
            return fail(format!("invalid line height {}", layout.line_height));
        }

        let names = &self.sheet_names;
        if names.max_len == 0 || names.max_len > MAX_SHEET_NAME_LEN {
            return fail(format!(
                "sheet name length {} outside 1..={MAX_SHEET_NAME_LEN}",
                names.max_len
            ));
        }
        if names.default_label.trim().is_empty() {
            return fail("default sheet label is empty".into());
        }

        let just = &self.justification;
        if just.inline_code.trim().is_empty() || just.cross_reference_code.trim().is_empty() {
            return fail("disposition codes must not be empty".into());
        }
        if just.strategy == JustificationStrategy::CrossReference && just.register_sheet.trim().is_empty() {
            return fail("register sheet name is empty".into());
        }
        Ok(())
    }

    /// The assembler this configuration describes.
    pub fn assembler(&self) -> StatementAssembler {
        StatementAssembler::new(
            self.template.clone(),
            self.layout.clone(),
            self.cost_centers.clone(),
            self.sheet_names.clone(),
            self.totals_label.clone(),
        )
    }
}

/// Builder for [`StatementConfig`].
///
/// # Example
///
/// ```
/// use beilage::config::StatementConfig;
/// use beilage::justification::JustificationStrategy;
///
/// let config = StatementConfig::builder()
///     .input_sheet("Kontierung")
///     .strategy(JustificationStrategy::Inline)
///     .build()
///     .unwrap();
/// assert_eq!(config.justification.strategy, JustificationStrategy::Inline);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StatementConfigBuilder {
    config: StatementConfig,
}

impl StatementConfigBuilder {
    /// Start from the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ledger sheet name.
    pub fn input_sheet(mut self, name: impl Into<String>) -> Self {
        self.config.input_sheet = name.into();
        self
    }

    /// Set the input column names.
    pub fn columns(mut self, columns: ColumnMap) -> Self {
        self.config.columns = columns;
        self
    }

    pub fn template(mut self, template: TemplateLayout) -> Self {
        self.config.template = template;
        self
    }

    pub fn layout(mut self, layout: LayoutPolicy) -> Self {
        self.config.layout = layout;
        self
    }

    /// Replace the cost-center legend.
    pub fn cost_centers(mut self, table: CostCenterTable) -> Self {
        self.config.cost_centers = table;
        self
    }

    pub fn sequence(mut self, sequence: SequencePolicy) -> Self {
        self.config.sequence = sequence;
        self
    }

    pub fn justification(mut self, justification: JustificationConfig) -> Self {
        self.config.justification = justification;
        self
    }

    /// Select the justification strategy, keeping the other justification settings.
    pub fn strategy(mut self, strategy: JustificationStrategy) -> Self {
        self.config.justification.strategy = strategy;
        self
    }

    /// Set the register sheet name.
    pub fn register_sheet(mut self, name: impl Into<String>) -> Self {
        self.config.justification.register_sheet = name.into();
        self
    }

    pub fn sheet_names(mut self, policy: SheetNamePolicy) -> Self {
        self.config.sheet_names = policy;
        self
    }

    pub fn page(mut self, page: PageSetup) -> Self {
        self.config.page = page;
        self
    }

    pub fn totals_label(mut self, label: impl Into<String>) -> Self {
        self.config.totals_label = label.into();
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<StatementConfig, StatementError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::Column;

    #[test]
    fn defaults_are_valid() {
        assert!(StatementConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_unusable_settings() {
        let mut config = StatementConfig::default();
        config.template.table_start_row = 0;
        assert!(matches!(config.validate(), Err(StatementError::Config(_))));

        let mut config = StatementConfig::default();
        config.sheet_names.max_len = 32;
        assert!(config.validate().is_err());

        let mut config = StatementConfig::default();
        config.columns.amount = " ".into();
        assert!(config.validate().is_err());

        let mut config = StatementConfig::default();
        config.justification.cross_reference_code.clear();
        assert!(config.validate().is_err());

        let mut config = StatementConfig::default();
        config.template.columns.amount = Column(0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("assigned twice"));
    }

    #[test]
    fn builder_validates() {
        let err = StatementConfig::builder().input_sheet("").build().unwrap_err();
        assert!(err.is_fatal());
        let config = StatementConfig::builder().totals_label("Summe").build().unwrap();
        assert_eq!(config.totals_label, "Summe");
        assert_eq!(config.assembler().totals_label, "Summe");
    }

    #[cfg(feature = "config")]
    #[test]
    fn partial_toml_keeps_defaults() {
        let config = StatementConfig::from_toml_str(
            r#"
            totals_label = "Summe"

            [template]
            code_cell = "C4"

            [layout]
            page_capacity_rows = 40

            [justification]
            strategy = "inline"
            inline_code = "NA99"
            "#,
        )
        .unwrap();
        assert_eq!(config.totals_label, "Summe");
        assert_eq!(config.template.code_cell.to_string(), "C4");
        assert_eq!(config.template.name_cell.to_string(), "B5");
        assert_eq!(config.layout.page_capacity_rows, 40);
        assert_eq!(config.layout.gap_rows, 3);
        assert_eq!(config.justification.strategy, JustificationStrategy::Inline);
        assert_eq!(config.justification.inline_code, "NA99");
        assert_eq!(config.justification.cross_reference_code, "NA15");
        assert_eq!(config.input_sheet, "Kontierung");
    }

    #[cfg(feature = "config")]
    #[test]
    fn bad_toml_is_a_config_error() {
        let err = StatementConfig::from_toml_str("[template]\ncode_cell = \"4B\"").unwrap_err();
        assert!(matches!(err, StatementError::Config(_)));
        let err = StatementConfig::from_toml_str("[sheet_names]\nmax_len = 0").unwrap_err();
        assert!(matches!(err, StatementError::Config(_)));
    }

    #[cfg(feature = "config")]
    #[test]
    fn defaults_survive_toml() {
        let config = StatementConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(StatementConfig::from_toml_str(&text).unwrap(), config);
    }
}
