//! Justification resolution.
//!
//! Two strategies supply the text printed below a creditor's totals:
//!
//! - **cross-reference** (canonical): reference numbers of items tagged with
//!   the cross-reference code are looked up in a [`JustificationRegister`]
//!   keyed by (creditor name, reference number);
//! - **inline**: texts written directly on items tagged with the inline code
//!   are concatenated into one paragraph.
//!
//! One strategy is selected per run; they are never mixed.

mod cross_reference;
mod inline;
mod register;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::CreditorGroup;

pub use cross_reference::CrossReferenceResolver;
pub use inline::InlineResolver;
pub use register::{JustificationRegister, RegisterColumns, RegisterKey, RegisterSynonyms};

/// Separator between concatenated justification texts.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Which justification source a run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JustificationStrategy {
    #[default]
    CrossReference,
    Inline,
}

impl std::fmt::Display for JustificationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CrossReference => write!(f, "cross-reference"),
            Self::Inline => write!(f, "inline"),
        }
    }
}

impl std::str::FromStr for JustificationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cross-reference" | "crossreference" | "register" => Ok(Self::CrossReference),
            "inline" => Ok(Self::Inline),
            other => Err(format!("unknown justification strategy '{other}'")),
        }
    }
}

/// Settings for both justification strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JustificationConfig {
    pub strategy: JustificationStrategy,
    /// Disposition code of items with inline justification text.
    pub inline_code: String,
    /// Disposition code of items looked up in the register.
    pub cross_reference_code: String,
    pub inline_heading: String,
    pub cross_reference_heading: String,
    pub reference_title: String,
    pub text_title: String,
    /// Sheet holding the register inside the input workbook.
    pub register_sheet: String,
    /// How many leading rows may precede the register's header row.
    pub header_scan_rows: usize,
    pub synonyms: RegisterSynonyms,
}

impl Default for JustificationConfig {
    fn default() -> Self {
        Self {
            strategy: JustificationStrategy::CrossReference,
            inline_code: "NA14".into(),
            cross_reference_code: "NA15".into(),
            inline_heading: "Begründung (Anderes/Rechtsstreit)".into(),
            cross_reference_heading: "Begründungen (NA15)".into(),
            reference_title: "ER Nr.".into(),
            text_title: "Begründung".into(),
            register_sheet: "NA15 Begründungen".into(),
            header_scan_rows: 5,
            synonyms: RegisterSynonyms::default(),
        }
    }
}

/// One reference number and its joined justification texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceJustification {
    pub reference_number: String,
    pub text: String,
}

/// Justification content placed below a creditor's totals row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JustificationBlock {
    /// Heading plus one wrapped paragraph.
    Inline { heading: String, text: String },
    /// Heading plus a two-column table of reference numbers and texts.
    CrossReference {
        heading: String,
        reference_title: String,
        text_title: String,
        rows: Vec<ReferenceJustification>,
    },
}

impl JustificationBlock {
    pub fn heading(&self) -> &str {
        match self {
            Self::Inline { heading, .. } | Self::CrossReference { heading, .. } => heading,
        }
    }

    /// The texts whose display height must be estimated, in print order.
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Self::Inline { text, .. } => vec![text.as_str()],
            Self::CrossReference { rows, .. } => rows.iter().map(|r| r.text.as_str()).collect(),
        }
    }
}

/// A source of justification blocks for creditor groups.
pub trait ResolveJustification {
    /// The block for `group`, or `None` when nothing applies.
    fn resolve(&self, group: &CreditorGroup) -> Option<JustificationBlock>;
}

/// The strategy chosen for a run.
#[derive(Debug, Clone)]
pub enum JustificationResolver {
    Inline(InlineResolver),
    CrossReference(CrossReferenceResolver),
}

impl JustificationResolver {
    /// Select the strategy named in `config`.
    ///
    /// The register is only consulted by the cross-reference strategy; a
    /// missing register makes every lookup miss.
    pub fn from_config(config: &JustificationConfig, register: Option<JustificationRegister>) -> Self {
        match config.strategy {
            JustificationStrategy::Inline => Self::Inline(InlineResolver::new(
                config.inline_code.clone(),
                config.inline_heading.clone(),
            )),
            JustificationStrategy::CrossReference => Self::CrossReference(CrossReferenceResolver::new(
                config.cross_reference_code.clone(),
                config.cross_reference_heading.clone(),
                config.reference_title.clone(),
                config.text_title.clone(),
                Arc::new(register.unwrap_or_default()),
            )),
        }
    }

    pub fn strategy(&self) -> JustificationStrategy {
        match self {
            Self::Inline(_) => JustificationStrategy::Inline,
            Self::CrossReference(_) => JustificationStrategy::CrossReference,
        }
    }
}

impl ResolveJustification for JustificationResolver {
    fn resolve(&self, group: &CreditorGroup) -> Option<JustificationBlock> {
        match self {
            Self::Inline(r) => r.resolve(group),
            Self::CrossReference(r) => r.resolve(group),
        }
    }
}
