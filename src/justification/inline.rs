use crate::core::CreditorGroup;

use super::{JustificationBlock, ResolveJustification};

/// Collects justification text written directly on the line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineResolver {
    /// Disposition code whose items carry inline justifications.
    pub code: String,
    /// Heading printed above the paragraph.
    pub heading: String,
}

impl InlineResolver {
    pub fn new(code: impl Into<String>, heading: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            heading: heading.into(),
        }
    }
}

impl ResolveJustification for InlineResolver {
    fn resolve(&self, group: &CreditorGroup) -> Option<JustificationBlock> {
        let texts: Vec<&str> = group
            .items()
            .iter()
            .filter(|item| item.has_disposition(&self.code))
            .map(|item| item.justification.trim())
            .filter(|text| !text.is_empty())
            .collect();
        if texts.is_empty() {
            return None;
        }
        Some(JustificationBlock::Inline {
            heading: self.heading.clone(),
            text: texts.join(super::PARAGRAPH_SEPARATOR),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LineItem;
    use rust_decimal::Decimal;

    fn item(code: &str, text: &str) -> LineItem {
        LineItem {
            creditor_code: "1".into(),
            creditor_name: "Acme".into(),
            creditor_city: String::new(),
            claim_id: "C1".into(),
            reference_number: "1".into(),
            amount: Decimal::ZERO,
            classification: String::new(),
            disposition: code.into(),
            justification: text.into(),
        }
    }

    fn resolver() -> InlineResolver {
        InlineResolver::new("NA14", "Begründung (Anderes/Rechtsstreit)")
    }

    #[test]
    fn joins_texts_in_order() {
        let group = CreditorGroup::new(
            "1",
            "Acme",
            "",
            vec![
                item("NA14", "Erstens"),
                item("NA15", "ignoriert"),
                item("na14", "Zweitens"),
                item("NA14", "   "),
                item("NA14", "Erstens"),
            ],
        );
        let block = resolver().resolve(&group).unwrap();
        assert_eq!(
            block,
            JustificationBlock::Inline {
                heading: "Begründung (Anderes/Rechtsstreit)".into(),
                text: "Erstens\n\nZweitens\n\nErstens".into(),
            }
        );
    }

    #[test]
    fn no_matching_items_no_block() {
        let group = CreditorGroup::new("1", "Acme", "", vec![item("NA15", "x"), item("NA14", "")]);
        assert!(resolver().resolve(&group).is_none());
    }
}
