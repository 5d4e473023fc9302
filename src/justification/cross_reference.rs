use std::collections::HashSet;
use std::sync::Arc;

use crate::core::CreditorGroup;
use crate::core::normalize::reference_key;

use super::register::JustificationRegister;
use super::{JustificationBlock, ReferenceJustification, ResolveJustification};

/// Looks up justifications for tagged reference numbers in a register.
#[derive(Debug, Clone)]
pub struct CrossReferenceResolver {
    /// Disposition code whose reference numbers are looked up.
    pub code: String,
    /// Heading printed above the table.
    pub heading: String,
    /// Column title for reference numbers.
    pub reference_title: String,
    /// Column title for justification texts.
    pub text_title: String,
    register: Arc<JustificationRegister>,
}

impl CrossReferenceResolver {
    pub fn new(
        code: impl Into<String>,
        heading: impl Into<String>,
        reference_title: impl Into<String>,
        text_title: impl Into<String>,
        register: Arc<JustificationRegister>,
    ) -> Self {
        Self {
            code: code.into(),
            heading: heading.into(),
            reference_title: reference_title.into(),
            text_title: text_title.into(),
            register,
        }
    }

    pub fn register(&self) -> &JustificationRegister {
        &self.register
    }

    /// Distinct tagged reference numbers of a group, sorted.
    ///
    /// Numbers that normalize to the same key are reported once, under the
    /// first spelling in sort order.
    fn tagged_references<'a>(&self, group: &'a CreditorGroup) -> Vec<&'a str> {
        let mut refs: Vec<&str> = group
            .items()
            .iter()
            .filter(|item| item.has_disposition(&self.code))
            .map(|item| item.reference_number.trim())
            .filter(|r| !r.is_empty())
            .collect();
        refs.sort_unstable();
        refs.dedup();

        let mut seen = HashSet::new();
        refs.retain(|r| seen.insert(reference_key(r)));
        refs
    }
}

impl ResolveJustification for CrossReferenceResolver {
    fn resolve(&self, group: &CreditorGroup) -> Option<JustificationBlock> {
        let rows: Vec<ReferenceJustification> = self
            .tagged_references(group)
            .into_iter()
            .filter_map(|reference| {
                let texts = self.register.lookup(&group.name, reference);
                if texts.is_empty() {
                    return None;
                }
                Some(ReferenceJustification {
                    reference_number: reference.to_string(),
                    text: texts.join(super::PARAGRAPH_SEPARATOR),
                })
            })
            .collect();
        if rows.is_empty() {
            return None;
        }
        Some(JustificationBlock::CrossReference {
            heading: self.heading.clone(),
            reference_title: self.reference_title.clone(),
            text_title: self.text_title.clone(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LineItem;
    use rust_decimal::Decimal;

    fn item(code: &str, reference: &str) -> LineItem {
        LineItem {
            creditor_code: "1".into(),
            creditor_name: "Acme".into(),
            creditor_city: String::new(),
            claim_id: "C1".into(),
            reference_number: reference.into(),
            amount: Decimal::ZERO,
            classification: String::new(),
            disposition: code.into(),
            justification: String::new(),
        }
    }

    fn resolver(rows: &[(&str, &str, &str)]) -> CrossReferenceResolver {
        CrossReferenceResolver::new(
            "NA15",
            "Begründungen (NA15)",
            "ER Nr.",
            "Begründung",
            Arc::new(JustificationRegister::from(rows)),
        )
    }

    fn rows_of(block: Option<JustificationBlock>) -> Vec<(String, String)> {
        match block {
            Some(JustificationBlock::CrossReference { rows, .. }) => rows
                .into_iter()
                .map(|r| (r.reference_number, r.text))
                .collect(),
            other => panic!("expected cross-reference block, got {other:?}"),
        }
    }

    #[test]
    fn matches_normalized_reference_numbers() {
        let r = resolver(&[("Acme", "0959-168", "Lorem")]);
        let group = CreditorGroup::new("1", "Acme", "", vec![item("NA15", "959168.0")]);
        assert_eq!(rows_of(r.resolve(&group)), vec![("959168.0".into(), "Lorem".into())]);
    }

    #[test]
    fn trailing_zero_spelling_does_not_match() {
        // "9591680" is a different number, not "959168.0" with the dot dropped
        let r = resolver(&[("Acme", "9591680", "Lorem")]);
        let group = CreditorGroup::new("1", "Acme", "", vec![item("NA15", "959168.0")]);
        assert!(r.resolve(&group).is_none());
    }

    #[test]
    fn multiple_texts_concatenate() {
        let r = resolver(&[("Acme", "1", "A"), ("Acme", "1", "B"), ("Acme", "2", "C")]);
        let group = CreditorGroup::new(
            "1",
            "Acme",
            "",
            vec![item("NA15", "2"), item("NA15", "1"), item("NA15", "001"), item("NA15", "1")],
        );
        assert_eq!(
            rows_of(r.resolve(&group)),
            vec![("001".into(), "A\n\nB".into()), ("2".into(), "C".into())]
        );
    }

    #[test]
    fn only_tagged_items_are_looked_up() {
        let r = resolver(&[("Acme", "1", "A")]);
        let group = CreditorGroup::new("1", "Acme", "", vec![item("NA14", "1")]);
        assert!(r.resolve(&group).is_none());
    }

    #[test]
    fn unknown_creditor_yields_nothing() {
        let r = resolver(&[("Acme", "1", "A")]);
        let group = CreditorGroup::new("2", "Beta", "", vec![item("NA15", "1")]);
        assert!(r.resolve(&group).is_none());
    }

    #[test]
    fn empty_register_yields_nothing() {
        let r = resolver(&[]);
        let group = CreditorGroup::new("1", "Acme", "", vec![item("NA15", "1")]);
        assert!(r.resolve(&group).is_none());
        assert!(r.register().is_empty());
    }
}
