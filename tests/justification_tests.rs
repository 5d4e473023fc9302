use beilage::config::StatementConfig;
use beilage::core::{RawValue, Table};
use beilage::justification::*;
use beilage::statement::build_statements;

fn table(headers: &[&str], rows: &[&[RawValue]]) -> Table {
    Table::new(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter().map(|r| r.to_vec()).collect(),
    )
}

fn t(s: &str) -> RawValue {
    RawValue::from(s)
}

fn ledger() -> Table {
    let headers = [
        "ithSupplierCode",
        "ithSupplierName",
        "ithSupplierExternalNbr1",
        "ER",
        "itlTotalAmount",
        "itlCostCentreCode1",
        "Code",
        "Begründung",
    ];
    let row = |code: &str, name: &str, claim: &str, er: RawValue, disp: &str| {
        vec![t(code), t(name), t(claim), er, RawValue::Int(100), t("9099300"), t(disp), t("")]
    };
    Table::new(
        headers.map(String::from).to_vec(),
        vec![
            row("1", "Acme GmbH", "C1", RawValue::Number(959168.0), "NA15"),
            row("1", "Acme GmbH", "C2", t("959170"), "NA15"),
            row("1", "Acme GmbH", "C3", t("959171"), "NA14"),
            row("2", "Beta AG", "C1", t("1"), "NA15"),
        ],
    )
}

/// Register as exported: a title row above the real header row.
fn register_with_title_row() -> Table {
    table(
        &["NA15 Begründungen", "", ""],
        &[
            &[t("ER"), t("Name"), t("Kommentar Begründung")],
            &[t("0959-168"), t("ACME  gmbh"), t("Lieferung unvollständig")],
            &[t("959168"), t("Acme GmbH"), t("Mängel dokumentiert")],
            &[t("959171"), t("Acme GmbH"), t("nicht markiert")],
            &[t(""), t("Acme GmbH"), t("ohne Nummer")],
            &[t("1"), t("Gamma KG"), t("anderer Kreditor")],
        ],
    )
}

#[test]
fn register_detects_header_below_title_row() {
    let register = JustificationRegister::from_table(&register_with_title_row(), &RegisterSynonyms::default(), 5);
    assert_eq!(register.len(), 3);
    assert_eq!(
        register.lookup("Acme GmbH", "959168.0"),
        &["Lieferung unvollständig".to_string(), "Mängel dokumentiert".to_string()]
    );
    assert!(register.lookup("Acme GmbH", "").is_empty());
}

#[test]
fn register_header_outside_scan_depth_is_ignored() {
    let register = JustificationRegister::from_table(&register_with_title_row(), &RegisterSynonyms::default(), 0);
    assert!(register.is_empty());
}

#[test]
fn synonym_priority_picks_first_listed_name() {
    // "Kommentar Begründung" outranks "Begründung" even though it sits further right
    let register = table(
        &["Lieferant", "RE-Nr.", "Begründung", "Kommentar Begründung"],
        &[&[t("Acme"), t("7"), t("kurz"), t("ausführlich")]],
    );
    let synonyms = RegisterSynonyms::default();
    let columns = synonyms.resolve(&register.headers).unwrap();
    assert_eq!(columns, RegisterColumns { name: 0, reference: 1, text: 3 });
    let register = JustificationRegister::from_table(&register, &synonyms, 5);
    assert_eq!(register.lookup("acme", "7"), &["ausführlich".to_string()]);
}

#[test]
fn unrecognized_register_is_empty() {
    let register = table(&["A", "B", "C"], &[&[t("x"), t("y"), t("z")]]);
    assert!(JustificationRegister::from_table(&register, &RegisterSynonyms::default(), 5).is_empty());
}

#[test]
fn cross_reference_blocks_from_register() {
    let outcome = build_statements(&ledger(), Some(&register_with_title_row()), &StatementConfig::default()).unwrap();
    let acme = outcome.sections.iter().find(|s| s.header.code == "1").unwrap();
    let placed = acme.justification.as_ref().unwrap();
    assert_eq!(placed.start_row, 17);
    match &placed.block {
        JustificationBlock::CrossReference {
            heading,
            reference_title,
            text_title,
            rows,
        } => {
            assert_eq!(heading, "Begründungen (NA15)");
            assert_eq!(reference_title, "ER Nr.");
            assert_eq!(text_title, "Begründung");
            // 959170 has no register entry, 959171 is not tagged NA15
            assert_eq!(
                rows,
                &vec![ReferenceJustification {
                    reference_number: "959168".into(),
                    text: "Lieferung unvollständig\n\nMängel dokumentiert".into(),
                }]
            );
        }
        other => panic!("expected cross-reference block, got {other:?}"),
    }
    assert_eq!(placed.line_estimates, vec![3]);

    // Beta AG is absent from the register
    let beta = outcome.sections.iter().find(|s| s.header.code == "2").unwrap();
    assert!(beta.justification.is_none());
}

#[test]
fn strategies_are_never_mixed() {
    let config = StatementConfig::builder()
        .strategy(JustificationStrategy::Inline)
        .build()
        .unwrap();
    let outcome = build_statements(&ledger(), Some(&register_with_title_row()), &config).unwrap();
    // inline: NA14 item C3 has no text, so nothing is printed
    assert!(outcome.sections.iter().all(|s| s.justification.is_none()));
}

#[test]
fn resolver_from_config_uses_codes() {
    let mut config = JustificationConfig::default();
    config.cross_reference_code = "NA99".into();
    let register = JustificationRegister::from_table(&register_with_title_row(), &config.synonyms, 5);
    let resolver = JustificationResolver::from_config(&config, Some(register));
    let groups = beilage::core::group_by_creditor(
        beilage::core::read_line_items(&ledger(), &Default::default()).unwrap(),
        &Default::default(),
    );
    assert!(groups.iter().all(|g| resolver.resolve(g).is_none()));
}

#[test]
fn cross_reference_runs_are_idempotent() {
    let config = StatementConfig::default();
    let register = register_with_title_row();
    let a = build_statements(&ledger(), Some(&register), &config).unwrap();
    let b = build_statements(&ledger(), Some(&register), &config).unwrap();
    assert!(a.sections.iter().any(|s| s.justification.is_some()));
    assert_eq!(a.sections, b.sections);
    assert_eq!(a.advisories, b.advisories);
    assert_eq!(a.failures.len(), b.failures.len());
}
