//! End-to-end extraction over multi-page statements.

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

use remb_core::statement::rules::{format_euro_amount, parse_euro_amount};
use remb_core::{
    CollectingObserver, ExtractionError, LineClassifier, ReimbursementRecord, SchemaVariant,
    StatementExtractor, VariantClassifier,
};

const SIMPLE_PAGES: [&str; 3] = [
    "ASSURANCE MALADIE\n\
     Relevé mensuel\n\
     01/02/2023 REMBOURSEMENT SOINS 17,50€\n\
     02/02/2023 REMBOURSEMENT PHARMACIE 8,06€\n",
    "",
    "REMBOURSEMENT\n\
     04/02/2023 Remboursement kiné 9,68 €\n\
     05/02/2023 REMBOURSEMENT SOINS 17,50€\n\
     01/02/2023 REMBOURSEMENT SOINS 17,50€\n",
];

const DETAILED_STATEMENT: &str = "\
Détail des prestations
Date Nature (Code) Payé Base Taux Versé Taux Complément
15/03/2023 CONSULTATION SPECIALISTE (CS) 50,00 30,00 70% 21,00 30% 9,00
16/03/2023 ANALYSES (B) 34,20 34,20 60% 20,52 40% 13,68
\x0c
Page 2/2
20/03/2023 PHARMACIE 12,00 12,00 65% 7,80 35% 4,20
21/03/2023 PHARMACIE 12,00 12,00 65% 7,80 135% 4,20
";

fn simple_dates(records: &[ReimbursementRecord]) -> Vec<&str> {
    records.iter().map(ReimbursementRecord::date).collect()
}

#[test]
fn simple_statement_keeps_order_and_duplicates() {
    let extractor = StatementExtractor::new(SchemaVariant::Simple);
    let pages = SIMPLE_PAGES.iter().map(|p| Some(*p));
    let mut observer = CollectingObserver::new();
    let result = extractor.extract_pages_with(pages, &mut observer);

    assert_eq!(
        simple_dates(result.table.records()),
        vec!["01/02/2023", "02/02/2023", "05/02/2023", "01/02/2023"]
    );
    assert_eq!(result.stats.pages_without_text, 1);
    assert_eq!(result.stats.candidate_lines, 6);

    // the same line twice yields two identical records
    assert_eq!(result.table.records()[0], result.table.records()[3]);

    // a lone euro sign as last token is not an amount
    let rejected: Vec<&str> = observer.skipped().iter().map(|s| s.text.as_str()).collect();
    assert_eq!(rejected, vec!["REMBOURSEMENT", "04/02/2023 Remboursement kiné 9,68 €"]);
}

#[test]
fn detailed_statement_rows_and_rejections() {
    let extractor = StatementExtractor::new(SchemaVariant::Detailed);
    let mut observer = CollectingObserver::new();
    let result = extractor.extract_pages_with(
        remb_core::statement::split_pages(DETAILED_STATEMENT),
        &mut observer,
    );

    let table = result.clone().into_table().unwrap();
    assert_eq!(table.columns(), SchemaVariant::Detailed.columns());
    assert_eq!(
        table.rows(),
        vec![
            vec!["15/03/2023", "CONSULTATION SPECIALISTE", "CS", "50.00", "30.00", "70", "21.00", "30", "9.00"],
            vec!["16/03/2023", "ANALYSES", "B", "34.20", "34.20", "60", "20.52", "40", "13.68"],
            vec!["20/03/2023", "PHARMACIE", "", "12.00", "12.00", "65", "7.80", "35", "4.20"],
        ]
    );

    assert_eq!(observer.skipped().len(), 1);
    assert_eq!(observer.skipped()[0].page, 2);
    assert_eq!(result.stats.matched, 3);
}

#[test]
fn nothing_found_is_reported_not_raised() {
    for variant in SchemaVariant::ALL {
        let result = StatementExtractor::new(variant).extract_text("Aucune prestation\x0c\x0c");
        assert!(result.is_empty());
        assert_eq!(result.into_table(), Err(ExtractionError::NoData));
    }
}

#[test]
fn comma_decimal_round_trip() {
    let classifier = VariantClassifier::new(SchemaVariant::Standard);
    let line = "01/02/2023 CONSULTATION MEDECIN 25,00 25,00 70% 17,50";

    let Some(ReimbursementRecord::Standard(record)) = classifier.classify(line) else {
        panic!("line did not match");
    };

    for amount in [record.base_amount, record.reimbursed_amount] {
        let printed = format_euro_amount(amount);
        assert_eq!(parse_euro_amount(&printed), Some(amount));
    }
    assert_eq!(record.reimbursed_amount, Decimal::new(1750, 2));
}

#[test]
fn extraction_is_idempotent() {
    let extractor = StatementExtractor::new(SchemaVariant::Detailed);
    assert_eq!(
        extractor.extract_text(DETAILED_STATEMENT),
        extractor.extract_text(DETAILED_STATEMENT)
    );
}

#[tokio::test]
async fn independent_runs_on_blocking_tasks() {
    let documents = vec![
        (SchemaVariant::Simple, SIMPLE_PAGES.join("\x0c")),
        (SchemaVariant::Detailed, DETAILED_STATEMENT.to_string()),
    ];

    let handles: Vec<_> = documents
        .into_iter()
        .map(|(variant, text)| {
            tokio::task::spawn_blocking(move || StatementExtractor::new(variant).extract_text(&text))
        })
        .collect();

    let mut counts = Vec::new();
    for handle in handles {
        counts.push(handle.await.unwrap().table.len());
    }
    assert_eq!(counts, vec![4, 3]);
}
