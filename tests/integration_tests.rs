// Integration tests for Recon Match

use recon_match::config::MatchingSettings;
use recon_match::core::Matcher;
use recon_match::models::{fixtures, Attachment, MatchMethod, RecordId, ScoringWeights, Transaction};
use recon_match::report::Report;

const TRANSACTIONS: &str = include_str!("../data/transactions.json");
const ATTACHMENTS: &str = include_str!("../data/attachments.json");
const EXPECTED: &str = include_str!("../data/expected.json");

fn load() -> (Vec<Transaction>, Vec<Attachment>) {
    (
        fixtures::parse_transactions(TRANSACTIONS).unwrap(),
        fixtures::parse_attachments(ATTACHMENTS).unwrap(),
    )
}

fn create_matcher() -> Matcher {
    let settings = MatchingSettings {
        own_company_names: vec!["Example Company Oy".to_string()],
        ..MatchingSettings::default()
    };
    Matcher::new(&settings, ScoringWeights::default())
}

fn tx<'a>(transactions: &'a [Transaction], id: u64) -> &'a Transaction {
    transactions.iter().find(|t| t.id == RecordId::from(id)).unwrap()
}

fn att<'a>(attachments: &'a [Attachment], id: u64) -> &'a Attachment {
    attachments.iter().find(|a| a.id == RecordId::from(id)).unwrap()
}

fn found_id<T>(found: Option<&T>, id: impl Fn(&T) -> &RecordId) -> Option<RecordId> {
    found.map(|record| id(record).clone())
}

#[test]
fn test_integration_reference_match() {
    let (transactions, attachments) = load();
    let matcher = create_matcher();

    let outcome = matcher.match_attachment(tx(&transactions, 2001), &attachments);
    assert_eq!(outcome.method, MatchMethod::Reference);
    let found = outcome.record().unwrap();
    assert_eq!(found.id, RecordId::from(3001));

    let back = matcher.find_transaction(found, &transactions);
    assert_eq!(found_id(back, |t| &t.id), Some(RecordId::from(2001)));
}

#[test]
fn test_integration_amount_name_date_combo() {
    let (transactions, attachments) = load();
    let matcher = create_matcher();

    // 3009 has the same amount and due date but a different supplier
    let outcome = matcher.match_attachment(tx(&transactions, 2007), &attachments);

    assert_eq!(outcome.method, MatchMethod::NameSimilarity);
    assert_eq!(outcome.amount_matches, 2);
    assert_eq!(found_id(outcome.record(), |a| &a.id), Some(RecordId::from(3006)));
}

#[test]
fn test_integration_no_false_positive_similar_name() {
    let (transactions, attachments) = load();
    let matcher = create_matcher();

    let good = matcher.find_attachment(tx(&transactions, 2005), &attachments);
    assert_eq!(found_id(good, |a| &a.id), Some(RecordId::from(3005)));

    let bad = matcher.find_attachment(tx(&transactions, 2006), &attachments);
    assert!(bad.is_none());
}

#[test]
fn test_integration_outgoing_with_no_contact() {
    let (transactions, attachments) = load();
    let matcher = create_matcher();

    let outcome = matcher.match_attachment(tx(&transactions, 2004), &attachments);

    assert_eq!(outcome.method, MatchMethod::ExactDate);
    assert_eq!(found_id(outcome.record(), |a| &a.id), Some(RecordId::from(3004)));
}

#[test]
fn test_integration_sales_invoice_direction() {
    let (transactions, attachments) = load();
    let matcher = create_matcher();

    let found = matcher.find_transaction(att(&attachments, 3002), &transactions);
    assert_eq!(found_id(found, |t| &t.id), Some(RecordId::from(2002)));
}

#[test]
fn test_integration_unmatched_items() {
    let (transactions, attachments) = load();
    let matcher = create_matcher();

    assert!(matcher.find_attachment(tx(&transactions, 2009), &attachments).is_none());
    assert!(matcher.find_attachment(tx(&transactions, 2010), &attachments).is_none());
    assert!(matcher.find_transaction(att(&attachments, 3008), &transactions).is_none());
    assert!(matcher.find_transaction(att(&attachments, 3009), &transactions).is_none());
}

#[test]
fn test_integration_symmetry_where_expected() {
    let (transactions, attachments) = load();
    let matcher = create_matcher();

    for (tx_id, att_id) in [(2003, 3003), (2008, 3007)] {
        let att_found = matcher.find_attachment(tx(&transactions, tx_id), &attachments);
        let tx_found = matcher.find_transaction(att(&attachments, att_id), &transactions);

        assert_eq!(found_id(att_found, |a| &a.id), Some(RecordId::from(att_id)));
        assert_eq!(found_id(tx_found, |t| &t.id), Some(RecordId::from(tx_id)));
    }
}

#[test]
fn test_integration_full_report() {
    let (transactions, attachments) = load();
    let expected = fixtures::parse_expected(EXPECTED).unwrap();
    let matcher = create_matcher();

    let by_transaction = matcher.match_transactions(&transactions, &attachments);
    let by_attachment = matcher.match_attachments(&attachments, &transactions);

    let tx_report = Report::for_transactions(&transactions, &by_transaction, &expected);
    let att_report = Report::for_attachments(&attachments, &by_attachment, &expected);

    assert!(tx_report.all_correct(), "{}", tx_report);
    assert!(att_report.all_correct(), "{}", att_report);
    assert_eq!(tx_report.summary().total, transactions.len());
    assert_eq!(att_report.summary().total, attachments.len());
}

#[test]
fn test_integration_batch_equals_single_calls() {
    let (transactions, attachments) = load();
    let matcher = create_matcher();

    let batch = matcher.match_transactions(&transactions, &attachments);

    for (transaction, outcome) in transactions.iter().zip(&batch) {
        let single = matcher.find_attachment(transaction, &attachments);
        assert_eq!(
            found_id(single, |a| &a.id),
            found_id(outcome.record(), |a| &a.id)
        );
    }
}

#[test]
fn test_integration_matcher_shared_across_threads() {
    let (transactions, attachments) = load();
    let matcher = create_matcher();

    let sequential: Vec<Option<RecordId>> = transactions
        .iter()
        .map(|t| found_id(matcher.find_attachment(t, &attachments), |a| &a.id))
        .collect();

    let parallel: Vec<Option<RecordId>> = std::thread::scope(|scope| {
        let handles: Vec<_> = transactions
            .iter()
            .map(|t| {
                let matcher = &matcher;
                let attachments = &attachments;
                scope.spawn(move || found_id(matcher.find_attachment(t, attachments), |a| &a.id))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, parallel);
}
