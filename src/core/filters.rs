use crate::core::normalize::normalize_reference;
use crate::models::{Attachment, Transaction};

/// Convert an amount to integer minor units at the given precision
///
/// Returns `None` for missing, non-finite or out-of-range amounts, which
/// disqualifies the record from amount matching.
#[inline]
pub fn to_minor_units(amount: Option<f64>, precision: u32) -> Option<i64> {
    let amount = amount?;
    if !amount.is_finite() {
        return None;
    }

    let scaled = (amount * 10f64.powi(precision as i32)).round();
    if scaled.abs() >= i64::MAX as f64 {
        return None;
    }

    Some(scaled as i64)
}

/// Check that a transaction pays exactly the attachment total
///
/// This is the hard amount filter: outflows are negative while invoice
/// totals are positive, so the transaction magnitude is compared. An equal
/// signed amount also passes, which keeps credit notes matchable.
#[inline]
pub fn is_amount_match(transaction: &Transaction, attachment: &Attachment, precision: u32) -> bool {
    let (Some(tx), Some(total)) = (
        to_minor_units(transaction.amount, precision),
        to_minor_units(attachment.total_amount, precision),
    ) else {
        return false;
    };

    tx.abs() == total || tx == total
}

/// Check whether both sides carry equal, non-empty normalized references
#[inline]
pub fn is_reference_match(transaction: &Transaction, attachment: &Attachment) -> bool {
    match (
        normalize_reference(transaction.reference.as_deref()),
        normalize_reference(attachment.reference.as_deref()),
    ) {
        (Some(tx_ref), Some(att_ref)) => tx_ref == att_ref,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordId;

    fn create_transaction(amount: Option<f64>, reference: Option<&str>) -> Transaction {
        Transaction {
            id: RecordId::from(1),
            date: None,
            amount,
            contact: None,
            reference: reference.map(str::to_string),
        }
    }

    fn create_attachment(total: Option<f64>, reference: Option<&str>) -> Attachment {
        Attachment {
            id: RecordId::from(2),
            kind: None,
            total_amount: total,
            reference: reference.map(str::to_string),
            supplier: None,
            issuer: None,
            recipient: None,
            due_date: None,
            invoicing_date: None,
            receiving_date: None,
        }
    }

    #[test]
    fn test_minor_units_rounding() {
        assert_eq!(to_minor_units(Some(0.1 + 0.2), 2), Some(30));
        assert_eq!(to_minor_units(Some(-120.5), 2), Some(-12050));
        assert_eq!(to_minor_units(Some(42.0), 0), Some(42));
    }

    #[test]
    fn test_minor_units_unusable() {
        assert_eq!(to_minor_units(None, 2), None);
        assert_eq!(to_minor_units(Some(f64::NAN), 2), None);
        assert_eq!(to_minor_units(Some(f64::INFINITY), 2), None);
        assert_eq!(to_minor_units(Some(1e30), 2), None);
    }

    #[test]
    fn test_outflow_matches_invoice_total() {
        let tx = create_transaction(Some(-99.9), None);
        let att = create_attachment(Some(99.90), None);
        assert!(is_amount_match(&tx, &att, 2));
    }

    #[test]
    fn test_amount_mismatch() {
        let tx = create_transaction(Some(-99.9), None);
        let att = create_attachment(Some(99.91), None);
        assert!(!is_amount_match(&tx, &att, 2));
    }

    #[test]
    fn test_signed_credit_note() {
        let tx = create_transaction(Some(-25.0), None);
        let att = create_attachment(Some(-25.0), None);
        assert!(is_amount_match(&tx, &att, 2));
    }

    #[test]
    fn test_missing_amount_never_matches() {
        let tx = create_transaction(None, None);
        let att = create_attachment(Some(0.0), None);
        assert!(!is_amount_match(&tx, &att, 2));

        let tx = create_transaction(Some(0.0), None);
        let att = create_attachment(None, None);
        assert!(!is_amount_match(&tx, &att, 2));
    }

    #[test]
    fn test_reference_match_normalized() {
        let tx = create_transaction(None, Some("INV-001"));
        let att = create_attachment(None, Some("inv-001"));
        assert!(is_reference_match(&tx, &att));

        let tx = create_transaction(None, Some("00012345"));
        let att = create_attachment(None, Some("12 345"));
        assert!(is_reference_match(&tx, &att));
    }

    #[test]
    fn test_missing_reference_never_matches() {
        let tx = create_transaction(None, None);
        let att = create_attachment(None, None);
        assert!(!is_reference_match(&tx, &att));

        let tx = create_transaction(None, Some(" "));
        let att = create_attachment(None, Some(""));
        assert!(!is_reference_match(&tx, &att));
    }
}
