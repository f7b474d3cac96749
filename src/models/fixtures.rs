use crate::models::domain::{Attachment, RecordId, Transaction};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors that can occur while loading fixture files
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Transaction {id} has an invalid {field}: {value:?}")]
    InvalidDate {
        id: RecordId,
        field: &'static str,
        value: String,
    },
}

/// Transaction as stored in fixture files
#[derive(Debug, Clone, Deserialize)]
struct TransactionRecord {
    id: RecordId,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default)]
    contact: Option<String>,
    #[serde(default)]
    reference: Option<String>,
}

/// Attachment as stored in fixture files, payload nested under `data`
#[derive(Debug, Clone, Deserialize)]
struct AttachmentRecord {
    id: RecordId,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    data: AttachmentData,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct AttachmentData {
    #[serde(default)]
    total_amount: Option<f64>,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    supplier: Option<String>,
    #[serde(default)]
    issuer: Option<String>,
    #[serde(default)]
    recipient: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    invoicing_date: Option<String>,
    #[serde(default)]
    receiving_date: Option<String>,
}

/// Known-correct transaction/attachment pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedPair {
    pub transaction_id: RecordId,
    pub attachment_id: RecordId,
}

pub fn load_transactions<P: AsRef<Path>>(path: P) -> Result<Vec<Transaction>, FixtureError> {
    parse_transactions(&read(path.as_ref())?)
}

pub fn load_attachments<P: AsRef<Path>>(path: P) -> Result<Vec<Attachment>, FixtureError> {
    parse_attachments(&read(path.as_ref())?)
}

pub fn load_expected<P: AsRef<Path>>(path: P) -> Result<Vec<ExpectedPair>, FixtureError> {
    parse_expected(&read(path.as_ref())?)
}

/// Parse a JSON array of transactions
///
/// A present but unparseable transaction date is an error, since the
/// transaction date anchors every proximity comparison.
pub fn parse_transactions(json: &str) -> Result<Vec<Transaction>, FixtureError> {
    let records: Vec<TransactionRecord> = serde_json::from_str(json)?;

    records
        .into_iter()
        .map(|record| {
            let date = match non_empty(record.date) {
                Some(raw) => Some(NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(
                    |_| FixtureError::InvalidDate {
                        id: record.id.clone(),
                        field: "date",
                        value: raw.clone(),
                    },
                )?),
                None => None,
            };

            Ok(Transaction {
                id: record.id,
                date,
                amount: record.amount,
                contact: non_empty(record.contact),
                reference: non_empty(record.reference),
            })
        })
        .collect()
}

/// Parse a JSON array of attachments
///
/// Unparseable attachment dates are dropped with a warning.
pub fn parse_attachments(json: &str) -> Result<Vec<Attachment>, FixtureError> {
    let records: Vec<AttachmentRecord> = serde_json::from_str(json)?;

    Ok(records
        .into_iter()
        .map(|record| {
            let data = record.data;
            Attachment {
                due_date: lenient_date(&record.id, "due_date", data.due_date),
                invoicing_date: lenient_date(&record.id, "invoicing_date", data.invoicing_date),
                receiving_date: lenient_date(&record.id, "receiving_date", data.receiving_date),
                id: record.id,
                kind: non_empty(record.kind),
                total_amount: data.total_amount,
                reference: non_empty(data.reference),
                supplier: non_empty(data.supplier),
                issuer: non_empty(data.issuer),
                recipient: non_empty(data.recipient),
            }
        })
        .collect())
}

pub fn parse_expected(json: &str) -> Result<Vec<ExpectedPair>, FixtureError> {
    Ok(serde_json::from_str(json)?)
}

fn read(path: &Path) -> Result<String, FixtureError> {
    tracing::debug!("Reading fixture file: {}", path.display());
    std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn lenient_date(id: &RecordId, field: &str, value: Option<String>) -> Option<NaiveDate> {
    let raw = non_empty(value)?;
    match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!("Attachment {} has unparseable {} {:?}: {}", id, field, raw, e);
            None
        }
    }
}
