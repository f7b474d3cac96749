use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Opaque record identifier
///
/// Numeric ids order numerically, text ids lexicographically, and any
/// numeric id sorts before any text id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Numeric(u64),
    Text(String),
}

impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (RecordId::Numeric(a), RecordId::Numeric(b)) => a.cmp(b),
            (RecordId::Text(a), RecordId::Text(b)) => a.cmp(b),
            (RecordId::Numeric(_), RecordId::Text(_)) => Ordering::Less,
            (RecordId::Text(_), RecordId::Numeric(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Numeric(id) => write!(f, "{}", id),
            RecordId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        RecordId::Numeric(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Text(id.to_string())
    }
}

/// Bank or ledger record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: RecordId,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Signed amount, negative for outflows
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

impl Transaction {
    /// Contact name if present and not blank
    pub fn contact_name(&self) -> Option<&str> {
        non_blank(self.contact.as_deref())
    }
}

/// Invoice or receipt document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: RecordId,
    /// Document type label ("invoice", "receipt", ...)
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub invoicing_date: Option<NaiveDate>,
    #[serde(default)]
    pub receiving_date: Option<NaiveDate>,
}

impl Attachment {
    /// Non-blank counterparty fields in supplier, issuer, recipient order
    pub fn counterparty_names(&self) -> impl Iterator<Item = &str> {
        [&self.supplier, &self.issuer, &self.recipient]
            .into_iter()
            .filter_map(|name| non_blank(name.as_deref()))
    }

    /// All dates present on the document
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        [self.due_date, self.invoicing_date, self.receiving_date]
            .into_iter()
            .flatten()
    }
}

/// Common view over both record kinds, used by the symmetric pipeline
pub trait MatchParty {
    fn record_id(&self) -> &RecordId;
}

impl MatchParty for Transaction {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

impl MatchParty for Attachment {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

/// Weights of the composite score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub name: f64,
    pub date: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            name: 1.0,
            date: 1.0,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
