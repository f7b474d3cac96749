//! Recon Match - deterministic transaction/attachment matching
//!
//! This library links bank or ledger transactions to their supporting
//! invoices and receipts. Each query record gets at most one confident
//! counterpart, chosen by a reference short-circuit, an exact amount filter,
//! name and date scoring, and a deterministic tie-break.

pub mod config;
pub mod core;
pub mod models;
pub mod report;

// Re-export commonly used types
pub use crate::core::{Matcher, ScoringFactor, normalize::normalize_reference};
pub use models::{Attachment, Transaction, RecordId, MatchOutcome, MatchMethod, ScoredCandidate, ScoringWeights};
