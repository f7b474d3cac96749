//! Expected-vs-found comparison of matching results

use crate::models::{
    Attachment, ExpectedPair, MatchMethod, MatchOutcome, MatchParty, RecordId, Transaction,
};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Found the expected counterpart
    Correct,
    /// No counterpart expected and none found
    CorrectNone,
    /// A counterpart was expected but none found
    Missing,
    /// Found a counterpart where none was expected
    Unexpected,
    /// Found a different counterpart than expected
    Wrong,
}

impl Status {
    fn classify(expected: Option<&RecordId>, found: Option<&RecordId>) -> Self {
        match (expected, found) {
            (Some(e), Some(f)) if e == f => Status::Correct,
            (Some(_), Some(_)) => Status::Wrong,
            (Some(_), None) => Status::Missing,
            (None, Some(_)) => Status::Unexpected,
            (None, None) => Status::CorrectNone,
        }
    }

    pub fn is_correct(self) -> bool {
        matches!(self, Status::Correct | Status::CorrectNone)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Correct => "OK",
            Status::CorrectNone => "OK (none)",
            Status::Missing => "MISSING",
            Status::Unexpected => "UNEXPECTED",
            Status::Wrong => "WRONG",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportLine {
    pub query: RecordId,
    pub expected: Option<RecordId>,
    pub found: Option<RecordId>,
    pub method: MatchMethod,
    pub status: Status,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub correct: usize,
    pub missing: usize,
    pub unexpected: usize,
    pub wrong: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub title: String,
    pub lines: Vec<ReportLine>,
}

impl Report {
    /// Compare transaction -> attachment results with the expected pairs
    pub fn for_transactions(
        transactions: &[Transaction],
        outcomes: &[MatchOutcome<'_, Attachment>],
        expected: &[ExpectedPair],
    ) -> Self {
        let lookup: HashMap<&RecordId, &RecordId> = expected
            .iter()
            .map(|p| (&p.transaction_id, &p.attachment_id))
            .collect();

        Self::compare("Transaction -> Attachment", transactions, outcomes, &lookup)
    }

    /// Compare attachment -> transaction results with the expected pairs
    pub fn for_attachments(
        attachments: &[Attachment],
        outcomes: &[MatchOutcome<'_, Transaction>],
        expected: &[ExpectedPair],
    ) -> Self {
        let lookup: HashMap<&RecordId, &RecordId> = expected
            .iter()
            .map(|p| (&p.attachment_id, &p.transaction_id))
            .collect();

        Self::compare("Attachment -> Transaction", attachments, outcomes, &lookup)
    }

    fn compare<Q: MatchParty, C: MatchParty>(
        title: &str,
        queries: &[Q],
        outcomes: &[MatchOutcome<'_, C>],
        expected: &HashMap<&RecordId, &RecordId>,
    ) -> Self {
        let lines = queries
            .iter()
            .zip(outcomes)
            .map(|(query, outcome)| {
                let expected = expected.get(query.record_id()).copied();
                let found = outcome.record().map(|c| c.record_id());

                ReportLine {
                    query: query.record_id().clone(),
                    expected: expected.cloned(),
                    found: found.cloned(),
                    method: outcome.method,
                    status: Status::classify(expected, found),
                }
            })
            .collect();

        Self {
            title: title.to_string(),
            lines,
        }
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            total: self.lines.len(),
            ..Summary::default()
        };

        for line in &self.lines {
            match line.status {
                Status::Correct | Status::CorrectNone => summary.correct += 1,
                Status::Missing => summary.missing += 1,
                Status::Unexpected => summary.unexpected += 1,
                Status::Wrong => summary.wrong += 1,
            }
        }

        summary
    }

    pub fn all_correct(&self) -> bool {
        self.lines.iter().all(|line| line.status.is_correct())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        writeln!(f, "{:<12} {:<12} {:<12} {:<16} status", "query", "expected", "found", "method")?;

        for line in &self.lines {
            writeln!(
                f,
                "{:<12} {:<12} {:<12} {:<16} {}",
                line.query.to_string(),
                display_id(line.expected.as_ref()),
                display_id(line.found.as_ref()),
                format!("{:?}", line.method),
                line.status
            )?;
        }

        let summary = self.summary();
        writeln!(
            f,
            "{}/{} correct ({} missing, {} unexpected, {} wrong)",
            summary.correct, summary.total, summary.missing, summary.unexpected, summary.wrong
        )
    }
}

fn display_id(id: Option<&RecordId>) -> String {
    id.map_or_else(|| "-".to_string(), RecordId::to_string)
}
