use serde::Serialize;

/// How a match was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Normalized references were equal
    Reference,
    /// Amount matched and counterparty name cleared the threshold
    NameSimilarity,
    /// Amount matched with a unique exact date and no names to compare
    ExactDate,
    None,
}

/// A candidate that survived filtering, with its scores
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate<'a, T> {
    pub record: &'a T,
    pub name_similarity: f64,
    pub date_bonus: f64,
    pub composite_score: f64,
    /// Nearest date distance in days, `None` when no date is usable
    pub date_distance_days: Option<u32>,
}

/// Result of a single match attempt
#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome<'a, T> {
    pub matched: Option<ScoredCandidate<'a, T>>,
    pub method: MatchMethod,
    pub total_candidates: usize,
    pub amount_matches: usize,
}

impl<'a, T> MatchOutcome<'a, T> {
    pub(crate) fn none(total_candidates: usize, amount_matches: usize) -> Self {
        Self {
            matched: None,
            method: MatchMethod::None,
            total_candidates,
            amount_matches,
        }
    }

    /// The matched record, if any
    pub fn record(&self) -> Option<&'a T> {
        self.matched.as_ref().map(|c| c.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordId;

    #[test]
    fn test_outcome_serializes_snake_case() {
        let id = RecordId::from(7);
        let outcome = MatchOutcome {
            matched: Some(ScoredCandidate {
                record: &id,
                name_similarity: 1.0,
                date_bonus: 0.5,
                composite_score: 1.5,
                date_distance_days: Some(15),
            }),
            method: MatchMethod::NameSimilarity,
            total_candidates: 3,
            amount_matches: 2,
        };

        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["method"], "name_similarity");
        assert_eq!(json["total_candidates"], 3);
        assert_eq!(json["amount_matches"], 2);
        assert_eq!(json["matched"]["record"], 7);
        assert_eq!(json["matched"]["composite_score"], 1.5);
        assert_eq!(json["matched"]["date_distance_days"], 15);
        assert!(json.get("totalCandidates").is_none());
    }
}
