use crate::core::normalize::{jaccard, NameNormalizer};
use crate::models::{Attachment, ScoringWeights, Transaction};
use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;

/// Additional soft scoring factor
///
/// A factor returns a contribution in `[0, 1]` for a transaction/attachment
/// pair. Factors only rank candidates; they never disqualify one and never
/// affect the name-similarity acceptance threshold.
pub trait ScoringFactor: Send + Sync {
    fn name(&self) -> &str;
    fn score(&self, transaction: &Transaction, attachment: &Attachment) -> f64;
}

/// A registered factor and its weight in the composite score
#[derive(Clone)]
pub struct WeightedFactor {
    pub factor: Arc<dyn ScoringFactor>,
    pub weight: f64,
}

impl fmt::Debug for WeightedFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightedFactor")
            .field("factor", &self.factor.name())
            .field("weight", &self.weight)
            .finish()
    }
}

/// Per-pair scores
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub name_similarity: f64,
    pub date_bonus: f64,
    pub date_distance_days: Option<u32>,
    pub composite: f64,
}

/// Computes the composite score of a transaction/attachment pair
///
/// Scoring formula:
/// composite = (
///     name_similarity * weights.name +   # best Jaccard over counterparty fields
///     date_bonus * weights.date +        # linear decay over the window
///     sum(factor.score * factor.weight)  # registered extensions
/// )
#[derive(Debug, Clone)]
pub struct Scorer {
    names: NameNormalizer,
    weights: ScoringWeights,
    decay_window_days: u32,
    factors: Vec<WeightedFactor>,
}

impl Scorer {
    pub fn new(names: NameNormalizer, weights: ScoringWeights, decay_window_days: u32) -> Self {
        Self {
            names,
            weights,
            decay_window_days: decay_window_days.max(1),
            factors: Vec::new(),
        }
    }

    /// Register an additional soft factor
    pub fn register_factor(&mut self, factor: Arc<dyn ScoringFactor>, weight: f64) {
        self.factors.push(WeightedFactor { factor, weight });
    }

    pub fn score(&self, transaction: &Transaction, attachment: &Attachment) -> ScoreBreakdown {
        let name_similarity = self.best_name_similarity(transaction.contact_name(), attachment);
        let date_distance_days = date_distance_days(transaction.date, attachment);
        let date_bonus = date_bonus(date_distance_days, self.decay_window_days);

        let extra: f64 = self
            .factors
            .iter()
            .map(|wf| wf.factor.score(transaction, attachment).clamp(0.0, 1.0) * wf.weight)
            .sum();

        let composite =
            name_similarity * self.weights.name + date_bonus * self.weights.date + extra;

        tracing::trace!(
            "Scored tx {} vs attachment {}: name={:.3} date_bonus={:.3} distance={:?} composite={:.3}",
            transaction.id,
            attachment.id,
            name_similarity,
            date_bonus,
            date_distance_days,
            composite
        );

        ScoreBreakdown {
            name_similarity,
            date_bonus,
            date_distance_days,
            composite,
        }
    }

    /// Counterparty names on the attachment, excluding the company itself
    pub fn counterparties<'a>(&'a self, attachment: &'a Attachment) -> impl Iterator<Item = &'a str> {
        attachment
            .counterparty_names()
            .filter(move |name| !self.names.is_own_company(name))
    }

    pub fn has_counterparty(&self, attachment: &Attachment) -> bool {
        self.counterparties(attachment).next().is_some()
    }

    /// Maximum similarity of the contact against every counterparty field
    pub fn best_name_similarity(&self, contact: Option<&str>, attachment: &Attachment) -> f64 {
        let Some(contact) = contact else {
            return 0.0;
        };

        let contact_tokens = self.names.tokenize(contact);
        self.counterparties(attachment)
            .map(|name| jaccard(&contact_tokens, &self.names.tokenize(name)))
            .fold(0.0, f64::max)
    }
}

/// Nearest absolute day distance between the transaction date and any attachment date
///
/// `None` when either side has no usable date.
#[inline]
pub fn date_distance_days(transaction_date: Option<NaiveDate>, attachment: &Attachment) -> Option<u32> {
    let tx_date = transaction_date?;
    attachment
        .dates()
        .map(|d| (d - tx_date).num_days().unsigned_abs().min(u32::MAX as u64) as u32)
        .min()
}

/// Date proximity bonus, decaying linearly from 1 at distance 0 to 0 at the window
#[inline]
pub fn date_bonus(distance_days: Option<u32>, window_days: u32) -> f64 {
    match distance_days {
        Some(d) => (1.0 - d as f64 / window_days.max(1) as f64).max(0.0),
        None => 0.0,
    }
}
