use crate::config::MatchingSettings;
use crate::core::{
    filters::{is_amount_match, is_reference_match},
    normalize::NameNormalizer,
    scoring::{ScoreBreakdown, Scorer, ScoringFactor},
};
use crate::models::{
    Attachment, MatchMethod, MatchOutcome, MatchParty, ScoredCandidate, ScoringWeights,
    Transaction,
};
use std::cmp::Ordering;
use std::sync::Arc;

/// One direction of the symmetric pipeline: a fixed query record matched
/// against candidates of the other kind
trait Direction<C> {
    fn reference_match(&self, candidate: &C) -> bool;
    fn amount_match(&self, candidate: &C) -> bool;
    fn score(&self, candidate: &C) -> ScoreBreakdown;
    fn query_has_name(&self) -> bool;
    fn candidate_has_name(&self, candidate: &C) -> bool;
}

struct AttachmentSearch<'q> {
    matcher: &'q Matcher,
    transaction: &'q Transaction,
}

impl Direction<Attachment> for AttachmentSearch<'_> {
    fn reference_match(&self, candidate: &Attachment) -> bool {
        is_reference_match(self.transaction, candidate)
    }

    fn amount_match(&self, candidate: &Attachment) -> bool {
        is_amount_match(self.transaction, candidate, self.matcher.amount_precision)
    }

    fn score(&self, candidate: &Attachment) -> ScoreBreakdown {
        self.matcher.scorer.score(self.transaction, candidate)
    }

    fn query_has_name(&self) -> bool {
        self.transaction.contact_name().is_some()
    }

    fn candidate_has_name(&self, candidate: &Attachment) -> bool {
        self.matcher.scorer.has_counterparty(candidate)
    }
}

struct TransactionSearch<'q> {
    matcher: &'q Matcher,
    attachment: &'q Attachment,
}

impl Direction<Transaction> for TransactionSearch<'_> {
    fn reference_match(&self, candidate: &Transaction) -> bool {
        is_reference_match(candidate, self.attachment)
    }

    fn amount_match(&self, candidate: &Transaction) -> bool {
        is_amount_match(candidate, self.attachment, self.matcher.amount_precision)
    }

    fn score(&self, candidate: &Transaction) -> ScoreBreakdown {
        self.matcher.scorer.score(candidate, self.attachment)
    }

    fn query_has_name(&self) -> bool {
        self.matcher.scorer.has_counterparty(self.attachment)
    }

    fn candidate_has_name(&self, candidate: &Transaction) -> bool {
        candidate.contact_name().is_some()
    }
}

/// Main matching orchestrator - selects at most one counterpart per query record
///
/// # Pipeline Stages
/// 1. Reference short-circuit (normalized references equal)
/// 2. Amount hard filter
/// 3. Scoring (name similarity + date proximity + registered factors)
/// 4. Acceptance: name threshold when both sides carry names,
///    otherwise a unique exact-date candidate
/// 5. Deterministic selection: score desc, date distance asc, id asc
///
/// The matcher holds no per-call state and can be shared across threads.
#[derive(Debug, Clone)]
pub struct Matcher {
    scorer: Scorer,
    amount_precision: u32,
    name_threshold: f64,
}

impl Matcher {
    pub fn new(settings: &MatchingSettings, weights: ScoringWeights) -> Self {
        let names = NameNormalizer::new(&settings.suffix_list, &settings.own_company_names);

        Self {
            scorer: Scorer::new(names, weights, settings.date_decay_window_days),
            amount_precision: settings.amount_precision,
            name_threshold: settings.name_similarity_threshold,
        }
    }

    pub fn with_default_settings() -> Self {
        Self::new(&MatchingSettings::default(), ScoringWeights::default())
    }

    /// Add a soft scoring factor to the composite score
    pub fn register_factor(&mut self, factor: Arc<dyn ScoringFactor>, weight: f64) {
        self.scorer.register_factor(factor, weight);
    }

    /// Best attachment for a transaction, or `None` when no confident match exists
    pub fn find_attachment<'a>(
        &self,
        transaction: &Transaction,
        attachments: &'a [Attachment],
    ) -> Option<&'a Attachment> {
        self.match_attachment(transaction, attachments).record()
    }

    /// Best transaction for an attachment, or `None` when no confident match exists
    pub fn find_transaction<'a>(
        &self,
        attachment: &Attachment,
        transactions: &'a [Transaction],
    ) -> Option<&'a Transaction> {
        self.match_transaction(attachment, transactions).record()
    }

    /// Like [`Matcher::find_attachment`], with scores and the deciding method
    pub fn match_attachment<'a>(
        &self,
        transaction: &Transaction,
        attachments: &'a [Attachment],
    ) -> MatchOutcome<'a, Attachment> {
        tracing::debug!("Matching transaction {} against {} attachments", transaction.id, attachments.len());
        let search = AttachmentSearch { matcher: self, transaction };
        self.run(&search, attachments)
    }

    /// Like [`Matcher::find_transaction`], with scores and the deciding method
    pub fn match_transaction<'a>(
        &self,
        attachment: &Attachment,
        transactions: &'a [Transaction],
    ) -> MatchOutcome<'a, Transaction> {
        tracing::debug!("Matching attachment {} against {} transactions", attachment.id, transactions.len());
        let search = TransactionSearch { matcher: self, attachment };
        self.run(&search, transactions)
    }

    /// Match every transaction independently against the attachment pool
    pub fn match_transactions<'a>(
        &self,
        transactions: &[Transaction],
        attachments: &'a [Attachment],
    ) -> Vec<MatchOutcome<'a, Attachment>> {
        transactions
            .iter()
            .map(|tx| self.match_attachment(tx, attachments))
            .collect()
    }

    /// Match every attachment independently against the transaction pool
    pub fn match_attachments<'a>(
        &self,
        attachments: &[Attachment],
        transactions: &'a [Transaction],
    ) -> Vec<MatchOutcome<'a, Transaction>> {
        attachments
            .iter()
            .map(|att| self.match_transaction(att, transactions))
            .collect()
    }

    fn run<'a, C, D>(&self, search: &D, candidates: &'a [C]) -> MatchOutcome<'a, C>
    where
        C: MatchParty,
        D: Direction<C>,
    {
        let total_candidates = candidates.len();

        // Stage 1: reference short-circuit, bypasses every later stage
        let reference_hits: Vec<ScoredCandidate<'a, C>> = candidates
            .iter()
            .filter(|c| search.reference_match(c))
            .map(|c| scored(c, search.score(c)))
            .collect();

        if !reference_hits.is_empty() {
            tracing::debug!("Reference short-circuit: {} exact reference matches", reference_hits.len());
            let matched = reference_hits.into_iter().min_by(|a, b| by_distance_then_id(a, b));
            return MatchOutcome {
                matched,
                method: MatchMethod::Reference,
                total_candidates,
                amount_matches: 0,
            };
        }

        // Stage 2 & 3: amount hard filter, then score the survivors
        let survivors: Vec<ScoredCandidate<'a, C>> = candidates
            .iter()
            .filter(|c| search.amount_match(c))
            .map(|c| scored(c, search.score(c)))
            .collect();
        let amount_matches = survivors.len();

        if survivors.is_empty() {
            tracing::debug!("No candidate passed the amount filter");
            return MatchOutcome::none(total_candidates, amount_matches);
        }

        // Stage 4: acceptance
        let identity_branch = search.query_has_name()
            && survivors.iter().any(|c| search.candidate_has_name(c.record));

        let (accepted, method): (Vec<_>, _) = if identity_branch {
            let accepted = survivors
                .into_iter()
                .filter(|c| c.name_similarity >= self.name_threshold)
                .collect();
            (accepted, MatchMethod::NameSimilarity)
        } else {
            let exact: Vec<_> = survivors
                .into_iter()
                .filter(|c| c.date_distance_days == Some(0))
                .collect();
            if exact.len() > 1 {
                tracing::debug!("Rejecting {} ambiguous exact-date candidates", exact.len());
                return MatchOutcome::none(total_candidates, amount_matches);
            }
            (exact, MatchMethod::ExactDate)
        };

        tracing::debug!(
            "{} of {} amount matches accepted ({})",
            accepted.len(),
            amount_matches,
            if identity_branch { "name branch" } else { "date branch" }
        );

        // Stage 5: deterministic selection
        match accepted.into_iter().min_by(|a, b| by_rank(a, b)) {
            Some(best) => MatchOutcome {
                matched: Some(best),
                method,
                total_candidates,
                amount_matches,
            },
            None => MatchOutcome::none(total_candidates, amount_matches),
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_settings()
    }
}

fn scored<C>(record: &C, score: ScoreBreakdown) -> ScoredCandidate<'_, C> {
    ScoredCandidate {
        record,
        name_similarity: score.name_similarity,
        date_bonus: score.date_bonus,
        composite_score: score.composite,
        date_distance_days: score.date_distance_days,
    }
}

/// Ordering where the preferred candidate is the minimum
fn by_rank<C: MatchParty>(a: &ScoredCandidate<'_, C>, b: &ScoredCandidate<'_, C>) -> Ordering {
    b.composite_score
        .total_cmp(&a.composite_score)
        .then_with(|| by_distance_then_id(a, b))
}

/// Nearest date first, missing dates last, then smallest id
fn by_distance_then_id<C: MatchParty>(a: &ScoredCandidate<'_, C>, b: &ScoredCandidate<'_, C>) -> Ordering {
    distance_key(a.date_distance_days)
        .cmp(&distance_key(b.date_distance_days))
        .then_with(|| a.record.record_id().cmp(b.record.record_id()))
}

fn distance_key(distance: Option<u32>) -> (bool, u32) {
    (distance.is_none(), distance.unwrap_or(0))
}
