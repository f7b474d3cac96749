// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod normalize;
pub mod scoring;

pub use filters::{is_amount_match, is_reference_match, to_minor_units};
pub use matcher::Matcher;
pub use normalize::{normalize_reference, NameNormalizer};
pub use scoring::{date_bonus, date_distance_days, ScoreBreakdown, Scorer, ScoringFactor};
