// Model exports
pub mod domain;
pub mod fixtures;
pub mod responses;

pub use domain::{Attachment, MatchParty, RecordId, ScoringWeights, Transaction};
pub use fixtures::{ExpectedPair, FixtureError};
pub use responses::{MatchMethod, MatchOutcome, ScoredCandidate};
