pub mod aggregate;
pub mod comment;
pub mod engagement;

pub use aggregate::{ThreadAggregator, ThreadScoreAggregation};
pub use comment::{CommentScorer, CommentScoringSettings};
pub use engagement::{EngagementMultiplier, ThreadInterestModelSettings};
