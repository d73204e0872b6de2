pub mod config;
pub mod error;
pub mod model;
pub mod ranking;
pub mod scoring;
pub mod sources;
pub mod threads;

pub use config::FeedConfig;
pub use error::FeedError;
pub use model::{
    CandidateComment, DisplayComment, DisplayStatus, FeedItemSource, LinearThread,
    PreparedThread, PrioritizedThread, ScoredComment, ThreadEngagementStats,
};
pub use ranking::{
    get_ranked_threads, rank_candidate_pool, CandidatePool, RankRequest, RankingSettings,
    ThreadSources,
};
pub use threads::thread_hash;

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}

pub fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}
