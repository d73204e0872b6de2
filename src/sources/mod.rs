pub mod dataset;
pub mod http;
pub mod synthetic;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::Result;
use crate::model::{CandidateComment, ThreadEngagementStats};

pub use dataset::Dataset;
pub use http::HttpFeedSource;
pub use synthetic::generate_synthetic_dataset;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchWindows {
    pub candidate_limit: usize,
    pub initial_candidate_lookback_days: u32,
    pub comment_served_event_recency_hours: u32,
    pub thread_engagement_lookback_days: u32,
}

impl Default for FetchWindows {
    fn default() -> Self {
        Self {
            candidate_limit: 1000,
            initial_candidate_lookback_days: 10,
            comment_served_event_recency_hours: 48,
            thread_engagement_lookback_days: 30,
        }
    }
}

#[async_trait]
pub trait CandidateCommentSource: Send + Sync {
    async fn fetch_candidates(
        &self,
        user_id: &str,
        windows: &FetchWindows,
    ) -> Result<Vec<CandidateComment>>;
}

#[async_trait]
pub trait EngagementStatsSource: Send + Sync {
    async fn fetch_engagement_stats(
        &self,
        user_id: &str,
        windows: &FetchWindows,
    ) -> Result<Vec<ThreadEngagementStats>>;
}

#[async_trait]
pub trait SubscriptionSource: Send + Sync {
    async fn fetch_subscribed_author_ids(&self, user_id: &str) -> Result<HashSet<String>>;
}
