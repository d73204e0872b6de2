use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{FeedError, Result};
use crate::model::{CandidateComment, ThreadEngagementStats};
use crate::sources::{
    CandidateCommentSource, EngagementStatsSource, FetchWindows, SubscriptionSource,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub candidates: Vec<CandidateComment>,
    #[serde(default)]
    pub engagement_stats: Vec<ThreadEngagementStats>,
    #[serde(default)]
    pub subscriptions: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub viewer: Option<String>,
}

impl Dataset {
    pub async fn load(path: &Path) -> Result<Self> {
        let data = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| FeedError::Dataset(format!("failed to read dataset: {}", err)))?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(data)
            .map_err(|err| FeedError::Dataset(format!("failed to parse dataset: {}", err)))
    }
}

#[async_trait]
impl CandidateCommentSource for Dataset {
    async fn fetch_candidates(
        &self,
        _user_id: &str,
        windows: &FetchWindows,
    ) -> Result<Vec<CandidateComment>> {
        Ok(self
            .candidates
            .iter()
            .take(windows.candidate_limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EngagementStatsSource for Dataset {
    async fn fetch_engagement_stats(
        &self,
        _user_id: &str,
        _windows: &FetchWindows,
    ) -> Result<Vec<ThreadEngagementStats>> {
        Ok(self.engagement_stats.clone())
    }
}

#[async_trait]
impl SubscriptionSource for Dataset {
    async fn fetch_subscribed_author_ids(&self, user_id: &str) -> Result<HashSet<String>> {
        Ok(self
            .subscriptions
            .get(user_id)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default())
    }
}
