use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::time::Duration;

use crate::config::FeedConfig;
use crate::error::{FeedError, Result};
use crate::model::{CandidateComment, ThreadEngagementStats};
use crate::sources::{
    CandidateCommentSource, EngagementStatsSource, FetchWindows, SubscriptionSource,
};

#[derive(Clone)]
pub struct HttpFeedSource {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpFeedSource {
    pub fn from_config(config: &FeedConfig) -> Result<Option<Self>> {
        let Some(endpoint) = config.data.endpoint.clone() else {
            return Ok(None);
        };
        let timeout = Duration::from_millis(config.data.timeout_ms);
        HttpFeedSource::new(endpoint, timeout).map(Some)
    }

    pub fn new(endpoint: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| {
                FeedError::Config(format!("failed to build feed data client: {}", err))
            })?;
        Ok(Self { endpoint, client })
    }

    fn user_url(&self, user_id: &str, resource: &str) -> String {
        format!(
            "{}/users/{}/{}",
            self.endpoint.trim_end_matches('/'),
            urlencoding::encode(user_id),
            resource
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        origin: &'static str,
        url: String,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|err| FeedError::fetch(origin, format!("request failed: {}", err)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::fetch(origin, format!("status {}: {}", status, body)));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| FeedError::fetch(origin, format!("response parse failed: {}", err)))
    }
}

#[async_trait]
impl CandidateCommentSource for HttpFeedSource {
    async fn fetch_candidates(
        &self,
        user_id: &str,
        windows: &FetchWindows,
    ) -> Result<Vec<CandidateComment>> {
        let query = [
            ("limit", windows.candidate_limit.to_string()),
            ("lookbackDays", windows.initial_candidate_lookback_days.to_string()),
            (
                "servedRecencyHours",
                windows.comment_served_event_recency_hours.to_string(),
            ),
        ];
        self.get_json(
            "candidates",
            self.user_url(user_id, "comment-candidates"),
            &query,
        )
        .await
    }
}

#[async_trait]
impl EngagementStatsSource for HttpFeedSource {
    async fn fetch_engagement_stats(
        &self,
        user_id: &str,
        windows: &FetchWindows,
    ) -> Result<Vec<ThreadEngagementStats>> {
        let query = [(
            "lookbackDays",
            windows.thread_engagement_lookback_days.to_string(),
        )];
        self.get_json(
            "engagement stats",
            self.user_url(user_id, "thread-engagement"),
            &query,
        )
        .await
    }
}

#[async_trait]
impl SubscriptionSource for HttpFeedSource {
    async fn fetch_subscribed_author_ids(&self, user_id: &str) -> Result<HashSet<String>> {
        let ids: Vec<String> = self
            .get_json("subscriptions", self.user_url(user_id, "subscriptions"), &[])
            .await?;
        Ok(ids.into_iter().collect())
    }
}
