use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ultrafeed_threads::{PreparedThread, RankRequest};

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiThreadsRequest {
    pub user_id: Option<String>,
    pub limit: Option<usize>,
    #[serde(default)]
    pub served_thread_hashes: Vec<String>,
}

impl ApiThreadsRequest {
    pub fn into_request(self) -> Result<RankRequest, String> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if limit > MAX_LIMIT {
            return Err(format!("limit must be at most {}", MAX_LIMIT));
        }
        let user_id = self
            .user_id
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let mut request = RankRequest::new(user_id, limit);
        request.served_thread_hashes = self.served_thread_hashes.into_iter().collect();
        Ok(request)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiThreadsResponse {
    pub threads: Vec<PreparedThread>,
    pub served_thread_hashes: Vec<String>,
}

impl ApiThreadsResponse {
    pub fn from_threads(threads: Vec<PreparedThread>, previously_served: &HashSet<String>) -> Self {
        let mut served_thread_hashes: Vec<String> = previously_served.iter().cloned().collect();
        served_thread_hashes.sort();
        for thread in &threads {
            if !previously_served.contains(&thread.thread_hash) {
                served_thread_hashes.push(thread.thread_hash.clone());
            }
        }
        Self {
            threads,
            served_thread_hashes,
        }
    }
}
