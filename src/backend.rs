use chrono::Utc;
use std::path::Path;

use ultrafeed_threads::sources::{generate_synthetic_dataset, Dataset, HttpFeedSource};
use ultrafeed_threads::{FeedConfig, ThreadSources};

pub enum FeedBackend {
    Dataset(Dataset),
    Remote(HttpFeedSource),
}

impl FeedBackend {
    pub async fn resolve(
        dataset: Option<&Path>,
        endpoint: Option<String>,
        synthetic: Option<(u64, usize)>,
        config: &FeedConfig,
    ) -> Result<Self, String> {
        if let Some(path) = dataset {
            let dataset = Dataset::load(path).await.map_err(|err| err.to_string())?;
            return Ok(FeedBackend::Dataset(dataset));
        }

        if let Some(endpoint) = endpoint {
            let mut config = config.clone();
            config.data.endpoint = Some(endpoint);
            return remote(&config);
        }
        if config.data.endpoint.is_some() && synthetic.is_none() {
            return remote(config);
        }

        let (seed, discussions) = synthetic.unwrap_or((7, 20));
        Ok(FeedBackend::Dataset(generate_synthetic_dataset(
            seed,
            discussions,
            Utc::now(),
        )))
    }

    pub fn sources(&self) -> ThreadSources<'_> {
        match self {
            FeedBackend::Dataset(dataset) => ThreadSources::uniform(dataset),
            FeedBackend::Remote(source) => ThreadSources::uniform(source),
        }
    }

    pub fn default_viewer(&self) -> Option<String> {
        match self {
            FeedBackend::Dataset(dataset) => dataset.viewer.clone(),
            FeedBackend::Remote(_) => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeedBackend::Dataset(_) => "dataset",
            FeedBackend::Remote(_) => "remote",
        }
    }
}

fn remote(config: &FeedConfig) -> Result<FeedBackend, String> {
    HttpFeedSource::from_config(config)
        .map_err(|err| err.to_string())?
        .map(FeedBackend::Remote)
        .ok_or_else(|| "no data endpoint configured".to_string())
}
