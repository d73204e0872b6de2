use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::ranking::RankingSettings;
use crate::scoring::{
    CommentScoringSettings, ThreadInterestModelSettings, ThreadScoreAggregation,
};
use crate::sources::FetchWindows;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSourceConfig {
    pub endpoint: Option<String>,
    pub timeout_ms: u64,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub comment_scoring: CommentScoringSettings,
    pub thread_interest: ThreadInterestModelSettings,
    pub fetch: FetchWindows,
    pub data: DataSourceConfig,
}

impl FeedConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                toml::from_str(&contents)
                    .map_err(|err| format!("failed to parse config: {}", err))?
            } else {
                FeedConfig::default()
            }
        } else {
            FeedConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload).map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        let scoring = &self.comment_scoring;
        let interest = &self.thread_interest;
        let mut problems = Vec::new();

        if !(0.0..=1.0).contains(&scoring.seen_penalty) {
            problems.push(format!(
                "seen_penalty must be within [0, 1], got {}",
                scoring.seen_penalty
            ));
        }
        if scoring.decay_factor < 0.0 {
            problems.push(format!("decay_factor must be >= 0, got {}", scoring.decay_factor));
        }
        if scoring.decay_bias_hours <= 0.0 {
            problems.push(format!(
                "decay_bias_hours must be > 0, got {}",
                scoring.decay_bias_hours
            ));
        }
        if scoring.quick_take_boost < 0.0 || scoring.subscribed_author_multiplier < 0.0 {
            problems.push("boost multipliers must be >= 0".to_string());
        }
        if ThreadScoreAggregation::parse(&scoring.thread_score_aggregation).is_none() {
            problems.push(format!(
                "unknown thread_score_aggregation: {}",
                scoring.thread_score_aggregation
            ));
        }
        if interest.min_overall_multiplier <= 0.0
            || interest.min_overall_multiplier > interest.max_overall_multiplier
        {
            problems.push(format!(
                "overall multiplier range invalid: [{}, {}]",
                interest.min_overall_multiplier, interest.max_overall_multiplier
            ));
        }
        if !(0.0..=1.0).contains(&interest.repetition_penalty_strength) {
            problems.push(format!(
                "repetition_penalty_strength must be within [0, 1], got {}",
                interest.repetition_penalty_strength
            ));
        }

        if self.data.timeout_ms == 0 {
            problems.push("data.timeout_ms must be > 0".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join("; "))
        }
    }

    pub fn ranking_settings(&self) -> RankingSettings {
        RankingSettings::new(self.comment_scoring.clone(), self.thread_interest.clone())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(mode) = env::var("ULTRAFEED_THREAD_AGGREGATION") {
            if !mode.trim().is_empty() {
                self.comment_scoring.thread_score_aggregation = mode;
            }
        }
        if let Ok(first_n) = env::var("ULTRAFEED_THREAD_FIRST_N") {
            if let Ok(value) = first_n.parse::<usize>() {
                self.comment_scoring.thread_score_first_n = value;
            }
        }
        if let Ok(penalty) = env::var("ULTRAFEED_SEEN_PENALTY") {
            if let Ok(value) = penalty.parse::<f64>() {
                self.comment_scoring.seen_penalty = value;
            }
        }
        if let Ok(endpoint) = env::var("ULTRAFEED_DATA_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                self.data.endpoint = Some(endpoint);
            }
        }
        if let Ok(timeout) = env::var("ULTRAFEED_DATA_TIMEOUT_MS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.data.timeout_ms = value;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("ULTRAFEED_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/ultrafeed.toml")))
}
