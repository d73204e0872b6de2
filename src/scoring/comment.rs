use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::model::{CandidateComment, ScoredComment};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentScoringSettings {
    pub decay_factor: f64,
    pub decay_bias_hours: f64,
    pub seen_penalty: f64,
    pub quick_take_boost: f64,
    pub subscribed_author_multiplier: f64,
    pub thread_score_aggregation: String,
    pub thread_score_first_n: usize,
}

impl Default for CommentScoringSettings {
    fn default() -> Self {
        Self {
            decay_factor: 1.8,
            decay_bias_hours: 2.0,
            seen_penalty: 0.05,
            quick_take_boost: 1.5,
            subscribed_author_multiplier: 2.0,
            thread_score_aggregation: "logSum".to_string(),
            thread_score_first_n: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentScorer<'a> {
    settings: &'a CommentScoringSettings,
    subscribed_author_ids: &'a HashSet<String>,
    now: DateTime<Utc>,
}

impl<'a> CommentScorer<'a> {
    pub fn new(
        settings: &'a CommentScoringSettings,
        subscribed_author_ids: &'a HashSet<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            settings,
            subscribed_author_ids,
            now,
        }
    }

    pub fn score(&self, comment: &CandidateComment) -> f64 {
        let Some(posted_at) = comment.posted_at else {
            return 0.0;
        };

        let age_hours = age_in_hours(self.now, posted_at);
        let decayed = self.decayed_score(comment.base_score, age_hours);

        let mut boost = if comment.is_quick_take {
            self.settings.quick_take_boost
        } else {
            1.0
        };
        let subscribed = comment
            .author_id
            .as_ref()
            .is_some_and(|author_id| self.subscribed_author_ids.contains(author_id));
        if subscribed {
            boost *= self.settings.subscribed_author_multiplier;
        }

        let mut score = decayed * boost;
        if !comment.is_unviewed() {
            score *= self.settings.seen_penalty;
        }

        non_negative_finite(score)
    }

    pub fn score_all(&self, comments: Vec<CandidateComment>) -> Vec<ScoredComment> {
        comments
            .into_iter()
            .map(|comment| {
                let score = self.score(&comment);
                ScoredComment::new(comment, score)
            })
            .collect()
    }

    fn decayed_score(&self, base_score: i64, age_hours: f64) -> f64 {
        let denominator =
            (age_hours + self.settings.decay_bias_hours).powf(self.settings.decay_factor);
        if !denominator.is_finite() || denominator <= 0.0 {
            return 0.0;
        }
        (base_score as f64 + 1.0) / denominator
    }
}

pub(crate) fn age_in_hours(now: DateTime<Utc>, then: DateTime<Utc>) -> f64 {
    let millis = (now - then).num_milliseconds() as f64;
    (millis / 3_600_000.0).max(0.0)
}

pub(crate) fn non_negative_finite(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}
