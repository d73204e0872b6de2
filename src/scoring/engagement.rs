use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::ThreadEngagementStats;

const LOG_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadInterestModelSettings {
    pub comment_coeff: f64,
    pub vote_coeff: f64,
    pub view_coeff: f64,
    pub on_read_post_factor: f64,
    pub log_impact_factor: f64,
    pub min_overall_multiplier: f64,
    pub max_overall_multiplier: f64,
    pub repetition_decay_hours: f64,
    pub repetition_penalty_strength: f64,
}

impl Default for ThreadInterestModelSettings {
    fn default() -> Self {
        Self {
            comment_coeff: 0.2,
            vote_coeff: 0.05,
            view_coeff: 0.03,
            on_read_post_factor: 1.5,
            log_impact_factor: 0.3,
            min_overall_multiplier: 0.5,
            max_overall_multiplier: 2.0,
            repetition_decay_hours: 12.0,
            repetition_penalty_strength: 0.3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngagementMultiplier<'a> {
    model: &'a ThreadInterestModelSettings,
}

impl<'a> EngagementMultiplier<'a> {
    pub fn new(model: &'a ThreadInterestModelSettings) -> Self {
        Self { model }
    }

    pub fn multiplier(
        &self,
        top_level_id: &str,
        stats: &HashMap<String, ThreadEngagementStats>,
    ) -> f64 {
        let product = stats
            .get(top_level_id)
            .map(|stats| self.product_of_effects(stats))
            .unwrap_or(1.0);

        let log_product = product.max(LOG_EPSILON).ln();
        let preliminary = 1.0 + log_product * self.model.log_impact_factor;
        let clamped = preliminary
            .max(self.model.min_overall_multiplier)
            .min(self.model.max_overall_multiplier);

        if !clamped.is_finite() || clamped <= 0.0 {
            1.0
        } else {
            clamped
        }
    }

    fn product_of_effects(&self, stats: &ThreadEngagementStats) -> f64 {
        let comment = (1.0 + stats.participation_count as f64 * self.model.comment_coeff).max(0.0);
        let vote = (1.0 + stats.voting_activity_score * self.model.vote_coeff).max(0.0);
        let view = (1.0 + stats.view_score * self.model.view_coeff).max(0.0);

        let mut product = comment * vote * view;
        if stats.is_on_read_post {
            product *= self.model.on_read_post_factor.max(0.0);
        }
        if stats.recent_serving_count > 0 && !stats.serving_hours_ago.is_empty() {
            product *= self.repetition_penalty(&stats.serving_hours_ago);
        }

        if product.is_nan() {
            1.0
        } else {
            product
        }
    }

    // Full strength for a serving right now, fading as 1 / (1 + hours / window).
    fn repetition_penalty(&self, serving_hours_ago: &[f64]) -> f64 {
        serving_hours_ago.iter().fold(1.0, |penalty, hours| {
            let hours = if hours.is_finite() { hours.max(0.0) } else { 0.0 };
            let decay = if self.model.repetition_decay_hours > 0.0 {
                1.0 / (1.0 + hours / self.model.repetition_decay_hours)
            } else {
                1.0
            };
            penalty * (1.0 - self.model.repetition_penalty_strength * decay).max(0.0)
        })
    }
}
