use std::cmp::Ordering;

use crate::model::ScoredComment;
use crate::scoring::comment::non_negative_finite;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadScoreAggregation {
    Sum,
    Max,
    LogSum,
    Avg,
}

impl ThreadScoreAggregation {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "sum" => Some(ThreadScoreAggregation::Sum),
            "max" => Some(ThreadScoreAggregation::Max),
            "logsum" | "log_sum" => Some(ThreadScoreAggregation::LogSum),
            "avg" | "mean" => Some(ThreadScoreAggregation::Avg),
            _ => None,
        }
    }

    /// Unrecognised labels fall back to `Sum`.
    pub fn from_label(value: &str) -> Self {
        Self::parse(value).unwrap_or_else(|| {
            tracing::warn!(
                aggregation = value,
                "unknown thread score aggregation, falling back to sum"
            );
            ThreadScoreAggregation::Sum
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            ThreadScoreAggregation::Sum => "sum",
            ThreadScoreAggregation::Max => "max",
            ThreadScoreAggregation::LogSum => "logSum",
            ThreadScoreAggregation::Avg => "avg",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ThreadAggregator {
    aggregation: ThreadScoreAggregation,
    first_n: usize,
}

impl ThreadAggregator {
    pub fn new(aggregation: ThreadScoreAggregation, first_n: usize) -> Self {
        Self {
            aggregation,
            first_n,
        }
    }

    pub fn aggregate(&self, thread: &[ScoredComment]) -> f64 {
        if thread.is_empty() {
            return 0.0;
        }

        let mut scores: Vec<f64> = thread.iter().map(|comment| comment.score).collect();
        if self.first_n > 0 && scores.len() > self.first_n {
            scores.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
            scores.truncate(self.first_n);
        }

        let sum: f64 = scores.iter().sum();
        let score = match self.aggregation {
            ThreadScoreAggregation::Sum => sum,
            ThreadScoreAggregation::Max => scores.iter().copied().fold(f64::MIN, f64::max),
            ThreadScoreAggregation::LogSum => (sum + 1.0).ln(),
            ThreadScoreAggregation::Avg => sum / scores.len() as f64,
        };

        non_negative_finite(score)
    }
}
