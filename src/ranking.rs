use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::model::{
    CandidateComment, LinearThread, PreparedThread, PrioritizedThread, ScoredComment,
    ThreadEngagementStats,
};
use crate::scoring::{
    CommentScorer, CommentScoringSettings, EngagementMultiplier, ThreadAggregator,
    ThreadInterestModelSettings, ThreadScoreAggregation,
};
use crate::sources::{
    CandidateCommentSource, EngagementStatsSource, FetchWindows, SubscriptionSource,
};
use crate::threads::{filter_served, select_best, DisplayPreparer, ThreadBuilder};

#[derive(Debug, Clone)]
pub struct RankingSettings {
    pub comment_scoring: CommentScoringSettings,
    pub aggregation: ThreadScoreAggregation,
    pub thread_interest: ThreadInterestModelSettings,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self::new(
            CommentScoringSettings::default(),
            ThreadInterestModelSettings::default(),
        )
    }
}

impl RankingSettings {
    pub fn new(
        comment_scoring: CommentScoringSettings,
        thread_interest: ThreadInterestModelSettings,
    ) -> Self {
        let aggregation =
            ThreadScoreAggregation::from_label(&comment_scoring.thread_score_aggregation);
        Self {
            comment_scoring,
            aggregation,
            thread_interest,
        }
    }

    pub fn aggregator(&self) -> ThreadAggregator {
        ThreadAggregator::new(self.aggregation, self.comment_scoring.thread_score_first_n)
    }
}

pub struct ThreadSources<'a> {
    pub candidates: &'a dyn CandidateCommentSource,
    pub engagement: &'a dyn EngagementStatsSource,
    pub subscriptions: &'a dyn SubscriptionSource,
}

impl<'a> ThreadSources<'a> {
    pub fn uniform<S>(source: &'a S) -> Self
    where
        S: CandidateCommentSource + EngagementStatsSource + SubscriptionSource,
    {
        Self {
            candidates: source,
            engagement: source,
            subscriptions: source,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankRequest {
    pub user_id: Option<String>,
    pub limit: usize,
    pub served_thread_hashes: HashSet<String>,
    pub windows: FetchWindows,
    pub now: DateTime<Utc>,
}

impl RankRequest {
    pub fn new(user_id: Option<String>, limit: usize) -> Self {
        Self {
            user_id,
            limit,
            served_thread_hashes: HashSet::new(),
            windows: FetchWindows::default(),
            now: Utc::now(),
        }
    }
}

/// A missing viewer yields an empty page, not an error.
pub async fn get_ranked_threads(
    request: &RankRequest,
    settings: &RankingSettings,
    sources: &ThreadSources<'_>,
) -> Result<Vec<PreparedThread>> {
    let Some(user_id) = request.user_id.as_deref() else {
        return Ok(Vec::new());
    };

    let (candidates, engagement_stats, subscribed_author_ids) = tokio::try_join!(
        sources.candidates.fetch_candidates(user_id, &request.windows),
        sources
            .engagement
            .fetch_engagement_stats(user_id, &request.windows),
        sources.subscriptions.fetch_subscribed_author_ids(user_id),
    )?;

    tracing::debug!(
        user_id,
        candidates = candidates.len(),
        engagement_stats = engagement_stats.len(),
        subscriptions = subscribed_author_ids.len(),
        "fetched thread ranking inputs"
    );

    let pool = CandidatePool {
        candidates,
        engagement_stats,
        subscribed_author_ids,
    };
    Ok(rank_candidate_pool(pool, request, settings))
}

#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    pub candidates: Vec<CandidateComment>,
    pub engagement_stats: Vec<ThreadEngagementStats>,
    pub subscribed_author_ids: HashSet<String>,
}

pub fn rank_candidate_pool(
    pool: CandidatePool,
    request: &RankRequest,
    settings: &RankingSettings,
) -> Vec<PreparedThread> {
    let scorer = CommentScorer::new(
        &settings.comment_scoring,
        &pool.subscribed_author_ids,
        request.now,
    );
    let scored = scorer.score_all(pool.candidates);

    let stats_by_thread: HashMap<String, ThreadEngagementStats> = pool
        .engagement_stats
        .into_iter()
        .map(|stats| (stats.thread_top_level_id.clone(), stats))
        .collect();

    let all_scored_threads = build_and_score_threads(scored, &stats_by_thread, settings);
    let ranked = select_best(all_scored_threads);
    let unserved = filter_served(ranked, &request.served_thread_hashes);

    let preparer = DisplayPreparer::new(request.now);
    let prepared: Vec<PreparedThread> = unserved
        .into_iter()
        .filter(is_viable)
        .take(request.limit)
        .filter_map(|thread| preparer.prepare(thread))
        .collect();

    tracing::debug!(threads = prepared.len(), "prepared ranked comment threads");
    prepared
}

pub fn build_and_score_threads(
    scored: Vec<ScoredComment>,
    stats_by_thread: &HashMap<String, ThreadEngagementStats>,
    settings: &RankingSettings,
) -> Vec<PrioritizedThread> {
    let builder = ThreadBuilder::default();
    let aggregator = settings.aggregator();
    let engagement = EngagementMultiplier::new(&settings.thread_interest);

    let mut scored_threads = Vec::new();
    for (top_level_id, group) in group_by_discussion(scored) {
        let root_karma = group
            .iter()
            .find(|comment| comment.comment_id() == top_level_id)
            .map(|root| root.comment.base_score);
        if root_karma.is_some_and(|karma| karma < 0) {
            tracing::debug!(
                top_level_comment_id = %top_level_id,
                "skipping negative karma discussion"
            );
            continue;
        }

        let multiplier = engagement.multiplier(&top_level_id, stats_by_thread);
        for path in builder.build_paths(&group) {
            let thread = truncate_at_negative_karma(path);
            if thread.is_empty() {
                continue;
            }
            let base_score = aggregator.aggregate(&thread);
            scored_threads.push(PrioritizedThread {
                thread,
                top_level_comment_id: top_level_id.clone(),
                base_score,
                engagement_multiplier: multiplier,
                score: base_score * multiplier,
            });
        }
    }

    scored_threads
}

// Discussions come out in first-seen order.
fn group_by_discussion(scored: Vec<ScoredComment>) -> Vec<(String, Vec<ScoredComment>)> {
    let mut groups: Vec<(String, Vec<ScoredComment>)> = Vec::new();
    let mut slot_by_id: HashMap<String, usize> = HashMap::new();

    for mut comment in scored {
        let top_level_id = comment.comment.discussion_id().to_string();
        if comment.comment.top_level_comment_id.is_empty() {
            comment.comment.top_level_comment_id = top_level_id.clone();
        }
        match slot_by_id.get(&top_level_id) {
            Some(&slot) => groups[slot].1.push(comment),
            None => {
                slot_by_id.insert(top_level_id.clone(), groups.len());
                groups.push((top_level_id, vec![comment]));
            }
        }
    }

    groups
}

fn truncate_at_negative_karma(mut thread: LinearThread) -> LinearThread {
    if let Some(cut) = thread
        .iter()
        .position(|comment| comment.comment.base_score < 0)
    {
        thread.truncate(cut);
    }
    thread
}

fn is_viable(thread: &PrioritizedThread) -> bool {
    thread.score > 0.0
        && thread
            .thread
            .iter()
            .any(|comment| comment.comment.is_unviewed())
}
