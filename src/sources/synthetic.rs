use chrono::{DateTime, Duration, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashMap;

use crate::model::{CandidateComment, FeedItemSource, ThreadEngagementStats};
use crate::sources::Dataset;

pub const SYNTHETIC_VIEWER: &str = "viewer";

const MAX_COMMENTS_PER_DISCUSSION: usize = 12;
const AUTHOR_POOL: usize = 40;

/// The same seed and `now` always produce the same dataset.
pub fn generate_synthetic_dataset(seed: u64, discussions: usize, now: DateTime<Utc>) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut candidates = Vec::new();
    let mut engagement_stats = Vec::new();

    for discussion in 0..discussions {
        let post_id = format!("post_{}", discussion / 3);
        let root_id = format!("c{}_0", discussion);
        let comment_count = rng.gen_range(1..=MAX_COMMENTS_PER_DISCUSSION);
        let root_age_minutes = rng.gen_range(10..(7 * 24 * 60));

        let mut group = Vec::with_capacity(comment_count);
        for idx in 0..comment_count {
            let parent_comment_id = if idx == 0 {
                None
            } else {
                Some(group_id(discussion, rng.gen_range(0..idx)))
            };
            let age_minutes = if idx == 0 {
                root_age_minutes
            } else {
                rng.gen_range(0..=root_age_minutes)
            };
            group.push(sample_comment(
                &mut rng,
                group_id(discussion, idx),
                post_id.clone(),
                parent_comment_id,
                root_id.clone(),
                now - Duration::minutes(age_minutes),
            ));
        }
        candidates.extend(group);

        if rng.gen::<f64>() < 0.3 {
            engagement_stats.push(sample_stats(&mut rng, root_id));
        }
    }

    let subscribed = (0..AUTHOR_POOL)
        .filter(|_| rng.gen::<f64>() < 0.1)
        .map(|idx| format!("author_{}", idx))
        .collect();
    let mut subscriptions = HashMap::new();
    subscriptions.insert(SYNTHETIC_VIEWER.to_string(), subscribed);

    Dataset {
        candidates,
        engagement_stats,
        subscriptions,
        viewer: Some(SYNTHETIC_VIEWER.to_string()),
    }
}

fn group_id(discussion: usize, idx: usize) -> String {
    format!("c{}_{}", discussion, idx)
}

fn sample_comment(
    rng: &mut StdRng,
    comment_id: String,
    post_id: String,
    parent_comment_id: Option<String>,
    top_level_comment_id: String,
    posted_at: DateTime<Utc>,
) -> CandidateComment {
    let is_root = parent_comment_id.is_none();
    let mut comment =
        CandidateComment::new(comment_id, post_id, parent_comment_id, top_level_comment_id);

    comment.base_score = rng.gen_range(-3..60);
    comment.posted_at = if rng.gen::<f64>() < 0.02 {
        None
    } else {
        Some(posted_at)
    };
    comment.author_id = Some(format!("author_{}", rng.gen_range(0..AUTHOR_POOL)));
    comment.is_quick_take = is_root && rng.gen::<f64>() < 0.15;
    comment.sources = vec![if comment.is_quick_take {
        FeedItemSource::Quicktakes
    } else if rng.gen::<f64>() < 0.2 {
        FeedItemSource::SubscriptionsComments
    } else {
        FeedItemSource::RecentComments
    }];

    if rng.gen::<f64>() < 0.25 {
        comment.last_viewed = Some(posted_at + Duration::minutes(rng.gen_range(1..120)));
    }
    if rng.gen::<f64>() < 0.05 {
        comment.last_interacted = Some(posted_at + Duration::minutes(rng.gen_range(1..120)));
    }
    if rng.gen::<f64>() < 0.3 {
        comment.last_served = Some(posted_at + Duration::minutes(rng.gen_range(1..240)));
    }
    comment.descendent_count = rng.gen_range(0..20);

    comment
}

fn sample_stats(rng: &mut StdRng, thread_top_level_id: String) -> ThreadEngagementStats {
    let recent_serving_count = rng.gen_range(0..3);
    let serving_hours_ago = (0..recent_serving_count)
        .map(|_| rng.gen_range(0.0..72.0))
        .collect();

    ThreadEngagementStats {
        thread_top_level_id,
        participation_count: rng.gen_range(0..4),
        voting_activity_score: rng.gen_range(0.0..5.0),
        view_score: rng.gen_range(0.0..10.0),
        is_on_read_post: rng.gen::<f64>() < 0.5,
        recent_serving_count,
        serving_hours_ago,
    }
}
