use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

use crate::model::{
    DisplayComment, DisplayStatus, PreparedThread, PrioritizedThread, ScoredComment,
};
use crate::threads::hasher::hash_comments;

const MAX_EXPANDED: usize = 2;
const HIGHLIGHT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy)]
pub struct DisplayPreparer {
    now: DateTime<Utc>,
}

impl DisplayPreparer {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn prepare(&self, ranked: PrioritizedThread) -> Option<PreparedThread> {
        let thread = ranked.thread;
        let root = thread.first()?;

        let primary_source = root.comment.sources.first().copied();
        let thread_hash = hash_comments(&thread);
        let expanded = expanded_ids(&thread);
        let highlight_cutoff = self.now - Duration::days(HIGHLIGHT_WINDOW_DAYS);

        let comments = thread
            .iter()
            .map(|scored| {
                let display_status = if expanded.contains(scored.comment_id()) {
                    DisplayStatus::Expanded
                } else {
                    DisplayStatus::Collapsed
                };
                let highlight = scored.comment.is_unviewed()
                    && scored
                        .comment
                        .posted_at
                        .is_some_and(|posted_at| posted_at > highlight_cutoff);
                DisplayComment {
                    scored: scored.clone(),
                    display_status,
                    highlight,
                }
            })
            .collect();

        Some(PreparedThread {
            comments,
            primary_source,
            score: ranked.score,
            thread_hash,
        })
    }
}

fn expanded_ids(thread: &[ScoredComment]) -> HashSet<&str> {
    let mut unviewed: Vec<&ScoredComment> = thread
        .iter()
        .filter(|scored| scored.comment.is_unviewed())
        .collect();
    unviewed.sort_by(|a, b| b.comment.base_score.cmp(&a.comment.base_score));

    let mut expanded = HashSet::new();
    let Some(&top) = unviewed.first() else {
        return expanded;
    };
    expanded.insert(top.comment_id());

    let root = &thread[0];
    if root.comment.is_unviewed() && root.comment_id() != top.comment_id() {
        if expanded.len() < MAX_EXPANDED {
            expanded.insert(root.comment_id());
        }
    } else if let Some(&second) = unviewed.get(1) {
        if expanded.len() < MAX_EXPANDED {
            expanded.insert(second.comment_id());
        }
    }

    expanded
}
