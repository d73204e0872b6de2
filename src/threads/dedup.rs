use std::collections::HashSet;

use crate::model::PrioritizedThread;
use crate::threads::hasher::hash_comments;

pub fn filter_served(
    ranked_threads: Vec<PrioritizedThread>,
    served_hashes: &HashSet<String>,
) -> Vec<PrioritizedThread> {
    if served_hashes.is_empty() {
        return ranked_threads;
    }

    let before = ranked_threads.len();
    let remaining: Vec<PrioritizedThread> = ranked_threads
        .into_iter()
        .filter(|thread| !served_hashes.contains(&hash_comments(&thread.thread)))
        .collect();

    tracing::debug!(
        dropped = before - remaining.len(),
        remaining = remaining.len(),
        "filtered already served threads"
    );
    remaining
}
