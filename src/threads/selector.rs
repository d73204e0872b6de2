use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::PrioritizedThread;

/// Keeps the best path per discussion, ranked by score. On exact ties the
/// path seen first wins, and discussions keep first-seen order.
pub fn select_best(all_scored_threads: Vec<PrioritizedThread>) -> Vec<PrioritizedThread> {
    let mut winners: Vec<PrioritizedThread> = Vec::new();
    let mut slot_by_group: HashMap<String, usize> = HashMap::new();

    for candidate in all_scored_threads {
        match slot_by_group.get(&candidate.top_level_comment_id) {
            Some(&slot) => {
                if candidate.score > winners[slot].score {
                    winners[slot] = candidate;
                }
            }
            None => {
                slot_by_group.insert(candidate.top_level_comment_id.clone(), winners.len());
                winners.push(candidate);
            }
        }
    }

    winners.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    winners
}
