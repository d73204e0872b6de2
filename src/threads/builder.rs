use std::collections::{HashMap, HashSet};

use crate::model::{LinearThread, ScoredComment};

pub const MAX_THREAD_DEPTH: usize = 50;
pub const MAX_PATHS_PER_GROUP: usize = 1000;

struct Frame {
    node: usize,
    next_child: usize,
    extended: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ThreadBuilder {
    max_depth: usize,
    max_paths: usize,
}

impl Default for ThreadBuilder {
    fn default() -> Self {
        Self::new(MAX_THREAD_DEPTH, MAX_PATHS_PER_GROUP)
    }
}

impl ThreadBuilder {
    pub fn new(max_depth: usize, max_paths: usize) -> Self {
        Self {
            max_depth,
            max_paths,
        }
    }

    /// `group` holds the candidates of a single discussion. Returns nothing
    /// when the discussion's top-level comment is not among them.
    pub fn build_paths(&self, group: &[ScoredComment]) -> Vec<LinearThread> {
        let Some(first) = group.first() else {
            return Vec::new();
        };
        let top_level_id = first.comment.discussion_id();

        let mut seen_ids = HashSet::new();
        let nodes: Vec<&ScoredComment> = group
            .iter()
            .filter(|comment| seen_ids.insert(comment.comment_id()))
            .collect();
        let index_by_id: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(idx, comment)| (comment.comment_id(), idx))
            .collect();

        // `None` keys the roots.
        let mut children: HashMap<Option<&str>, Vec<usize>> = HashMap::new();
        for (idx, comment) in nodes.iter().enumerate() {
            children
                .entry(comment.comment.parent_comment_id.as_deref())
                .or_default()
                .push(idx);
        }

        let Some(&root) = index_by_id.get(top_level_id) else {
            tracing::warn!(
                top_level_comment_id = top_level_id,
                candidates = nodes.len(),
                "top-level comment missing from candidates, dropping discussion"
            );
            return Vec::new();
        };

        let child_lists: Vec<&[usize]> = nodes
            .iter()
            .map(|comment| {
                children
                    .get(&Some(comment.comment_id()))
                    .map_or(&[][..], Vec::as_slice)
            })
            .collect();

        let mut paths = Vec::new();
        let mut stack = vec![Frame {
            node: root,
            next_child: 0,
            extended: false,
        }];
        let mut on_path = HashSet::from([root]);

        loop {
            let depth = stack.len();
            let Some(frame) = stack.last_mut() else {
                break;
            };
            let node = frame.node;
            let kids = if depth > self.max_depth {
                tracing::warn!(
                    comment_id = nodes[node].comment_id(),
                    max_depth = self.max_depth,
                    "thread depth limit reached, truncating path"
                );
                &[][..]
            } else {
                child_lists[node]
            };

            if let Some(&child) = kids.get(frame.next_child) {
                frame.next_child += 1;
                if on_path.contains(&child) {
                    tracing::warn!(
                        comment_id = nodes[child].comment_id(),
                        "reply cycle detected, skipping branch"
                    );
                    continue;
                }
                frame.extended = true;
                on_path.insert(child);
                stack.push(Frame {
                    node: child,
                    next_child: 0,
                    extended: false,
                });
                continue;
            }

            // A node none of whose children could be followed ends a path.
            if !frame.extended {
                paths.push(materialize(&stack, &nodes, &child_lists));
                if paths.len() >= self.max_paths {
                    tracing::warn!(
                        top_level_comment_id = top_level_id,
                        max_paths = self.max_paths,
                        "path limit reached, remaining branches skipped"
                    );
                    break;
                }
            }
            on_path.remove(&node);
            stack.pop();
        }

        paths
    }
}

fn materialize(
    stack: &[Frame],
    nodes: &[&ScoredComment],
    child_lists: &[&[usize]],
) -> LinearThread {
    stack
        .iter()
        .map(|frame| {
            let mut comment = nodes[frame.node].clone();
            comment.comment.direct_descendent_count = child_lists[frame.node].len() as u32;
            comment
        })
        .collect()
}
