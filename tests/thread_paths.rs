use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashSet;
use ultrafeed_threads::threads::{
    filter_served, hash_comments, select_best, thread_hash, DisplayPreparer, ThreadBuilder,
    EMPTY_THREAD_HASH,
};
use ultrafeed_threads::{
    CandidateComment, DisplayStatus, FeedItemSource, PrioritizedThread, ScoredComment,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
}

fn node(id: &str, parent: Option<&str>, root: &str, score: f64) -> ScoredComment {
    let mut comment = CandidateComment::new(id, "post", parent.map(str::to_string), root);
    comment.posted_at = Some(now() - Duration::hours(1));
    ScoredComment::new(comment, score)
}

fn ids(thread: &[ScoredComment]) -> Vec<&str> {
    thread.iter().map(ScoredComment::comment_id).collect()
}

fn prioritized(root: &str, comment_ids: &[&str], score: f64) -> PrioritizedThread {
    let thread = comment_ids
        .iter()
        .enumerate()
        .map(|(idx, id)| {
            let parent = if idx == 0 { None } else { Some(comment_ids[idx - 1]) };
            node(id, parent, root, 1.0)
        })
        .collect();
    PrioritizedThread {
        thread,
        top_level_comment_id: root.to_string(),
        base_score: score,
        engagement_multiplier: 1.0,
        score,
    }
}

#[test]
fn builder_emits_every_root_to_leaf_path() {
    let group = vec![
        node("A", None, "A", 1.0),
        node("B", Some("A"), "A", 1.0),
        node("C", Some("A"), "A", 1.0),
        node("D", Some("C"), "A", 1.0),
        node("E", Some("C"), "A", 1.0),
    ];

    let paths = ThreadBuilder::default().build_paths(&group);
    let paths: Vec<Vec<&str>> = paths.iter().map(|path| ids(path)).collect();

    assert_eq!(
        paths,
        vec![vec!["A", "B"], vec!["A", "C", "D"], vec!["A", "C", "E"]]
    );
}

#[test]
fn builder_handles_candidates_in_any_order() {
    let group = vec![
        node("C", Some("A"), "A", 1.0),
        node("A", None, "A", 1.0),
        node("B", Some("A"), "A", 1.0),
    ];

    let paths = ThreadBuilder::default().build_paths(&group);
    assert_eq!(paths.len(), 2);
    assert!(paths.iter().all(|path| path[0].comment_id() == "A"));
}

#[test]
fn builder_returns_nothing_without_top_level_comment() {
    let group = vec![node("B", Some("A"), "A", 1.0), node("C", Some("B"), "A", 1.0)];
    assert!(ThreadBuilder::default().build_paths(&group).is_empty());
    assert!(ThreadBuilder::default().build_paths(&[]).is_empty());
}

#[test]
fn lone_root_is_a_single_path() {
    let group = vec![node("A", None, "A", 1.0)];
    let paths = ThreadBuilder::default().build_paths(&group);

    assert_eq!(paths.len(), 1);
    assert_eq!(ids(&paths[0]), vec!["A"]);
}

#[test]
fn builder_recomputes_direct_descendent_counts() {
    let group = vec![
        node("A", None, "A", 1.0),
        node("B", Some("A"), "A", 1.0),
        node("C", Some("A"), "A", 1.0),
    ];

    let paths = ThreadBuilder::default().build_paths(&group);
    assert_eq!(paths[0][0].comment.direct_descendent_count, 2);
    assert_eq!(paths[0][1].comment.direct_descendent_count, 0);
}

#[test]
fn deep_chains_are_truncated_at_depth_limit() {
    let mut group = vec![node("c0", None, "c0", 1.0)];
    for idx in 1..80 {
        let parent = format!("c{}", idx - 1);
        group.push(node(&format!("c{}", idx), Some(&parent), "c0", 1.0));
    }

    let paths = ThreadBuilder::new(50, 1000).build_paths(&group);
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].len(), 51);
    assert_eq!(paths[0].last().map(ScoredComment::comment_id), Some("c50"));
}

#[test]
fn wide_trees_stop_at_path_limit() {
    let mut group = vec![node("root", None, "root", 1.0)];
    for idx in 0..10 {
        group.push(node(&format!("r{}", idx), Some("root"), "root", 1.0));
    }

    let paths = ThreadBuilder::new(50, 3).build_paths(&group);
    assert_eq!(paths.len(), 3);
    assert_eq!(ids(&paths[2]), vec!["root", "r2"]);
}

#[test]
fn reply_cycles_do_not_loop_forever() {
    let group = vec![
        node("A", Some("F"), "A", 1.0),
        node("B", Some("C"), "A", 1.0),
        node("C", Some("B"), "A", 1.0),
        node("D", Some("A"), "A", 1.0),
        node("E", Some("D"), "A", 1.0),
        node("F", Some("E"), "A", 1.0),
        node("G", Some("G"), "A", 1.0),
    ];

    let paths = ThreadBuilder::default().build_paths(&group);
    assert_eq!(paths.len(), 1);
    assert_eq!(ids(&paths[0]), vec!["A", "D", "E", "F"]);
}

#[test]
fn hash_is_deterministic_and_order_sensitive() {
    let forward = thread_hash(&["a", "b", "c"]);
    let again = thread_hash(&["a".to_string(), "b".to_string(), "c".to_string()]);
    let reversed = thread_hash(&["c", "b", "a"]);

    assert_eq!(forward, again);
    assert_ne!(forward, reversed);
    assert_eq!(forward.len(), 64);
    assert!(forward.chars().all(|ch| ch.is_ascii_hexdigit()));
}

#[test]
fn hash_of_known_sequence_matches_sha256() {
    assert_eq!(
        thread_hash(&["abc"]),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    let empty: [&str; 0] = [];
    assert_eq!(thread_hash(&empty), EMPTY_THREAD_HASH);
}

#[test]
fn selector_keeps_best_path_per_discussion() {
    let threads = vec![
        prioritized("x", &["x", "x1"], 2.0),
        prioritized("y", &["y"], 3.0),
        prioritized("x", &["x", "x2"], 5.0),
        prioritized("y", &["y", "y1"], 1.0),
        prioritized("z", &["z"], 4.0),
    ];

    let best = select_best(threads);
    let summary: Vec<(&str, f64)> = best
        .iter()
        .map(|thread| (thread.top_level_comment_id.as_str(), thread.score))
        .collect();

    assert_eq!(summary, vec![("x", 5.0), ("z", 4.0), ("y", 3.0)]);
    assert_eq!(best[0].comment_ids(), vec!["x", "x2"]);
}

#[test]
fn selector_prefers_first_seen_on_ties() {
    let threads = vec![
        prioritized("x", &["x", "first"], 2.0),
        prioritized("x", &["x", "second"], 2.0),
    ];

    let best = select_best(threads);
    assert_eq!(best.len(), 1);
    assert_eq!(best[0].comment_ids(), vec!["x", "first"]);
}

#[test]
fn dedup_drops_served_threads_only() {
    let served_thread = prioritized("x", &["x", "x1"], 5.0);
    let served = HashSet::from([hash_comments(&served_thread.thread)]);
    let threads = vec![
        served_thread,
        prioritized("x", &["x1", "x"], 4.0),
        prioritized("y", &["y"], 3.0),
    ];

    let remaining = filter_served(threads, &served);
    assert_eq!(remaining.len(), 2);
    assert!(remaining
        .iter()
        .all(|thread| !served.contains(&hash_comments(&thread.thread))));
}

#[test]
fn display_caps_expansions_and_marks_fresh_comments() {
    let mut thread = prioritized("r", &["r", "a", "b", "c"], 3.0);
    thread.thread[0].comment.base_score = 1;
    thread.thread[0].comment.sources =
        vec![FeedItemSource::Quicktakes, FeedItemSource::Bookmarks];
    thread.thread[1].comment.base_score = 30;
    thread.thread[2].comment.base_score = 20;
    thread.thread[2].comment.posted_at = Some(now() - Duration::days(8));
    thread.thread[3].comment.base_score = 50;
    thread.thread[3].comment.last_viewed = Some(now());

    let prepared = DisplayPreparer::new(now())
        .prepare(thread)
        .expect("non-empty thread");

    let expanded: Vec<&str> = prepared
        .comments
        .iter()
        .filter(|comment| comment.is_expanded())
        .map(|comment| comment.comment_id())
        .collect();
    let highlighted: Vec<&str> = prepared
        .comments
        .iter()
        .filter(|comment| comment.highlight)
        .map(|comment| comment.comment_id())
        .collect();

    assert_eq!(expanded, vec!["r", "a"]);
    assert_eq!(highlighted, vec!["r", "a"]);
    assert_eq!(prepared.comments[3].display_status, DisplayStatus::Collapsed);
    assert_eq!(prepared.primary_source, Some(FeedItemSource::Quicktakes));
    assert_eq!(prepared.thread_hash, thread_hash(&["r", "a", "b", "c"]));
}

#[test]
fn display_without_sources_or_timestamps() {
    let mut thread = prioritized("r", &["r"], 1.0);
    thread.thread[0].comment.posted_at = None;

    let prepared = DisplayPreparer::new(now()).prepare(thread).expect("thread");
    assert_eq!(prepared.primary_source, None);
    assert!(!prepared.comments[0].highlight);
    assert!(prepared.comments[0].is_expanded());
}

#[test]
fn empty_thread_is_not_prepared() {
    let thread = PrioritizedThread {
        thread: Vec::new(),
        top_level_comment_id: "r".to_string(),
        base_score: 0.0,
        engagement_multiplier: 1.0,
        score: 0.0,
    };
    assert!(DisplayPreparer::new(now()).prepare(thread).is_none());
}
