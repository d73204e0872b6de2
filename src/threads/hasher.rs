use sha2::{Digest, Sha256};

use crate::model::ScoredComment;

pub const EMPTY_THREAD_HASH: &str = "empty_thread_hash";

/// Fingerprint of an ordered comment-id sequence. Order matters: `[a, b]` and
/// `[b, a]` hash differently.
pub fn thread_hash<S: AsRef<str>>(comment_ids: &[S]) -> String {
    if comment_ids.is_empty() {
        return EMPTY_THREAD_HASH.to_string();
    }

    let joined = comment_ids
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|byte| format!("{:02x}", byte)).collect()
}

pub fn hash_comments(thread: &[ScoredComment]) -> String {
    let ids: Vec<&str> = thread.iter().map(ScoredComment::comment_id).collect();
    thread_hash(&ids)
}
