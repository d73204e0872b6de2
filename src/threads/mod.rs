pub mod builder;
pub mod dedup;
pub mod display;
pub mod hasher;
pub mod selector;

pub use builder::{ThreadBuilder, MAX_PATHS_PER_GROUP, MAX_THREAD_DEPTH};
pub use dedup::filter_served;
pub use display::DisplayPreparer;
pub use hasher::{hash_comments, thread_hash, EMPTY_THREAD_HASH};
pub use selector::select_best;
