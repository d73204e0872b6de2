use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedItemSource {
    #[serde(rename = "subscriptionsPosts")]
    SubscriptionsPosts,
    #[serde(rename = "subscriptionsComments")]
    SubscriptionsComments,
    #[serde(rename = "recombee-lesswrong-custom")]
    Recombee,
    #[serde(rename = "hacker-news")]
    HackerNews,
    #[serde(rename = "bookmarks")]
    Bookmarks,
    #[serde(rename = "quicktakes")]
    Quicktakes,
    #[serde(rename = "recentComments")]
    RecentComments,
    #[serde(rename = "spotlights")]
    Spotlights,
    #[serde(other, rename = "unknown")]
    Unknown,
}

impl FeedItemSource {
    pub fn label(self) -> &'static str {
        match self {
            FeedItemSource::SubscriptionsPosts => "subscriptionsPosts",
            FeedItemSource::SubscriptionsComments => "subscriptionsComments",
            FeedItemSource::Recombee => "recombee-lesswrong-custom",
            FeedItemSource::HackerNews => "hacker-news",
            FeedItemSource::Bookmarks => "bookmarks",
            FeedItemSource::Quicktakes => "quicktakes",
            FeedItemSource::RecentComments => "recentComments",
            FeedItemSource::Spotlights => "spotlights",
            FeedItemSource::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateComment {
    pub comment_id: String,
    pub post_id: String,
    #[serde(default)]
    pub parent_comment_id: Option<String>,
    // Empty for roots the data layer sent without one; see `discussion_id`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_level_comment_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub base_score: i64,
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_quick_take: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<FeedItemSource>,
    #[serde(default)]
    pub last_served: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_viewed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_interacted: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub descendent_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub direct_descendent_count: u32,
}

impl CandidateComment {
    pub fn new(
        comment_id: impl Into<String>,
        post_id: impl Into<String>,
        parent_comment_id: Option<String>,
        top_level_comment_id: impl Into<String>,
    ) -> Self {
        Self {
            comment_id: comment_id.into(),
            post_id: post_id.into(),
            parent_comment_id,
            top_level_comment_id: top_level_comment_id.into(),
            base_score: 0,
            posted_at: None,
            author_id: None,
            is_quick_take: false,
            sources: Vec::new(),
            last_served: None,
            last_viewed: None,
            last_interacted: None,
            descendent_count: 0,
            direct_descendent_count: 0,
        }
    }

    pub fn is_unviewed(&self) -> bool {
        self.last_viewed.is_none() && self.last_interacted.is_none()
    }

    /// The top-level comment id, or the comment's own id when none was sent.
    pub fn discussion_id(&self) -> &str {
        if self.top_level_comment_id.is_empty() {
            &self.comment_id
        } else {
            &self.top_level_comment_id
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredComment {
    #[serde(flatten)]
    pub comment: CandidateComment,
    pub score: f64,
}

impl ScoredComment {
    pub fn new(comment: CandidateComment, score: f64) -> Self {
        Self { comment, score }
    }

    pub fn comment_id(&self) -> &str {
        &self.comment.comment_id
    }
}

pub type LinearThread = Vec<ScoredComment>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadEngagementStats {
    pub thread_top_level_id: String,
    #[serde(default)]
    pub participation_count: u32,
    #[serde(default)]
    pub voting_activity_score: f64,
    #[serde(default)]
    pub view_score: f64,
    #[serde(default)]
    pub is_on_read_post: bool,
    #[serde(default)]
    pub recent_serving_count: u32,
    #[serde(default)]
    pub serving_hours_ago: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct PrioritizedThread {
    pub thread: LinearThread,
    pub top_level_comment_id: String,
    pub base_score: f64,
    pub engagement_multiplier: f64,
    pub score: f64,
}

impl PrioritizedThread {
    pub fn comment_ids(&self) -> Vec<&str> {
        self.thread.iter().map(ScoredComment::comment_id).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayStatus {
    Expanded,
    Collapsed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayComment {
    #[serde(flatten)]
    pub scored: ScoredComment,
    pub display_status: DisplayStatus,
    pub highlight: bool,
}

impl DisplayComment {
    pub fn comment_id(&self) -> &str {
        self.scored.comment_id()
    }

    pub fn is_expanded(&self) -> bool {
        self.display_status == DisplayStatus::Expanded
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedThread {
    pub comments: Vec<DisplayComment>,
    pub primary_source: Option<FeedItemSource>,
    pub score: f64,
    pub thread_hash: String,
}
