use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("{origin} fetch failed: {message}")]
    Fetch {
        origin: &'static str,
        message: String,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("dataset error: {0}")]
    Dataset(String),
}

impl FeedError {
    pub fn fetch(origin: &'static str, message: impl Into<String>) -> Self {
        FeedError::Fetch {
            origin,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
