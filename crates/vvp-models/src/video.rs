//! YouTube video metadata.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Top-level comment on a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Comment {
    pub author: String,
    pub text: String,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub published_at: Option<String>,
}

impl Comment {
    pub fn new(author: impl Into<String>, text: impl Into<String>, like_count: u64) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
            like_count,
            published_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChannelInfo {
    pub title: Option<String>,
    pub subscriber_count: u64,
    pub video_count: u64,
    pub view_count: u64,
}

/// Video metadata, statistics and top comments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoInfo {
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub published_at: Option<String>,
    pub channel_id: Option<String>,
    pub channel_title: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    /// ISO 8601 duration as reported by the API (`PT1H2M3S`)
    pub duration_iso: String,
    pub duration_secs: u64,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub channel: ChannelInfo,
}

impl VideoInfo {
    /// `(likes + comments) / views * 100`, rounded to 2 decimals.
    pub fn engagement_rate(&self) -> f64 {
        if self.view_count == 0 {
            return 0.0;
        }
        let interactions = (self.like_count + self.comment_count) as f64;
        let rate = interactions / self.view_count as f64 * 100.0;
        (rate * 100.0).round() / 100.0
    }
}
