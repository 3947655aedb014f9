//! YouTube Data API v3 client.
//!
//! Fetches video metadata and statistics, channel statistics and top-level
//! comments. Channel and comment lookups are best effort: comments are
//! disabled on many videos and that must not fail the analysis.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};
use vvp_models::timestamp::parse_iso8601_duration;
use vvp_models::{ChannelInfo, Comment, VideoInfo};

use crate::error::{WorkerError, WorkerResult};
use crate::sources::EngagementFetcher;

/// YouTube Data API client.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    max_comments: u32,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    #[serde(default)]
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: Statistics,
    #[serde(default)]
    content_details: ContentDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    published_at: Option<String>,
    channel_id: Option<String>,
    channel_title: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

/// Counts arrive as decimal strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
    subscriber_count: Option<String>,
    video_count: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentDetails {
    #[serde(default)]
    duration: String,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    #[serde(default)]
    snippet: ChannelSnippet,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Default, Deserialize)]
struct ChannelSnippet {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: ThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    #[serde(default)]
    author_display_name: String,
    text_original: Option<String>,
    #[serde(default)]
    text_display: String,
    #[serde(default)]
    like_count: u64,
    published_at: Option<String>,
}

fn parse_count(value: &Option<String>) -> u64 {
    value
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

impl YouTubeClient {
    pub fn new(base_url: impl Into<String>, max_comments: u32) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_comments: max_comments.clamp(1, 100),
        }
    }

    /// Metadata, statistics, channel and comments for one video.
    pub async fn fetch_video_info(&self, video_id: &str, api_key: &str) -> WorkerResult<VideoInfo> {
        info!(video_id = %video_id, "Fetching video metadata from YouTube Data API");

        let videos: ListResponse<VideoItem> = self
            .get(
                "videos",
                &[
                    ("part", "snippet,statistics,contentDetails"),
                    ("id", video_id),
                    ("key", api_key),
                ],
            )
            .await?;

        let item = videos
            .items
            .into_iter()
            .next()
            .ok_or_else(|| WorkerError::engagement_failed(format!("Video not found: {}", video_id)))?;

        let channel = match item.snippet.channel_id.as_deref() {
            Some(channel_id) => match self.fetch_channel(channel_id, api_key).await {
                Ok(channel) => channel,
                Err(e) => {
                    warn!(channel_id = %channel_id, error = %e, "Channel lookup failed");
                    ChannelInfo::default()
                }
            },
            None => ChannelInfo::default(),
        };

        let comments = match self.fetch_comments(video_id, api_key).await {
            Ok(comments) => comments,
            Err(e) => {
                warn!(video_id = %video_id, error = %e, "Comment lookup failed, continuing without comments");
                Vec::new()
            }
        };

        let duration_iso = item.content_details.duration;
        Ok(VideoInfo {
            video_id: video_id.to_string(),
            title: item.snippet.title,
            description: item.snippet.description,
            published_at: item.snippet.published_at,
            channel_id: item.snippet.channel_id,
            channel_title: item.snippet.channel_title,
            tags: item.snippet.tags,
            view_count: parse_count(&item.statistics.view_count),
            like_count: parse_count(&item.statistics.like_count),
            comment_count: parse_count(&item.statistics.comment_count),
            duration_secs: parse_iso8601_duration(&duration_iso),
            duration_iso,
            comments,
            channel,
        })
    }

    async fn fetch_channel(&self, channel_id: &str, api_key: &str) -> WorkerResult<ChannelInfo> {
        let channels: ListResponse<ChannelItem> = self
            .get(
                "channels",
                &[("part", "snippet,statistics"), ("id", channel_id), ("key", api_key)],
            )
            .await?;

        Ok(channels
            .items
            .into_iter()
            .next()
            .map(|c| ChannelInfo {
                title: c.snippet.title,
                subscriber_count: parse_count(&c.statistics.subscriber_count),
                video_count: parse_count(&c.statistics.video_count),
                view_count: parse_count(&c.statistics.view_count),
            })
            .unwrap_or_default())
    }

    async fn fetch_comments(&self, video_id: &str, api_key: &str) -> WorkerResult<Vec<Comment>> {
        let max_results = self.max_comments.to_string();
        let threads: ListResponse<CommentThread> = self
            .get(
                "commentThreads",
                &[
                    ("part", "snippet"),
                    ("videoId", video_id),
                    ("maxResults", max_results.as_str()),
                    ("order", "relevance"),
                    ("key", api_key),
                ],
            )
            .await?;

        Ok(threads
            .items
            .into_iter()
            .map(|t| {
                let s = t.snippet.top_level_comment.snippet;
                Comment {
                    author: s.author_display_name,
                    text: s.text_original.unwrap_or(s.text_display),
                    like_count: s.like_count,
                    published_at: s.published_at,
                }
            })
            .collect())
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> WorkerResult<T> {
        let url = format!("{}/{}", self.base_url, resource);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| WorkerError::engagement_failed(format!("YouTube API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(WorkerError::engagement_failed(format!(
                "YouTube API returned {} for {}: {}",
                status, resource, message
            )));
        }

        response.json().await.map_err(|e| {
            WorkerError::engagement_failed(format!("Failed to parse YouTube {} response: {}", resource, e))
        })
    }
}

#[async_trait]
impl EngagementFetcher for YouTubeClient {
    async fn fetch(&self, video_id: &str, api_key: &str) -> WorkerResult<VideoInfo> {
        self.fetch_video_info(video_id, api_key).await
    }
}
