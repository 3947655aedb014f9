//! Comment engagement and sentiment reports.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Share of comments per sentiment (fractions in [0, 1]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SentimentDistribution {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl SentimentDistribution {
    /// Largest bucket; ties resolve positive, then negative, then neutral.
    pub fn dominant(&self) -> Sentiment {
        if self.positive >= self.negative && self.positive >= self.neutral && self.positive > 0.0 {
            Sentiment::Positive
        } else if self.negative >= self.neutral && self.negative > 0.0 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EngagementMetrics {
    pub total_comments: u64,
    pub total_likes: u64,
    pub avg_likes_per_comment: f64,
    /// `(likes + comments) / views * 100` for the video
    pub engagement_rate: f64,
    pub sentiment_distribution: SentimentDistribution,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SentimentAnalysis {
    pub distribution: SentimentDistribution,
    pub dominant: Sentiment,
    pub positive_count: u64,
    pub negative_count: u64,
    pub neutral_count: u64,
    pub summary: String,
}
