//! Transcript content quality report.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptStatistics {
    pub total_characters: usize,
    pub total_words: usize,
    pub total_sentences: usize,
    pub average_sentence_length: f64,
    pub vocabulary_diversity: f64,
}

/// Heuristic transcript scores, each on a 0-10 scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContentQuality {
    pub content_score: f64,
    pub speech_clarity: f64,
    pub content_structure: f64,
    pub engagement_factors: f64,
    /// Mean of the four scores above
    pub overall_quality: f64,
    pub statistics: TranscriptStatistics,
    pub key_phrases: Vec<String>,
    pub speech_patterns: Vec<String>,
    pub summary: String,
}
