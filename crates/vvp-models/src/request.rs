//! Analysis request types.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// External credential providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// YouTube Data API v3
    Youtube,
    /// Gemini generative-AI API
    Gemini,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Youtube => "youtube",
            Provider::Gemini => "gemini",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Provider to credential map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ApiKeys(HashMap<Provider, String>);

impl ApiKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. Blank keys are ignored.
    pub fn with(mut self, provider: Provider, key: impl Into<String>) -> Self {
        self.insert(provider, key);
        self
    }

    pub fn insert(&mut self, provider: Provider, key: impl Into<String>) {
        let key = key.into();
        if !key.trim().is_empty() {
            self.0.insert(provider, key.trim().to_string());
        }
    }

    /// Credential for a provider, if one was supplied and is non-blank.
    pub fn get(&self, provider: Provider) -> Option<&str> {
        self.0
            .get(&provider)
            .map(String::as_str)
            .filter(|k| !k.trim().is_empty())
    }

    /// Fill providers missing from `self` with the ones from `defaults`.
    pub fn or_defaults(&self, defaults: &ApiKeys) -> ApiKeys {
        let mut merged = defaults.clone();
        for (provider, key) in &self.0 {
            merged.insert(*provider, key.clone());
        }
        merged
    }
}

/// Container format requested from the downloader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Mp4,
    Mov,
    Avi,
    Mkv,
}

impl OutputFormat {
    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Mp4 => "mp4",
            OutputFormat::Mov => "mov",
            OutputFormat::Avi => "avi",
            OutputFormat::Mkv => "mkv",
        }
    }

    /// Parse a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp4" => Some(OutputFormat::Mp4),
            "mov" => Some(OutputFormat::Mov),
            "avi" => Some(OutputFormat::Avi),
            "mkv" => Some(OutputFormat::Mkv),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Pipeline options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisOptions {
    /// Download video/subtitles and run audio extraction
    #[serde(default = "default_download_media")]
    pub download_media: bool,
    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_download_media() -> bool {
    true
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            download_media: true,
            output_format: OutputFormat::Mp4,
        }
    }
}

/// Request to analyze a single video. Immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisRequest {
    /// YouTube URL to analyze
    pub url: String,
    #[serde(default)]
    pub api_keys: ApiKeys,
    #[serde(default)]
    pub options: AnalysisOptions,
}

impl AnalysisRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_keys: ApiKeys::default(),
            options: AnalysisOptions::default(),
        }
    }
}
