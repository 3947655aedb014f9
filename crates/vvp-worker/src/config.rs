//! Pipeline configuration.

use std::path::PathBuf;

use vvp_models::{ApiKeys, Provider};

/// Default YouTube Data API v3 base URL.
pub const DEFAULT_YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
/// Default Gemini API base URL.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
/// Models tried in order until one answers.
pub const DEFAULT_GEMINI_MODELS: [&str; 3] =
    ["gemini-2.5-flash", "gemini-2.5-flash-lite", "gemini-2.5-pro"];

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Work directory for downloads (one subdirectory per video)
    pub work_dir: PathBuf,
    /// YouTube Data API base URL
    pub youtube_api_base: String,
    /// Gemini API base URL
    pub gemini_api_base: String,
    /// Gemini models in fallback order
    pub gemini_models: Vec<String>,
    /// Maximum comments fetched per video (API page size cap is 100)
    pub max_comments: u32,
    /// Transcript characters sent to the AI
    pub transcript_char_limit: usize,
    /// Credentials used when a request does not carry its own
    pub default_keys: ApiKeys,
    /// Keep downloaded media after the analysis finishes
    pub keep_media: bool,
    /// Netscape cookies file handed to yt-dlp
    pub ytdlp_cookies_file: Option<PathBuf>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("/tmp/vvp"),
            youtube_api_base: DEFAULT_YOUTUBE_API_BASE.to_string(),
            gemini_api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            gemini_models: DEFAULT_GEMINI_MODELS.iter().map(|m| m.to_string()).collect(),
            max_comments: 100,
            transcript_char_limit: 15_000,
            default_keys: ApiKeys::default(),
            keep_media: false,
            ytdlp_cookies_file: None,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mut default_keys = ApiKeys::default();
        if let Ok(key) = std::env::var("YOUTUBE_API_KEY") {
            default_keys.insert(Provider::Youtube, key);
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            default_keys.insert(Provider::Gemini, key);
        }

        let gemini_models = std::env::var("GEMINI_MODELS")
            .ok()
            .map(|s| parse_list(&s))
            .filter(|models| !models.is_empty())
            .unwrap_or(defaults.gemini_models);

        Self {
            work_dir: std::env::var("WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            youtube_api_base: std::env::var("YOUTUBE_API_BASE")
                .unwrap_or(defaults.youtube_api_base),
            gemini_api_base: std::env::var("GEMINI_API_BASE").unwrap_or(defaults.gemini_api_base),
            gemini_models,
            max_comments: std::env::var("MAX_COMMENTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(|n: u32| n.clamp(1, 100))
                .unwrap_or(defaults.max_comments),
            transcript_char_limit: std::env::var("TRANSCRIPT_CHAR_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.transcript_char_limit),
            default_keys,
            keep_media: std::env::var("KEEP_MEDIA")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            ytdlp_cookies_file: std::env::var("YTDLP_COOKIES_FILE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Per-video work directory.
    pub fn video_dir(&self, video_id: &str) -> PathBuf {
        self.work_dir.join(video_id)
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.max_comments, 100);
        assert_eq!(config.gemini_models.len(), 3);
        assert!(config.default_keys.get(Provider::Gemini).is_none());
        assert_eq!(config.video_dir("abc"), PathBuf::from("/tmp/vvp/abc"));
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list(" gemini-a, ,gemini-b "),
            vec!["gemini-a".to_string(), "gemini-b".to_string()]
        );
        assert!(parse_list("").is_empty());
    }
}
