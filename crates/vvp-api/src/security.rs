//! Input validation for user-supplied URLs and ids.
//!
//! Only YouTube URLs are accepted, and anything resembling an internal
//! address is rejected before it reaches the downloader.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;
use url::Url;
use vvp_models::is_valid_youtube_id;

/// Maximum URL length to prevent DoS attacks.
const MAX_URL_LENGTH: usize = 2048;

/// Allowed video URL domains (whitelist for SSRF protection).
static ALLOWED_DOMAINS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "youtube.com",
        "www.youtube.com",
        "m.youtube.com",
        "music.youtube.com",
        "youtu.be",
    ])
});

/// Blocked URL patterns (sensitive endpoints).
static BLOCKED_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // Internal IP ranges
        Regex::new(r"^https?://127\.").unwrap(),
        Regex::new(r"^https?://localhost").unwrap(),
        Regex::new(r"^https?://0\.0\.0\.0").unwrap(),
        Regex::new(r"^https?://10\.").unwrap(),
        Regex::new(r"^https?://172\.(1[6-9]|2[0-9]|3[0-1])\.").unwrap(),
        Regex::new(r"^https?://192\.168\.").unwrap(),
        Regex::new(r"^https?://169\.254\.").unwrap(),
        Regex::new(r"^https?://\[::1\]").unwrap(),
        Regex::new(r"^https?://\[fd").unwrap(),
        Regex::new(r"^https?://\[fe80").unwrap(),
        // Cloud metadata endpoints
        Regex::new(r"^https?://metadata\.").unwrap(),
        Regex::new(r"^https?://metadata\.google\.internal").unwrap(),
    ]
});

/// Result of URL validation.
#[derive(Debug)]
pub enum UrlValidationResult {
    /// URL is valid and allowed.
    Valid(String),
    /// URL is malformed or uses an unsupported protocol.
    Invalid(String),
    /// URL domain is not in the whitelist.
    DomainNotAllowed(String),
    /// URL matches a blocked pattern (e.g., internal IPs).
    Blocked(String),
    /// URL exceeds maximum length.
    TooLong,
}

impl UrlValidationResult {
    pub fn into_result(self) -> Result<String, String> {
        match self {
            Self::Valid(url) => Ok(url),
            Self::Invalid(msg) => Err(msg),
            Self::DomainNotAllowed(domain) => Err(format!(
                "Domain '{}' is not allowed. Only YouTube URLs are supported",
                domain
            )),
            Self::Blocked(reason) => Err(reason),
            Self::TooLong => Err(format!(
                "URL exceeds maximum length of {} characters",
                MAX_URL_LENGTH
            )),
        }
    }
}

/// Validate a YouTube URL: length, protocol, block list, then domain whitelist.
pub fn validate_video_url(url: &str) -> UrlValidationResult {
    if url.len() > MAX_URL_LENGTH {
        return UrlValidationResult::TooLong;
    }

    let url = url.trim();
    if url.is_empty() {
        return UrlValidationResult::Invalid("URL cannot be empty".to_string());
    }

    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(e) => return UrlValidationResult::Invalid(format!("Invalid URL format: {}", e)),
    };

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return UrlValidationResult::Invalid(format!(
                "Invalid protocol '{}'. Only HTTP and HTTPS are allowed.",
                scheme
            ))
        }
    }

    for pattern in BLOCKED_PATTERNS.iter() {
        if pattern.is_match(url) {
            warn!(url = %url, "Blocked URL pattern detected");
            return UrlValidationResult::Blocked(
                "URL appears to target an internal or restricted endpoint".to_string(),
            );
        }
    }

    let domain = match parsed.host_str() {
        Some(d) => d.to_lowercase(),
        None => return UrlValidationResult::Invalid("URL must have a valid domain".to_string()),
    };

    if !is_domain_allowed(&domain) {
        return UrlValidationResult::DomainNotAllowed(domain);
    }

    UrlValidationResult::Valid(url.to_string())
}

/// Check if a domain or its registrable parent is in the whitelist.
fn is_domain_allowed(domain: &str) -> bool {
    if ALLOWED_DOMAINS.contains(domain) {
        return true;
    }

    let parts: Vec<&str> = domain.split('.').collect();
    if parts.len() >= 2 {
        let parent = format!("{}.{}", parts[parts.len() - 2], parts[parts.len() - 1]);
        if ALLOWED_DOMAINS.contains(parent.as_str()) {
            return true;
        }
    }

    false
}

/// Validate a path video id (11 chars of `[A-Za-z0-9_-]`).
pub fn validate_video_id(id: &str) -> Result<(), String> {
    if is_valid_youtube_id(id) {
        Ok(())
    } else {
        Err(format!("Invalid YouTube video id: '{}'", truncate_for_message(id)))
    }
}

fn truncate_for_message(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control())
        .take(32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_youtube_urls() {
        assert!(matches!(
            validate_video_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            UrlValidationResult::Valid(_)
        ));
        assert!(matches!(
            validate_video_url("https://youtu.be/dQw4w9WgXcQ"),
            UrlValidationResult::Valid(_)
        ));
        assert!(matches!(
            validate_video_url("  https://m.youtube.com/shorts/dQw4w9WgXcQ "),
            UrlValidationResult::Valid(_)
        ));
    }

    #[test]
    fn test_other_platforms_rejected() {
        assert!(matches!(
            validate_video_url("https://vimeo.com/123456789"),
            UrlValidationResult::DomainNotAllowed(_)
        ));
        assert!(matches!(
            validate_video_url("https://notyoutube.com/watch?v=dQw4w9WgXcQ"),
            UrlValidationResult::DomainNotAllowed(_)
        ));
    }

    #[test]
    fn test_blocked_internal_ips() {
        assert!(matches!(
            validate_video_url("http://127.0.0.1/watch?v=dQw4w9WgXcQ"),
            UrlValidationResult::Blocked(_)
        ));
        assert!(matches!(
            validate_video_url("http://localhost/video"),
            UrlValidationResult::Blocked(_)
        ));
        assert!(matches!(
            validate_video_url("http://169.254.169.254/latest/meta-data/"),
            UrlValidationResult::Blocked(_)
        ));
    }

    #[test]
    fn test_invalid_protocols_and_length() {
        assert!(matches!(
            validate_video_url("ftp://youtube.com/video"),
            UrlValidationResult::Invalid(_)
        ));
        assert!(matches!(
            validate_video_url(""),
            UrlValidationResult::Invalid(_)
        ));
        let long = format!("https://youtube.com/watch?v={}", "a".repeat(MAX_URL_LENGTH));
        assert!(matches!(validate_video_url(&long), UrlValidationResult::TooLong));
    }

    #[test]
    fn test_video_id_validation() {
        assert!(validate_video_id("dQw4w9WgXcQ").is_ok());
        assert!(validate_video_id("a_b-c_d-e_f").is_ok());
        assert!(validate_video_id("short").is_err());
        assert!(validate_video_id("dQw4w9WgXc/").is_err());
    }
}
