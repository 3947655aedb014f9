//! YouTube URL parsing and video ID validation.

/// Errors that can occur during YouTube ID extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YoutubeIdError {
    /// URL is not a valid YouTube URL
    InvalidYoutubeUrl,
    /// Video ID has invalid format
    InvalidVideoId,
    /// Video ID not found in URL
    VideoIdNotFound,
}

impl std::fmt::Display for YoutubeIdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YoutubeIdError::InvalidYoutubeUrl => write!(f, "URL is not a valid YouTube URL"),
            YoutubeIdError::InvalidVideoId => write!(f, "Video ID has invalid format"),
            YoutubeIdError::VideoIdNotFound => write!(f, "Video ID not found in URL"),
        }
    }
}

impl std::error::Error for YoutubeIdError {}

/// Result type for YouTube ID extraction.
pub type YoutubeIdResult<T> = Result<T, YoutubeIdError>;

/// Path markers that precede a video ID, in lookup order.
const ID_MARKERS: [&str; 6] = ["?v=", "&v=", "youtu.be/", "/embed/", "/v/", "/shorts/"];

/// Extract the 11-character video ID from a YouTube URL.
///
/// Supports `watch?v=`, `youtu.be/`, `/embed/`, `/v/` and `/shorts/` forms,
/// with or without extra query parameters and fragments.
pub fn extract_youtube_id(url: &str) -> YoutubeIdResult<String> {
    let url = url.trim();

    let lower = url.to_ascii_lowercase();
    if !(lower.contains("youtube.com") || lower.contains("youtu.be")) {
        return Err(YoutubeIdError::InvalidYoutubeUrl);
    }

    for marker in ID_MARKERS {
        if let Some(pos) = url.find(marker) {
            let segment = &url[pos + marker.len()..];
            if segment.is_empty() && marker != "?v=" && marker != "&v=" {
                continue;
            }
            let id = id_from_segment(segment);
            return if is_valid_youtube_id(id) {
                Ok(id.to_string())
            } else {
                Err(YoutubeIdError::InvalidVideoId)
            };
        }
    }

    Err(YoutubeIdError::VideoIdNotFound)
}

fn id_from_segment(segment: &str) -> &str {
    let end = segment
        .find(['&', '#', '?', '/'])
        .unwrap_or(segment.len());
    segment[..end].trim()
}

/// YouTube video IDs are exactly 11 characters of `[A-Za-z0-9_-]`.
pub fn is_valid_youtube_id(id: &str) -> bool {
    id.len() == 11
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_youtube_id_success_cases() {
        let urls = [
            "https://youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtube.com/embed/dQw4w9WgXcQ",
            "https://youtube.com/v/dQw4w9WgXcQ",
            "https://youtube.com/shorts/dQw4w9WgXcQ",
            "https://youtube.com/watch?v=dQw4w9WgXcQ&list=PLrAXtmRdnEQy4qtr",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?t=30",
            "  https://m.youtube.com/watch?v=dQw4w9WgXcQ#comments  ",
        ];
        for url in urls {
            assert_eq!(extract_youtube_id(url).unwrap(), "dQw4w9WgXcQ", "url: {}", url);
        }
    }

    #[test]
    fn test_extract_youtube_id_error_cases() {
        assert_eq!(
            extract_youtube_id("https://vimeo.com/123"),
            Err(YoutubeIdError::InvalidYoutubeUrl)
        );
        assert_eq!(
            extract_youtube_id("https://youtube.com"),
            Err(YoutubeIdError::VideoIdNotFound)
        );
        assert_eq!(
            extract_youtube_id("https://youtu.be/"),
            Err(YoutubeIdError::VideoIdNotFound)
        );
        assert_eq!(
            extract_youtube_id("https://youtube.com/watch?v=abc123"),
            Err(YoutubeIdError::InvalidVideoId)
        );
        assert_eq!(
            extract_youtube_id("https://youtube.com/watch?v=abc123def!!"),
            Err(YoutubeIdError::InvalidVideoId)
        );
        assert_eq!(
            extract_youtube_id("https://youtube.com/watch?v="),
            Err(YoutubeIdError::InvalidVideoId)
        );
    }

    #[test]
    fn test_is_valid_youtube_id() {
        assert!(is_valid_youtube_id("dQw4w9WgXcQ"));
        assert!(is_valid_youtube_id("a_b-c_d-e_f"));
        assert!(!is_valid_youtube_id("short"));
        assert!(!is_valid_youtube_id("../etc/pass"));
    }
}
