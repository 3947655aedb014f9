//! Video download using yt-dlp.
//!
//! Fetches the video in the requested container, Japanese/English VTT
//! subtitles and the thumbnail into a per-video work directory.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};
use vvp_models::OutputFormat;

use crate::error::{MediaError, MediaResult};

/// Subtitle languages requested from yt-dlp, in preference order.
pub const SUBTITLE_LANGS: [&str; 2] = ["ja", "en"];

/// Minimum size for a valid cookies file (bytes).
/// A real Netscape cookies file is at least ~50 bytes.
const MIN_COOKIES_FILE_SIZE: u64 = 50;

const THUMBNAIL_EXTENSIONS: [&str; 4] = ["webp", "jpg", "jpeg", "png"];

/// Files produced by a successful download.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedMedia {
    pub video_path: PathBuf,
    pub subtitle_path: Option<PathBuf>,
    pub thumbnail_path: Option<PathBuf>,
}

/// Validate that a cookies file appears to be in Netscape format.
///
/// Netscape cookies files either start with "# Netscape HTTP Cookie File"
/// or contain tab-separated lines with domain entries.
fn is_valid_netscape_cookies(content: &str) -> bool {
    if content.starts_with("# Netscape HTTP Cookie File")
        || content.starts_with("# HTTP Cookie File")
    {
        return true;
    }

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .any(|line| line.split('\t').count() >= 6)
}

/// Check a configured cookies file before handing it to yt-dlp.
///
/// Returns `None` if the file is missing, too small or not in Netscape format.
pub async fn usable_cookies_file(path: &Path) -> Option<PathBuf> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Cookies file not readable, skipping");
            return None;
        }
    };

    if metadata.len() < MIN_COOKIES_FILE_SIZE {
        debug!(
            path = %path.display(),
            size = metadata.len(),
            "Cookies file is too small, skipping"
        );
        return None;
    }

    match tokio::fs::read_to_string(path).await {
        Ok(content) if is_valid_netscape_cookies(&content) => Some(path.to_path_buf()),
        Ok(_) => {
            debug!(path = %path.display(), "Cookies file is not in Netscape format, skipping");
            None
        }
        Err(e) => {
            warn!("Failed to read cookies file: {}", e);
            None
        }
    }
}

/// Build the yt-dlp argument list for a full download.
pub fn build_download_args(
    url: &str,
    video_id: &str,
    workdir: &Path,
    format: OutputFormat,
    cookies: Option<&Path>,
) -> Vec<String> {
    let ext = format.extension();
    let template = workdir.join(format!("{}.%(ext)s", video_id));

    let mut args: Vec<String> = vec![
        "--no-playlist".into(),
        "-f".into(),
        format!("bestvideo[ext={ext}]+bestaudio/best[ext={ext}]/best"),
        "--merge-output-format".into(),
        ext.to_string(),
        "--write-subs".into(),
        "--write-auto-subs".into(),
        "--sub-langs".into(),
        SUBTITLE_LANGS.join(","),
        "--sub-format".into(),
        "vtt".into(),
        "--write-thumbnail".into(),
        "-o".into(),
        template.to_string_lossy().to_string(),
        "--no-simulate".into(),
        "--print".into(),
        "after_move:filepath".into(),
    ];

    if let Some(cp) = cookies {
        args.push("--cookies".into());
        args.push(cp.to_string_lossy().to_string());
    }

    args.push(url.to_string());
    args
}

/// Download a video with its subtitles and thumbnail.
///
/// # Arguments
///
/// * `url` - YouTube URL
/// * `video_id` - Used as the output file stem
/// * `workdir` - Directory that receives every downloaded file
/// * `format` - Container to merge into
/// * `cookies` - Optional Netscape cookies file for authenticated downloads
pub async fn download_media(
    url: &str,
    video_id: &str,
    workdir: &Path,
    format: OutputFormat,
    cookies: Option<&Path>,
) -> MediaResult<DownloadedMedia> {
    which::which("yt-dlp").map_err(|_| MediaError::YtDlpNotFound)?;

    tokio::fs::create_dir_all(workdir).await?;

    info!(
        url = %url,
        workdir = %workdir.display(),
        format = %format,
        "Downloading video"
    );

    let args = build_download_args(url, video_id, workdir, format, cookies);
    debug!("Running yt-dlp {}", args.join(" "));

    let output = Command::new("yt-dlp")
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("yt-dlp stderr: {}", stderr);

        let error_msg = stderr
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .unwrap_or("Unknown error");

        if stderr.contains("429") || stderr.contains("Too Many Requests") {
            warn!(url = %url, "YouTube rate limit detected");
        }

        return Err(MediaError::download_failed(format!(
            "yt-dlp failed: {}",
            error_msg
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let video_path = stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(PathBuf::from)
        .filter(|p| p.exists())
        .or_else(|| find_video_file(workdir, video_id, format))
        .ok_or_else(|| MediaError::download_failed("Output file not created"))?;

    let subtitle_path = find_subtitle(workdir, video_id);
    let thumbnail_path = find_thumbnail(workdir, video_id);

    let file_size = video_path.metadata()?.len();
    info!(
        output = %video_path.display(),
        size_mb = file_size as f64 / (1024.0 * 1024.0),
        has_subtitles = subtitle_path.is_some(),
        "Downloaded video successfully"
    );

    Ok(DownloadedMedia {
        video_path,
        subtitle_path,
        thumbnail_path,
    })
}

fn find_video_file(workdir: &Path, video_id: &str, format: OutputFormat) -> Option<PathBuf> {
    let preferred = workdir.join(format!("{}.{}", video_id, format.extension()));
    if preferred.exists() {
        return Some(preferred);
    }

    list_files(workdir)
        .into_iter()
        .find(|path| {
            path.file_stem().and_then(|s| s.to_str()) == Some(video_id)
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| OutputFormat::from_extension(e).is_some())
        })
}

/// Locate the best subtitle file for a video.
///
/// Prefers `{id}.ja.vtt`, then `{id}.en.vtt`, then any other `{id}*.vtt`.
pub fn find_subtitle(workdir: &Path, video_id: &str) -> Option<PathBuf> {
    for lang in SUBTITLE_LANGS {
        let candidate = workdir.join(format!("{}.{}.vtt", video_id, lang));
        if candidate.exists() {
            return Some(candidate);
        }
    }

    let mut others: Vec<PathBuf> = list_files(workdir)
        .into_iter()
        .filter(|path| {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            name.starts_with(video_id) && name.ends_with(".vtt")
        })
        .collect();
    others.sort();
    others.into_iter().next()
}

fn find_thumbnail(workdir: &Path, video_id: &str) -> Option<PathBuf> {
    THUMBNAIL_EXTENSIONS
        .iter()
        .map(|ext| workdir.join(format!("{}.{}", video_id, ext)))
        .find(|p| p.exists())
}

fn list_files(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|p| p.is_file())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_download_args() {
        let args = build_download_args(
            "https://youtu.be/dQw4w9WgXcQ",
            "dQw4w9WgXcQ",
            Path::new("/tmp/work"),
            OutputFormat::Mkv,
            None,
        );

        assert!(args.contains(&"bestvideo[ext=mkv]+bestaudio/best[ext=mkv]/best".to_string()));
        assert!(args.contains(&"ja,en".to_string()));
        assert!(args.contains(&"/tmp/work/dQw4w9WgXcQ.%(ext)s".to_string()));
        assert!(!args.contains(&"--cookies".to_string()));
        assert_eq!(args.last().unwrap(), "https://youtu.be/dQw4w9WgXcQ");
    }

    #[test]
    fn test_build_download_args_with_cookies() {
        let args = build_download_args(
            "https://youtu.be/dQw4w9WgXcQ",
            "dQw4w9WgXcQ",
            Path::new("/tmp/work"),
            OutputFormat::Mp4,
            Some(Path::new("/secrets/cookies.txt")),
        );

        let pos = args.iter().position(|a| a == "--cookies").unwrap();
        assert_eq!(args[pos + 1], "/secrets/cookies.txt");
    }

    #[test]
    fn test_netscape_cookie_detection() {
        assert!(is_valid_netscape_cookies("# Netscape HTTP Cookie File\n"));
        assert!(is_valid_netscape_cookies(
            ".youtube.com\tTRUE\t/\tTRUE\t0\tPREF\tf1=50000000"
        ));
        assert!(!is_valid_netscape_cookies("{\"cookies\": []}"));
    }

    #[test]
    fn test_find_subtitle_prefers_japanese() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("abc.en.vtt"), "WEBVTT").unwrap();
        std::fs::write(dir.path().join("abc.ja.vtt"), "WEBVTT").unwrap();

        let found = find_subtitle(dir.path(), "abc").unwrap();
        assert!(found.ends_with("abc.ja.vtt"));
    }

    #[test]
    fn test_find_subtitle_falls_back_to_any_language() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("abc.de.vtt"), "WEBVTT").unwrap();

        let found = find_subtitle(dir.path(), "abc").unwrap();
        assert!(found.ends_with("abc.de.vtt"));
        assert!(find_subtitle(dir.path(), "xyz").is_none());
    }

    #[test]
    fn test_find_video_file_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("abc.webm"), b"").unwrap();
        std::fs::write(dir.path().join("abc.mkv"), b"").unwrap();

        let found = find_video_file(dir.path(), "abc", OutputFormat::Mp4).unwrap();
        assert!(found.ends_with("abc.mkv"));
    }

    #[tokio::test]
    async fn test_usable_cookies_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("cookies.txt");
        std::fs::write(
            &good,
            "# Netscape HTTP Cookie File\n.youtube.com\tTRUE\t/\tTRUE\t0\tPREF\tx\n",
        )
        .unwrap();
        let tiny = dir.path().join("tiny.txt");
        std::fs::write(&tiny, "x").unwrap();

        assert_eq!(usable_cookies_file(&good).await, Some(good.clone()));
        assert_eq!(usable_cookies_file(&tiny).await, None);
        assert_eq!(usable_cookies_file(&dir.path().join("missing")).await, None);
    }
}
