//! Process-backed collaborators: yt-dlp download and FFmpeg audio features.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};
use vvp_media::{analyze_samples, download_media, load_transcript, load_wav_mono, probe_video};
use vvp_models::{AudioFeatures, OutputFormat};

use crate::error::{WorkerError, WorkerResult};
use crate::sources::{AcquiredVideo, AudioFeatureExtractor, VideoAcquirer};

/// Downloads through yt-dlp into `{work_dir}/{video_id}/`.
#[derive(Debug, Clone)]
pub struct YtDlpAcquirer {
    work_dir: PathBuf,
    cookies_file: Option<PathBuf>,
}

impl YtDlpAcquirer {
    pub fn new(work_dir: impl Into<PathBuf>, cookies_file: Option<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            cookies_file,
        }
    }
}

#[async_trait]
impl VideoAcquirer for YtDlpAcquirer {
    async fn acquire(
        &self,
        url: &str,
        video_id: &str,
        format: OutputFormat,
    ) -> WorkerResult<AcquiredVideo> {
        let workdir = self.work_dir.join(video_id);

        let cookies = match &self.cookies_file {
            Some(path) => vvp_media::usable_cookies_file(path).await,
            None => None,
        };

        let media = download_media(url, video_id, &workdir, format, cookies.as_deref())
            .await
            .map_err(|e| WorkerError::download_failed(e.to_string()))?;

        let transcript = match &media.subtitle_path {
            Some(path) => match load_transcript(path).await {
                Ok(transcript) => transcript,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to read subtitles");
                    Default::default()
                }
            },
            None => {
                info!(video_id = %video_id, "No subtitles available");
                Default::default()
            }
        };

        let probe = match probe_video(&media.video_path).await {
            Ok(probe) => Some(probe),
            Err(e) => {
                warn!(video_id = %video_id, error = %e, "ffprobe failed, technical details unavailable");
                None
            }
        };

        Ok(AcquiredVideo {
            workdir,
            video_path: media.video_path,
            has_subtitles: !transcript.is_empty(),
            transcript,
            probe,
        })
    }
}

/// Extracts mono audio with FFmpeg and computes loudness features.
#[derive(Debug, Clone, Default)]
pub struct FfmpegAudioExtractor;

#[async_trait]
impl AudioFeatureExtractor for FfmpegAudioExtractor {
    async fn extract(&self, video_path: &Path) -> WorkerResult<AudioFeatures> {
        let wav_path = vvp_media::extract_audio(video_path)
            .await
            .map_err(|e| WorkerError::audio_failed(e.to_string()))?;

        let decode_path = wav_path.clone();
        let features = tokio::task::spawn_blocking(move || {
            let audio = load_wav_mono(&decode_path)?;
            analyze_samples(&audio.samples, audio.sample_rate)
        })
        .await
        .map_err(|e| WorkerError::audio_failed(format!("Audio task panicked: {}", e)))?
        .map_err(|e| WorkerError::audio_failed(e.to_string()));

        if let Err(e) = tokio::fs::remove_file(&wav_path).await {
            debug!(path = %wav_path.display(), error = %e, "Failed to remove extracted audio");
        }

        features
    }
}

/// Remove a per-video work directory. Missing directories are ignored.
pub async fn cleanup_workdir(workdir: &Path) {
    match tokio::fs::remove_dir_all(workdir).await {
        Ok(()) => debug!(path = %workdir.display(), "Removed work directory"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %workdir.display(), error = %e, "Failed to remove work directory"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_audio_extractor_missing_file() {
        let err = FfmpegAudioExtractor
            .extract(Path::new("/nonexistent/video.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkerError::AudioFailed(_)));
    }

    #[tokio::test]
    async fn test_cleanup_workdir() {
        let dir = tempfile::tempdir().unwrap();
        let workdir = dir.path().join("abc");
        tokio::fs::create_dir_all(&workdir).await.unwrap();
        tokio::fs::write(workdir.join("abc.mp4"), b"x").await.unwrap();

        cleanup_workdir(&workdir).await;
        assert!(!workdir.exists());

        // Second call is a no-op
        cleanup_workdir(&workdir).await;
    }
}
