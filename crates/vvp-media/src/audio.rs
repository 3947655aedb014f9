//! Audio track extraction and WAV decoding.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};

/// Sample rate of the extracted analysis track.
pub const ANALYSIS_SAMPLE_RATE: u32 = 22_050;

/// Decoded mono PCM.
#[derive(Debug, Clone, PartialEq)]
pub struct MonoAudio {
    /// Samples normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl MonoAudio {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Build the FFmpeg arguments that convert a video's audio to mono 16-bit WAV.
pub fn build_extract_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-v".into(),
        "error".into(),
        "-i".into(),
        input.to_string_lossy().to_string(),
        "-vn".into(),
        "-ac".into(),
        "1".into(),
        "-ar".into(),
        ANALYSIS_SAMPLE_RATE.to_string(),
        "-c:a".into(),
        "pcm_s16le".into(),
        output.to_string_lossy().to_string(),
    ]
}

/// Extract the audio track of `video` into `{video stem}.wav` next to it.
pub async fn extract_audio(video: impl AsRef<Path>) -> MediaResult<PathBuf> {
    let video = video.as_ref();
    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }

    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

    let output_path = video.with_extension("wav");
    let args = build_extract_args(video, &output_path);
    debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

    let output = Command::new("ffmpeg")
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let message = stderr
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .unwrap_or("audio extraction failed")
            .to_string();
        return Err(MediaError::ffmpeg_failed(
            message,
            Some(stderr),
            output.status.code(),
        ));
    }

    info!(output = %output_path.display(), "Extracted audio track");
    Ok(output_path)
}

/// Decode a WAV file into mono `f32` samples, averaging channels.
pub fn load_wav_mono(path: impl AsRef<Path>) -> MediaResult<MonoAudio> {
    let mut reader = hound::WavReader::open(path.as_ref())?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    if interleaved.is_empty() {
        return Err(MediaError::invalid_audio("WAV file contains no samples"));
    }

    let samples = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();

    Ok(MonoAudio {
        samples,
        sample_rate: spec.sample_rate,
    })
}
