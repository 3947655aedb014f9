//! Media acquisition and signal helpers for video analysis.
//!
//! This crate provides:
//! - yt-dlp downloads of video, subtitles and thumbnails
//! - WebVTT transcript parsing
//! - FFmpeg audio extraction and WAV decoding
//! - Frame-level loudness and excitement analysis
//! - FFprobe stream inspection

pub mod audio;
pub mod download;
pub mod error;
pub mod loudness;
pub mod probe;
pub mod subtitles;

pub use audio::{extract_audio, load_wav_mono, MonoAudio, ANALYSIS_SAMPLE_RATE};
pub use download::{download_media, find_subtitle, usable_cookies_file, DownloadedMedia};
pub use error::{MediaError, MediaResult};
pub use loudness::analyze_samples;
pub use probe::{probe_video, ProbeInfo};
pub use subtitles::{load_transcript, parse_vtt, Cue, Transcript};
