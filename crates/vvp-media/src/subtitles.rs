//! WebVTT subtitle parsing.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::MediaResult;

static TS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:\d{2}:)?\d{2}:\d{2})\.\d{3}\s+-->").expect("valid cue timing regex")
});

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// One caption line with the start time of its cue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// Seconds from the start
    pub start: f64,
    pub text: String,
}

/// Parsed subtitle track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub cues: Vec<Cue>,
}

impl Transcript {
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Caption text joined with spaces.
    pub fn plain_text(&self) -> String {
        self.cues
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// One `[HH:MM:SS] text` line per cue.
    pub fn timestamped(&self) -> String {
        let mut out = String::new();
        for cue in &self.cues {
            let secs = cue.start as u64;
            out.push_str(&format!(
                "[{:02}:{:02}:{:02}] {}\n",
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60,
                cue.text
            ));
        }
        out
    }
}

/// Parse VTT content into caption cues.
///
/// Inline tags are stripped and the repeated lines of rolling
/// auto-generated captions are collapsed.
pub fn parse_vtt(content: &str) -> Transcript {
    let mut cues = Vec::new();
    let mut current_start = 0.0;
    let mut last_text = String::new();

    for raw in content.lines() {
        let line = TAG_PATTERN.replace_all(raw.trim(), "").trim().to_string();

        if line.is_empty() || line.starts_with("WEBVTT") {
            continue;
        }

        if let Some(caps) = TS_PATTERN.captures(&line) {
            current_start = clock_to_secs(&caps[1]);
            continue;
        }

        // Header blocks and cue identifiers
        if line.starts_with("Kind:") || line.starts_with("Language:") || line.starts_with("NOTE") {
            continue;
        }
        if line.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        if line != last_text {
            cues.push(Cue {
                start: current_start,
                text: line.clone(),
            });
            last_text = line;
        }
    }

    Transcript { cues }
}

/// Read and parse a VTT file.
pub async fn load_transcript(path: impl AsRef<Path>) -> MediaResult<Transcript> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    Ok(parse_vtt(&content))
}

fn clock_to_secs(clock: &str) -> f64 {
    clock
        .split(':')
        .filter_map(|p| p.parse::<f64>().ok())
        .fold(0.0, |acc, v| acc * 60.0 + v)
}
