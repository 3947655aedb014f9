//! Audio loudness features.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExcitementKind {
    /// Sustained loudness above the adaptive threshold
    Volume,
    /// High zero-crossing rate (pitch proxy)
    Pitch,
}

/// A moment where the audio gets noticeably more intense.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExcitementPoint {
    /// Seconds from the start
    pub time: f64,
    pub duration: f64,
    /// 0.0 - 1.0
    pub intensity: f64,
    pub kind: ExcitementKind,
    /// dB for volume points, Hz for pitch points
    pub level: f64,
}

/// RMS loudness statistics in dBFS (clipped to [-60, 0]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VolumeStats {
    pub mean_db: f64,
    pub max_db: f64,
    pub min_db: f64,
    pub variance: f64,
    pub peak_amplitude: f64,
    pub rms: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PitchStats {
    pub mean: f64,
    pub variance: f64,
    pub range: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AudioFeatures {
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub volume: VolumeStats,
    pub pitch: PitchStats,
    pub excitement_points: Vec<ExcitementPoint>,
    /// 0 - 100
    pub excitement_score: f64,
}
