//! Qualitative analysis as returned by the generative-AI collaborator.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::SemanticHotspot;

/// Scale the AI grades each KPI on.
pub const KPI_SCALE_MAX: f64 = 10.0;

/// One graded KPI. `score` is on a 0-10 scale and may be missing when the
/// model skipped it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Kpi {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl Kpi {
    pub fn scored(score: f64, reason: impl Into<String>) -> Self {
        Self {
            score: Some(score),
            reason: Some(reason.into()),
        }
    }
}

/// The AI's own pick for the best clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClipSuggestion {
    /// `MM:SS-MM:SS`
    pub time_range: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QualitativeAnalysis {
    #[serde(default)]
    pub narrative_structure: Option<Kpi>,
    #[serde(default)]
    pub hook_effectiveness: Option<Kpi>,
    #[serde(default)]
    pub emotional_engagement: Option<Kpi>,
    #[serde(default)]
    pub technical_quality: Option<Kpi>,
    #[serde(default)]
    pub dominant_emotion: Option<String>,
    #[serde(default)]
    pub semantic_hotspots: Vec<SemanticHotspot>,
    #[serde(default)]
    pub golden_clip_suggestion: Option<ClipSuggestion>,
    #[serde(default)]
    pub summary: Option<String>,
    /// Model that produced the analysis
    #[serde(default)]
    pub model: Option<String>,
}
