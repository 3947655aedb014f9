//! VVP sub-scores and the weighted composite.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Weight of narrative retention in the composite.
pub const NARRATIVE_WEIGHT: f64 = 0.40;
/// Weight of hook effectiveness in the composite.
pub const HOOK_WEIGHT: f64 = 0.30;
/// Weight of engagement signals in the composite.
pub const ENGAGEMENT_WEIGHT: f64 = 0.25;
/// Weight of technical quality in the composite.
pub const TECHNICAL_WEIGHT: f64 = 0.05;

/// Lower bound of every score.
pub const SCORE_MIN: f64 = 0.0;
/// Upper bound of every score.
pub const SCORE_MAX: f64 = 100.0;

/// The four qualitative pillars, each on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SubScoreSet {
    pub narrative: f64,
    pub hook: f64,
    pub engagement: f64,
    pub technical: f64,
}

impl SubScoreSet {
    /// Field name and value pairs, in weight order.
    pub fn fields(&self) -> [(&'static str, f64); 4] {
        [
            ("narrative", self.narrative),
            ("hook", self.hook),
            ("engagement", self.engagement),
            ("technical", self.technical),
        ]
    }
}

/// One pillar of the breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeightedSubScore {
    pub score: f64,
    pub weight: f64,
    /// `score * weight`
    pub contribution: f64,
}

impl WeightedSubScore {
    pub fn new(score: f64, weight: f64) -> Self {
        Self {
            score,
            weight,
            contribution: score * weight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreBreakdown {
    pub narrative: WeightedSubScore,
    pub hook: WeightedSubScore,
    pub engagement: WeightedSubScore,
    pub technical: WeightedSubScore,
}

/// Final VVP score with the per-pillar breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompositeScore {
    /// Weighted sum clamped to [0, 100], rounded to 2 decimals
    pub value: f64,
    pub breakdown: ScoreBreakdown,
}
