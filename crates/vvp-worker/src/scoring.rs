//! Composite VVP scoring.
//!
//! The composite is a fixed weighted sum of four 0-100 sub-scores:
//!
//! | pillar     | weight |
//! |------------|--------|
//! | narrative  | 0.40   |
//! | hook       | 0.30   |
//! | engagement | 0.25   |
//! | technical  | 0.05   |
//!
//! Sub-scores come from the AI's 0-10 KPI grades scaled by 10.

use vvp_models::qualitative::KPI_SCALE_MAX;
use vvp_models::score::{
    ENGAGEMENT_WEIGHT, HOOK_WEIGHT, NARRATIVE_WEIGHT, SCORE_MAX, SCORE_MIN, TECHNICAL_WEIGHT,
};
use vvp_models::{CompositeScore, Kpi, QualitativeAnalysis, ScoreBreakdown, SubScoreSet, WeightedSubScore};

use crate::error::{WorkerError, WorkerResult};

/// Build the sub-score set from the AI's KPI grades.
///
/// A KPI without a numeric score is an [`WorkerError::IncompleteAnalysis`];
/// it is never treated as zero.
pub fn sub_scores_from_analysis(analysis: &QualitativeAnalysis) -> WorkerResult<SubScoreSet> {
    Ok(SubScoreSet {
        narrative: scaled_kpi("narrative", analysis.narrative_structure.as_ref())?,
        hook: scaled_kpi("hook", analysis.hook_effectiveness.as_ref())?,
        engagement: scaled_kpi("engagement", analysis.emotional_engagement.as_ref())?,
        technical: scaled_kpi("technical", analysis.technical_quality.as_ref())?,
    })
}

fn scaled_kpi(field: &str, kpi: Option<&Kpi>) -> WorkerResult<f64> {
    let score = kpi
        .and_then(|k| k.score)
        .ok_or_else(|| WorkerError::incomplete_analysis(field))?;
    Ok(score * (SCORE_MAX / KPI_SCALE_MAX))
}

/// Reject NaN and anything outside [0, 100].
pub fn validate_sub_scores(scores: &SubScoreSet) -> WorkerResult<()> {
    for (field, value) in scores.fields() {
        if !(SCORE_MIN..=SCORE_MAX).contains(&value) {
            return Err(WorkerError::score_out_of_range(field, value));
        }
    }
    Ok(())
}

/// Weighted composite of a validated sub-score set.
pub fn compute_composite(scores: &SubScoreSet) -> WorkerResult<CompositeScore> {
    validate_sub_scores(scores)?;

    let breakdown = ScoreBreakdown {
        narrative: WeightedSubScore::new(scores.narrative, NARRATIVE_WEIGHT),
        hook: WeightedSubScore::new(scores.hook, HOOK_WEIGHT),
        engagement: WeightedSubScore::new(scores.engagement, ENGAGEMENT_WEIGHT),
        technical: WeightedSubScore::new(scores.technical, TECHNICAL_WEIGHT),
    };

    let total = breakdown.narrative.contribution
        + breakdown.hook.contribution
        + breakdown.engagement.contribution
        + breakdown.technical.contribution;

    Ok(CompositeScore {
        value: round2(total.clamp(SCORE_MIN, SCORE_MAX)),
        breakdown,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(narrative: f64, hook: f64, engagement: f64, technical: f64) -> SubScoreSet {
        SubScoreSet {
            narrative,
            hook,
            engagement,
            technical,
        }
    }

    fn graded(n: f64, h: f64, e: f64, t: f64) -> QualitativeAnalysis {
        QualitativeAnalysis {
            narrative_structure: Some(Kpi::scored(n, "arc")),
            hook_effectiveness: Some(Kpi::scored(h, "opening")),
            emotional_engagement: Some(Kpi::scored(e, "comments")),
            technical_quality: Some(Kpi::scored(t, "audio")),
            ..Default::default()
        }
    }

    #[test]
    fn test_weighted_sum() {
        let composite = compute_composite(&scores(88.0, 82.0, 85.0, 85.0)).unwrap();
        assert!((composite.value - 85.3).abs() < 1e-9);
        assert!((composite.breakdown.narrative.contribution - 35.2).abs() < 1e-9);
        assert_eq!(composite.breakdown.technical.weight, 0.05);
    }

    #[test]
    fn test_bounds() {
        assert_eq!(compute_composite(&scores(0.0, 0.0, 0.0, 0.0)).unwrap().value, 0.0);
        assert_eq!(
            compute_composite(&scores(100.0, 100.0, 100.0, 100.0)).unwrap().value,
            100.0
        );
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = compute_composite(&scores(88.0, 101.0, 85.0, 85.0)).unwrap_err();
        match err {
            WorkerError::ScoreOutOfRange { field, value } => {
                assert_eq!(field, "hook");
                assert_eq!(value, 101.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(
            compute_composite(&scores(-1.0, 50.0, 50.0, 50.0)),
            Err(WorkerError::ScoreOutOfRange { .. })
        ));
        assert!(matches!(
            compute_composite(&scores(50.0, 50.0, f64::NAN, 50.0)),
            Err(WorkerError::ScoreOutOfRange { .. })
        ));
    }

    #[test]
    fn test_kpis_scaled_to_hundred() {
        let sub = sub_scores_from_analysis(&graded(8.8, 8.2, 8.5, 8.5)).unwrap();
        assert!((sub.narrative - 88.0).abs() < 1e-9);
        assert!((sub.hook - 82.0).abs() < 1e-9);

        let composite = compute_composite(&sub).unwrap();
        assert!((composite.value - 85.3).abs() < 1e-9);
    }

    #[test]
    fn test_missing_kpi_is_incomplete() {
        let mut analysis = graded(8.0, 7.0, 6.0, 5.0);
        analysis.hook_effectiveness = Some(Kpi {
            score: None,
            reason: Some("could not judge".into()),
        });

        match sub_scores_from_analysis(&analysis).unwrap_err() {
            WorkerError::IncompleteAnalysis(field) => assert_eq!(field, "hook"),
            other => panic!("unexpected error: {other:?}"),
        }

        analysis.hook_effectiveness = Some(Kpi::scored(7.0, "ok"));
        analysis.technical_quality = None;
        assert!(matches!(
            sub_scores_from_analysis(&analysis),
            Err(WorkerError::IncompleteAnalysis(f)) if f == "technical"
        ));
    }

    #[test]
    fn test_kpi_above_scale_rejected() {
        let sub = sub_scores_from_analysis(&graded(11.0, 5.0, 5.0, 5.0)).unwrap();
        assert!(matches!(
            compute_composite(&sub),
            Err(WorkerError::ScoreOutOfRange { field, .. }) if field == "narrative"
        ));
    }
}
