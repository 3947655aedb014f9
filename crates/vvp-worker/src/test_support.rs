//! Fixtures shared by the unit tests.

use chrono::Utc;
use vvp_models::{
    AnalysisResult, AudioFeatures, ClipSuggestion, Comment, ExcitementKind, ExcitementPoint, Kpi,
    PitchStats, QualitativeAnalysis, SemanticHotspot, SubScoreSet, TechnicalAssessment,
    VideoInfo, VolumeStats,
};

use crate::engagement::{analyze_sentiment, engagement_metrics};
use crate::scoring::compute_composite;

/// Video with three mentions of the 01:30 bucket and one of 03:10.
pub fn sample_video(video_id: &str) -> VideoInfo {
    VideoInfo {
        video_id: video_id.to_string(),
        title: "Sample video".to_string(),
        description: "A test upload".to_string(),
        view_count: 10_000,
        like_count: 800,
        comment_count: 200,
        duration_iso: "PT3M32S".to_string(),
        duration_secs: 212,
        comments: vec![
            Comment::new("alice", "1:30 最高のシーン", 10),
            Comment::new("bob", "1:30 amazing", 5),
            Comment::new("carol", "1:35 great moment", 2),
            Comment::new("dave", "3:10 hmm", 0),
            Comment::new("erin", "first", 0),
        ],
        ..Default::default()
    }
}

/// KPIs 8.8 / 8.2 / 8.5 / 8.5, which score 85.3.
pub fn sample_qualitative() -> QualitativeAnalysis {
    QualitativeAnalysis {
        narrative_structure: Some(Kpi::scored(8.8, "clear arc")),
        hook_effectiveness: Some(Kpi::scored(8.2, "strong opening")),
        emotional_engagement: Some(Kpi::scored(8.5, "viewers were moved")),
        technical_quality: Some(Kpi::scored(8.5, "clean audio")),
        dominant_emotion: Some("感動".to_string()),
        semantic_hotspots: vec![SemanticHotspot {
            time: "01:30".to_string(),
            reason: "climax of the story".to_string(),
        }],
        golden_clip_suggestion: Some(ClipSuggestion {
            time_range: "01:30-02:00".to_string(),
            reason: "emotional peak".to_string(),
        }),
        summary: Some("A well paced video".to_string()),
        model: Some("gemini-test".to_string()),
    }
}

pub fn sample_audio() -> AudioFeatures {
    AudioFeatures {
        duration_secs: 212.0,
        sample_rate: 22_050,
        volume: VolumeStats {
            mean_db: -20.0,
            max_db: -3.0,
            min_db: -60.0,
            variance: 40.0,
            peak_amplitude: 0.7,
            rms: 0.1,
        },
        pitch: PitchStats {
            mean: 0.1,
            variance: 0.01,
            range: 0.3,
        },
        excitement_points: vec![ExcitementPoint {
            time: 190.0,
            duration: 1.0,
            intensity: 0.9,
            kind: ExcitementKind::Volume,
            level: -3.0,
        }],
        excitement_score: 6.5,
    }
}

pub fn sample_result(video_id: &str) -> AnalysisResult {
    let video = sample_video(video_id);
    let composite = compute_composite(&SubScoreSet {
        narrative: 88.0,
        hook: 82.0,
        engagement: 85.0,
        technical: 85.0,
    })
    .unwrap();

    AnalysisResult {
        video_id: video_id.to_string(),
        vvp_score: composite.value,
        composite,
        golden_clip: None,
        clip_candidates: Vec::new(),
        sentiment: analyze_sentiment(&video.comments),
        engagement: engagement_metrics(&video),
        technical_quality: TechnicalAssessment::default(),
        qualitative: sample_qualitative(),
        audio: None,
        content: None,
        video_info: video,
        analyzed_at: Utc::now(),
        processing_time_secs: 1.0,
    }
}
