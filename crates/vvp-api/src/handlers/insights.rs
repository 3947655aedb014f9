//! Partial analyses addressed by video id.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use vvp_models::{ApiKeys, ClipPointsReport, EmotionReport, Provider, VideoInfo};

use crate::error::{ApiError, ApiResult};
use crate::security::validate_video_id;
use crate::state::AppState;

/// Credentials passed as query parameters on GET endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct KeyQuery {
    #[serde(default)]
    pub youtube_api_key: Option<String>,
    #[serde(default)]
    pub gemini_api_key: Option<String>,
}

impl KeyQuery {
    pub fn into_api_keys(self) -> ApiKeys {
        let mut keys = ApiKeys::new();
        if let Some(key) = self.youtube_api_key {
            keys.insert(Provider::Youtube, key);
        }
        if let Some(key) = self.gemini_api_key {
            keys.insert(Provider::Gemini, key);
        }
        keys
    }
}

#[derive(Serialize)]
pub struct ClipPointsResponse {
    pub success: bool,
    pub video_id: String,
    pub clip_analysis: ClipPointsReport,
}

#[derive(Serialize)]
pub struct EmotionAnalysisResponse {
    pub success: bool,
    pub video_id: String,
    pub emotion_analysis: EmotionReport,
}

#[derive(Serialize)]
pub struct VideoInfoResponse {
    pub success: bool,
    pub video_id: String,
    pub video_info: VideoInfo,
}

fn checked_id(video_id: &str) -> ApiResult<()> {
    validate_video_id(video_id).map_err(ApiError::validation)
}

pub async fn clip_points(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Query(query): Query<KeyQuery>,
) -> ApiResult<Json<ClipPointsResponse>> {
    checked_id(&video_id)?;
    let report = state
        .orchestrator
        .clip_points(&video_id, &query.into_api_keys())
        .await?;

    Ok(Json(ClipPointsResponse {
        success: true,
        video_id,
        clip_analysis: report,
    }))
}

pub async fn emotion_analysis(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Query(query): Query<KeyQuery>,
) -> ApiResult<Json<EmotionAnalysisResponse>> {
    checked_id(&video_id)?;
    let report = state
        .orchestrator
        .emotion_analysis(&video_id, &query.into_api_keys())
        .await?;

    Ok(Json(EmotionAnalysisResponse {
        success: true,
        video_id,
        emotion_analysis: report,
    }))
}

pub async fn video_info(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Query(query): Query<KeyQuery>,
) -> ApiResult<Json<VideoInfoResponse>> {
    checked_id(&video_id)?;
    let info = state
        .orchestrator
        .video_info(&video_id, &query.into_api_keys())
        .await?;

    Ok(Json(VideoInfoResponse {
        success: true,
        video_id,
        video_info: info,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_query_ignores_blank_keys() {
        let keys = KeyQuery {
            youtube_api_key: Some("yt".to_string()),
            gemini_api_key: Some("  ".to_string()),
        }
        .into_api_keys();
        assert_eq!(keys.get(Provider::Youtube), Some("yt"));
        assert_eq!(keys.get(Provider::Gemini), None);
    }
}
