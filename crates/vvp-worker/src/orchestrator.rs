//! Analysis pipeline orchestration.
//!
//! Runs acquisition, engagement fetch, audio extraction, qualitative
//! analysis and scoring in sequence. The synchronous path returns the
//! result directly; the asynchronous path registers a job and runs the same
//! pipeline on a spawned task, recording progress in the [`JobRegistry`].
//! The first stage error ends the run; nothing is retried.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, Instrument};
use vvp_models::timestamp::format_clock;
use vvp_models::{
    extract_youtube_id, is_valid_youtube_id, AnalysisJob, AnalysisRequest, AnalysisResult,
    ApiKeys, ClipPointsReport, ContentReport, EmotionReport, ExcitementPoint, JobId, Provider,
    TechnicalAssessment, VideoInfo,
};

use crate::acquisition::{cleanup_workdir, FfmpegAudioExtractor, YtDlpAcquirer};
use crate::clips::{build_candidates, clip_range_label, derive_clips, extract_engagement_hotspots, select_clips};
use crate::config::WorkerConfig;
use crate::content::analyze_content;
use crate::engagement::{analyze_sentiment, engagement_metrics};
use crate::error::{WorkerError, WorkerResult};
use crate::gemini::GeminiClient;
use crate::logging::JobLogger;
use crate::metrics::{self, stage};
use crate::registry::JobRegistry;
use crate::scoring::{compute_composite, sub_scores_from_analysis};
use crate::sources::{
    AcquiredVideo, AudioFeatureExtractor, EngagementFetcher, QualitativeAnalyzer,
    QualitativeInput, VideoAcquirer,
};
use crate::youtube::YouTubeClient;

/// The external systems the pipeline talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub acquirer: Arc<dyn VideoAcquirer>,
    pub fetcher: Arc<dyn EngagementFetcher>,
    pub audio: Arc<dyn AudioFeatureExtractor>,
    pub analyzer: Arc<dyn QualitativeAnalyzer>,
}

impl Collaborators {
    /// yt-dlp, YouTube Data API, FFmpeg and Gemini, as configured.
    pub fn from_config(config: &WorkerConfig) -> Self {
        Self {
            acquirer: Arc::new(YtDlpAcquirer::new(
                config.work_dir.clone(),
                config.ytdlp_cookies_file.clone(),
            )),
            fetcher: Arc::new(YouTubeClient::new(
                config.youtube_api_base.clone(),
                config.max_comments,
            )),
            audio: Arc::new(FfmpegAudioExtractor),
            analyzer: Arc::new(GeminiClient::new(
                config.gemini_api_base.clone(),
                config.gemini_models.clone(),
                config.transcript_char_limit,
            )),
        }
    }
}

/// Where stage progress goes. Synchronous runs only log it.
enum Progress<'a> {
    Detached,
    Job {
        registry: &'a JobRegistry,
        id: &'a JobId,
        logger: &'a JobLogger,
    },
}

impl Progress<'_> {
    async fn report(&self, progress: u8, step: &str, thought: Option<String>) {
        match self {
            Progress::Detached => debug!(progress, step, "Pipeline progress"),
            Progress::Job {
                registry,
                id,
                logger,
            } => {
                logger.log_progress(&format!("{}% {}", progress, step));
                if let Err(e) = registry.record_progress(id, progress, step, thought).await {
                    logger.log_warning(&format!("Dropping progress update: {}", e));
                }
            }
        }
    }
}

/// Runs analyses and owns the async job registry.
#[derive(Clone)]
pub struct Orchestrator {
    config: Arc<WorkerConfig>,
    registry: JobRegistry,
    collaborators: Collaborators,
}

impl Orchestrator {
    /// Orchestrator backed by the real external tools and APIs.
    pub fn new(config: WorkerConfig) -> Self {
        let collaborators = Collaborators::from_config(&config);
        Self::with_collaborators(config, collaborators)
    }

    pub fn with_collaborators(config: WorkerConfig, collaborators: Collaborators) -> Self {
        Self {
            config: Arc::new(config),
            registry: JobRegistry::new(),
            collaborators,
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Run the full pipeline and wait for the result.
    pub async fn analyze(&self, request: &AnalysisRequest) -> WorkerResult<AnalysisResult> {
        let started = Instant::now();
        let result = self.run_pipeline(request, &Progress::Detached).await;
        metrics::record_analysis_duration("sync", started.elapsed().as_secs_f64());
        result
    }

    /// Register a pending job and run the pipeline in the background.
    ///
    /// Requests missing a credential are rejected before a job exists.
    pub async fn submit(&self, request: AnalysisRequest) -> WorkerResult<JobId> {
        self.check_credentials(&request.api_keys)?;

        let job = self.registry.create().await;
        metrics::record_job_submitted();

        let this = self.clone();
        let id = job.id.clone();
        let logger = JobLogger::new(&id, "integrated_analysis");
        let handle = tokio::spawn(
            async move { this.run_job(id, request).await }.instrument(logger.create_span()),
        );

        // Fail the job if its task panics.
        let registry = self.registry.clone();
        let id = job.id.clone();
        tokio::spawn(async move {
            if let Err(e) = handle.await {
                metrics::record_job_failed();
                logger.log_error(&format!("Job task aborted: {}", e));
                if let Err(update) = registry.fail(&id, format!("analysis aborted: {}", e)).await {
                    logger.log_warning(&format!("Failure not recorded: {}", update));
                }
            }
        });

        Ok(job.id)
    }

    /// Both provider keys resolve from the request or the configured defaults.
    pub fn check_credentials(&self, keys: &ApiKeys) -> WorkerResult<()> {
        self.required_key(keys, Provider::Youtube)?;
        self.required_key(keys, Provider::Gemini)?;
        Ok(())
    }

    /// Current snapshot of an async job.
    pub async fn status(&self, id: &JobId) -> WorkerResult<AnalysisJob> {
        self.registry.get(id).await
    }

    pub async fn remove_job(&self, id: &JobId) -> WorkerResult<AnalysisJob> {
        self.registry.remove(id).await
    }

    pub async fn clear_jobs(&self) -> usize {
        self.registry.clear().await
    }

    pub async fn evict_expired(&self, ttl: chrono::Duration) -> usize {
        self.registry.evict_expired(ttl).await
    }

    /// Clip candidates from comments and an AI pass without a transcript.
    pub async fn clip_points(
        &self,
        video_id: &str,
        keys: &ApiKeys,
    ) -> WorkerResult<ClipPointsReport> {
        ensure_video_id(video_id)?;
        let youtube_key = self.required_key(keys, Provider::Youtube)?;
        let gemini_key = self.required_key(keys, Provider::Gemini)?;
        let logger = JobLogger::from_string(video_id, "clip_points");
        logger.log_start("comments and AI hotspots");

        let video = self.fetch_video(video_id, &youtube_key).await?;
        let input = qualitative_input(&video, String::new());
        let qualitative = timed(
            stage::QUALITATIVE,
            self.collaborators.analyzer.analyze(&input, &gemini_key),
        )
        .await?;

        let hotspots = extract_engagement_hotspots(&video.comments);
        let selection = select_clips(build_candidates(
            &hotspots,
            &qualitative.semantic_hotspots,
            &[],
            video.duration_secs as f64,
        ));
        logger.log_completion(&format!("{} candidates", selection.candidates.len()));

        Ok(ClipPointsReport {
            video_id: video_id.to_string(),
            golden_clip: selection.golden,
            clip_candidates: selection.candidates,
            engagement_hotspots: hotspots,
            semantic_hotspots: qualitative.semantic_hotspots,
            ai_suggestion: qualitative.golden_clip_suggestion,
        })
    }

    /// Comment sentiment only. Needs just the YouTube key.
    pub async fn emotion_analysis(
        &self,
        video_id: &str,
        keys: &ApiKeys,
    ) -> WorkerResult<EmotionReport> {
        ensure_video_id(video_id)?;
        let youtube_key = self.required_key(keys, Provider::Youtube)?;
        let video = self.fetch_video(video_id, &youtube_key).await?;

        Ok(EmotionReport {
            video_id: video_id.to_string(),
            sentiment: analyze_sentiment(&video.comments),
            engagement: engagement_metrics(&video),
            title: video.title,
        })
    }

    /// Metadata, statistics and comments.
    pub async fn video_info(&self, video_id: &str, keys: &ApiKeys) -> WorkerResult<VideoInfo> {
        ensure_video_id(video_id)?;
        let youtube_key = self.required_key(keys, Provider::Youtube)?;
        self.fetch_video(video_id, &youtube_key).await
    }

    /// Transcript and audio quality. Always downloads, whatever the options say.
    pub async fn content_analysis(&self, request: &AnalysisRequest) -> WorkerResult<ContentReport> {
        let video_id = extract_youtube_id(&request.url)
            .map_err(|e| WorkerError::invalid_input(e.to_string()))?;
        let logger = JobLogger::from_string(&video_id, "content_analysis");
        logger.log_start(&request.url);

        let acquired = timed(
            stage::ACQUISITION,
            self.collaborators.acquirer.acquire(
                &request.url,
                &video_id,
                request.options.output_format,
            ),
        )
        .await?;

        let audio = timed(
            stage::AUDIO,
            self.collaborators.audio.extract(&acquired.video_path),
        )
        .await;
        self.release_media(&acquired.workdir).await;
        let audio = audio.inspect_err(|e| logger.log_error(&e.to_string()))?;

        let duration_secs = acquired
            .probe
            .as_ref()
            .map(|p| p.duration)
            .filter(|d| *d > 0.0)
            .unwrap_or(audio.duration_secs);

        Ok(ContentReport {
            video_id,
            content: analyze_content(&acquired.transcript.plain_text()),
            technical_quality: technical_assessment(Some(&acquired)),
            audio: Some(audio),
            duration_secs,
        })
    }

    async fn run_job(&self, id: JobId, request: AnalysisRequest) {
        let logger = JobLogger::new(&id, "integrated_analysis");
        logger.log_start(&request.url);

        if let Err(e) = self.registry.start(&id).await {
            logger.log_warning(&format!("Job could not start: {}", e));
            return;
        }

        let started = Instant::now();
        let progress = Progress::Job {
            registry: &self.registry,
            id: &id,
            logger: &logger,
        };

        match self.run_pipeline(&request, &progress).await {
            Ok(result) => {
                let score = result.vvp_score;
                match self.registry.complete(&id, result).await {
                    Ok(()) => {
                        metrics::record_job_completed();
                        logger.log_completion(&format!("VVP score {:.2}", score));
                    }
                    Err(e) => logger.log_warning(&format!("Result discarded: {}", e)),
                }
            }
            Err(e) => {
                metrics::record_job_failed();
                logger.log_error(&e.to_string());
                if let Err(update) = self.registry.fail(&id, e.to_string()).await {
                    logger.log_warning(&format!("Failure not recorded: {}", update));
                }
            }
        }

        metrics::record_analysis_duration("async", started.elapsed().as_secs_f64());
    }

    async fn run_pipeline(
        &self,
        request: &AnalysisRequest,
        progress: &Progress<'_>,
    ) -> WorkerResult<AnalysisResult> {
        let started = Instant::now();

        let youtube_key = self.required_key(&request.api_keys, Provider::Youtube)?;
        let gemini_key = self.required_key(&request.api_keys, Provider::Gemini)?;
        let video_id = extract_youtube_id(&request.url)
            .map_err(|e| WorkerError::invalid_input(e.to_string()))?;

        let acquired = if request.options.download_media {
            progress
                .report(
                    10,
                    "Downloading video",
                    Some(format!("Fetching video {} and its subtitles", video_id)),
                )
                .await;
            let acquired = timed(
                stage::ACQUISITION,
                self.collaborators.acquirer.acquire(
                    &request.url,
                    &video_id,
                    request.options.output_format,
                ),
            )
            .await?;
            progress
                .report(20, "Video downloaded", Some(describe_acquisition(&acquired)))
                .await;
            Some(acquired)
        } else {
            progress
                .report(
                    20,
                    "Skipping download",
                    Some("Media download disabled; working from metadata and comments".into()),
                )
                .await;
            None
        };

        let outcome = self
            .analyze_acquired(&video_id, acquired.as_ref(), &youtube_key, &gemini_key, progress)
            .await;

        if let Some(acquired) = &acquired {
            self.release_media(&acquired.workdir).await;
        }

        let mut result = outcome?;
        result.processing_time_secs = round2(started.elapsed().as_secs_f64());
        progress
            .report(
                100,
                "Analysis complete",
                Some(format!(
                    "Finished in {:.1}s with a VVP score of {:.1}",
                    result.processing_time_secs, result.vvp_score
                )),
            )
            .await;
        Ok(result)
    }

    async fn analyze_acquired(
        &self,
        video_id: &str,
        acquired: Option<&AcquiredVideo>,
        youtube_key: &str,
        gemini_key: &str,
        progress: &Progress<'_>,
    ) -> WorkerResult<AnalysisResult> {
        progress.report(30, "Fetching engagement data", None).await;
        let video = self.fetch_video(video_id, youtube_key).await?;
        progress
            .report(
                40,
                "Engagement data fetched",
                Some(format!(
                    "Read {} comments on \"{}\" ({} views, {} likes)",
                    video.comments.len(),
                    video.title,
                    video.view_count,
                    video.like_count
                )),
            )
            .await;

        let audio = match acquired {
            Some(acquired) => {
                progress.report(45, "Analyzing audio", None).await;
                let features = timed(
                    stage::AUDIO,
                    self.collaborators.audio.extract(&acquired.video_path),
                )
                .await?;
                progress
                    .report(
                        55,
                        "Audio analyzed",
                        Some(format!(
                            "Found {} excitement points, excitement score {:.1}",
                            features.excitement_points.len(),
                            features.excitement_score
                        )),
                    )
                    .await;
                Some(features)
            }
            None => None,
        };

        let transcript = acquired
            .map(|a| a.transcript.timestamped())
            .unwrap_or_default();
        let input = qualitative_input(&video, transcript);

        progress
            .report(
                60,
                "Running AI analysis",
                Some("Grading narrative, hook, emotional engagement and technical quality".into()),
            )
            .await;
        let qualitative = timed(
            stage::QUALITATIVE,
            self.collaborators.analyzer.analyze(&input, gemini_key),
        )
        .await?;
        progress
            .report(80, "AI analysis complete", qualitative.summary.clone())
            .await;

        progress.report(85, "Computing VVP score", None).await;
        let scoring_started = Instant::now();
        let sub_scores = sub_scores_from_analysis(&qualitative)?;
        let composite = compute_composite(&sub_scores)?;

        let excitement: &[ExcitementPoint] = audio
            .as_ref()
            .map(|a| a.excitement_points.as_slice())
            .unwrap_or(&[]);
        let clips = derive_clips(
            &video.comments,
            &qualitative.semantic_hotspots,
            excitement,
            effective_duration(&video, acquired),
        );
        metrics::record_stage_duration(stage::SCORING, scoring_started.elapsed().as_secs_f64());

        let golden = match &clips.golden {
            Some(clip) => format!("golden clip {} ({})", clip_range_label(clip), clip.reason),
            None => "no timestamped comments to build clips from".to_string(),
        };
        progress
            .report(
                95,
                "Scoring complete",
                Some(format!("VVP score {:.1}; {}", composite.value, golden)),
            )
            .await;

        let content = acquired
            .filter(|a| !a.transcript.is_empty())
            .map(|a| analyze_content(&a.transcript.plain_text()));
        let sentiment = analyze_sentiment(&video.comments);
        let engagement = engagement_metrics(&video);

        Ok(AnalysisResult {
            video_id: video_id.to_string(),
            vvp_score: composite.value,
            composite,
            golden_clip: clips.golden,
            clip_candidates: clips.candidates,
            sentiment,
            engagement,
            technical_quality: technical_assessment(acquired),
            qualitative,
            audio,
            content,
            video_info: video,
            analyzed_at: Utc::now(),
            processing_time_secs: 0.0,
        })
    }

    async fn fetch_video(&self, video_id: &str, youtube_key: &str) -> WorkerResult<VideoInfo> {
        timed(
            stage::ENGAGEMENT,
            self.collaborators.fetcher.fetch(video_id, youtube_key),
        )
        .await
    }

    /// Request credential, else the configured default.
    fn required_key(&self, keys: &ApiKeys, provider: Provider) -> WorkerResult<String> {
        keys.or_defaults(&self.config.default_keys)
            .get(provider)
            .map(String::from)
            .ok_or(WorkerError::MissingCredentials(provider))
    }

    async fn release_media(&self, workdir: &Path) {
        if !self.config.keep_media {
            cleanup_workdir(workdir).await;
        }
    }
}

async fn timed<T, F>(stage: &'static str, fut: F) -> WorkerResult<T>
where
    F: Future<Output = WorkerResult<T>>,
{
    let started = Instant::now();
    let result = fut.await;
    metrics::record_stage_duration(stage, started.elapsed().as_secs_f64());
    result
}

fn ensure_video_id(video_id: &str) -> WorkerResult<()> {
    if is_valid_youtube_id(video_id) {
        Ok(())
    } else {
        Err(WorkerError::invalid_input(format!(
            "invalid video id: {}",
            video_id
        )))
    }
}

fn qualitative_input(video: &VideoInfo, transcript: String) -> QualitativeInput {
    QualitativeInput {
        video_id: video.video_id.clone(),
        title: video.title.clone(),
        description: video.description.clone(),
        transcript,
        comments: video.comments.clone(),
        view_count: video.view_count,
        like_count: video.like_count,
        comment_count: video.comment_count,
        duration_secs: video.duration_secs,
    }
}

/// API duration, else the probed one, else unknown (0).
fn effective_duration(video: &VideoInfo, acquired: Option<&AcquiredVideo>) -> f64 {
    if video.duration_secs > 0 {
        return video.duration_secs as f64;
    }
    acquired
        .and_then(|a| a.probe.as_ref())
        .map(|p| p.duration)
        .unwrap_or(0.0)
}

fn describe_acquisition(acquired: &AcquiredVideo) -> String {
    let subtitles = if acquired.has_subtitles {
        format!("{} subtitle cues", acquired.transcript.cues.len())
    } else {
        "no subtitles".to_string()
    };
    match &acquired.probe {
        Some(probe) => format!(
            "Downloaded {} of video ({}x{}), {}",
            format_clock(probe.duration as u64),
            probe.width,
            probe.height,
            subtitles
        ),
        None => format!("Downloaded video, {}", subtitles),
    }
}

fn technical_assessment(acquired: Option<&AcquiredVideo>) -> TechnicalAssessment {
    let Some(acquired) = acquired else {
        return TechnicalAssessment {
            summary: "Media not downloaded; technical details unavailable".to_string(),
            ..Default::default()
        };
    };

    match &acquired.probe {
        Some(probe) => TechnicalAssessment {
            media_downloaded: true,
            width: Some(probe.width),
            height: Some(probe.height),
            fps: Some(probe.fps),
            bitrate: Some(probe.bitrate),
            codec: Some(probe.codec.clone()),
            has_subtitles: acquired.has_subtitles,
            summary: format!(
                "{}x{} @ {:.1}fps, {}, {} kbps{}",
                probe.width,
                probe.height,
                probe.fps,
                probe.codec,
                probe.bitrate / 1000,
                if probe.has_audio { "" } else { ", no audio track" }
            ),
        },
        None => TechnicalAssessment {
            media_downloaded: true,
            has_subtitles: acquired.has_subtitles,
            summary: "Media downloaded; stream details unavailable".to_string(),
            ..Default::default()
        },
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{
        MockAudioFeatureExtractor, MockEngagementFetcher, MockQualitativeAnalyzer,
        MockVideoAcquirer,
    };
    use crate::test_support::{sample_audio, sample_qualitative, sample_video};
    use std::path::PathBuf;
    use std::time::Duration;
    use vvp_media::{parse_vtt, ProbeInfo};
    use vvp_models::{AnalysisOptions, JobStatus, Kpi};

    const URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    fn config() -> WorkerConfig {
        WorkerConfig {
            work_dir: PathBuf::from("/nonexistent/vvp-test"),
            ..Default::default()
        }
    }

    fn request(download_media: bool) -> AnalysisRequest {
        AnalysisRequest {
            url: URL.to_string(),
            api_keys: ApiKeys::new()
                .with(Provider::Youtube, "yt-key")
                .with(Provider::Gemini, "gemini-key"),
            options: AnalysisOptions {
                download_media,
                ..Default::default()
            },
        }
    }

    fn acquired() -> AcquiredVideo {
        AcquiredVideo {
            workdir: PathBuf::from("/nonexistent/vvp-test/dQw4w9WgXcQ"),
            video_path: PathBuf::from("/nonexistent/vvp-test/dQw4w9WgXcQ/dQw4w9WgXcQ.mp4"),
            transcript: parse_vtt(
                "WEBVTT\n\n00:00:01.000 --> 00:00:04.000\n今日の重要なポイントを説明します。\n",
            ),
            probe: Some(ProbeInfo {
                duration: 212.0,
                width: 1920,
                height: 1080,
                fps: 30.0,
                codec: "h264".into(),
                bitrate: 2_500_000,
                has_audio: true,
                ..Default::default()
            }),
            has_subtitles: true,
        }
    }

    fn working_collaborators() -> Collaborators {
        let mut acquirer = MockVideoAcquirer::new();
        acquirer.expect_acquire().returning(|_, _, _| Ok(acquired()));

        let mut fetcher = MockEngagementFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|id, _| Ok(sample_video(id)));

        let mut audio = MockAudioFeatureExtractor::new();
        audio.expect_extract().returning(|_| Ok(sample_audio()));

        let mut analyzer = MockQualitativeAnalyzer::new();
        analyzer
            .expect_analyze()
            .returning(|_, _| Ok(sample_qualitative()));

        Collaborators {
            acquirer: Arc::new(acquirer),
            fetcher: Arc::new(fetcher),
            audio: Arc::new(audio),
            analyzer: Arc::new(analyzer),
        }
    }

    async fn wait_for_terminal(orchestrator: &Orchestrator, id: &JobId) -> AnalysisJob {
        for _ in 0..200 {
            let job = orchestrator.status(id).await.unwrap();
            if job.is_terminal() {
                return job;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("job {} did not finish", id);
    }

    #[tokio::test]
    async fn test_sync_analysis() {
        let orchestrator = Orchestrator::with_collaborators(config(), working_collaborators());
        let result = orchestrator.analyze(&request(true)).await.unwrap();

        assert_eq!(result.video_id, "dQw4w9WgXcQ");
        assert_eq!(result.vvp_score, 85.3);
        assert_eq!(result.composite.value, result.vvp_score);
        assert!(result.audio.is_some());
        assert!(result.content.is_some());
        assert!(result.technical_quality.media_downloaded);
        assert_eq!(result.technical_quality.width, Some(1920));

        let golden = result.golden_clip.unwrap();
        assert_eq!(golden.start_time, 90.0);
        assert_eq!(golden, result.clip_candidates[0]);
        assert!(result.clip_candidates.len() <= 5);
    }

    #[tokio::test]
    async fn test_sync_and_async_agree() {
        let orchestrator = Orchestrator::with_collaborators(config(), working_collaborators());

        let sync = orchestrator.analyze(&request(true)).await.unwrap();
        let id = orchestrator.submit(request(true)).await.unwrap();
        let job = wait_for_terminal(&orchestrator, &id).await;

        assert_eq!(job.status, JobStatus::Complete);
        assert_eq!(job.progress, 100);
        assert!(!job.thoughts.is_empty());

        let asynchronous = job.result.unwrap();
        assert_eq!(asynchronous.composite, sync.composite);
        assert_eq!(asynchronous.golden_clip, sync.golden_clip);
        assert_eq!(asynchronous.clip_candidates, sync.clip_candidates);
    }

    #[tokio::test]
    async fn test_first_stage_error_fails_job() {
        let mut collaborators = working_collaborators();

        let mut fetcher = MockEngagementFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_, _| Err(WorkerError::engagement_failed("quotaExceeded")));
        let mut analyzer = MockQualitativeAnalyzer::new();
        analyzer.expect_analyze().never();
        collaborators.fetcher = Arc::new(fetcher);
        collaborators.analyzer = Arc::new(analyzer);

        let orchestrator = Orchestrator::with_collaborators(config(), collaborators);
        let id = orchestrator.submit(request(true)).await.unwrap();
        let job = wait_for_terminal(&orchestrator, &id).await;

        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.error.unwrap().contains("quotaExceeded"));
        assert!(job.result.is_none());
    }

    #[tokio::test]
    async fn test_incomplete_analysis_is_rejected() {
        let mut collaborators = working_collaborators();
        let mut analyzer = MockQualitativeAnalyzer::new();
        analyzer.expect_analyze().returning(|_, _| {
            let mut analysis = sample_qualitative();
            analysis.hook_effectiveness = Some(Kpi {
                score: None,
                reason: Some("unclear".into()),
            });
            Ok(analysis)
        });
        collaborators.analyzer = Arc::new(analyzer);

        let orchestrator = Orchestrator::with_collaborators(config(), collaborators);
        let err = orchestrator.analyze(&request(false)).await.unwrap_err();
        assert!(matches!(err, WorkerError::IncompleteAnalysis(ref f) if f == "hook"));
    }

    #[tokio::test]
    async fn test_skip_download() {
        let mut collaborators = working_collaborators();
        let mut acquirer = MockVideoAcquirer::new();
        acquirer.expect_acquire().never();
        let mut audio = MockAudioFeatureExtractor::new();
        audio.expect_extract().never();
        let mut analyzer = MockQualitativeAnalyzer::new();
        analyzer
            .expect_analyze()
            .withf(|input, _| input.transcript.is_empty())
            .returning(|_, _| Ok(sample_qualitative()));
        collaborators.acquirer = Arc::new(acquirer);
        collaborators.audio = Arc::new(audio);
        collaborators.analyzer = Arc::new(analyzer);

        let orchestrator = Orchestrator::with_collaborators(config(), collaborators);
        let result = orchestrator.analyze(&request(false)).await.unwrap();

        assert!(result.audio.is_none());
        assert!(result.content.is_none());
        assert!(!result.technical_quality.media_downloaded);
        assert_eq!(result.vvp_score, 85.3);
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let orchestrator = Orchestrator::with_collaborators(config(), working_collaborators());
        let mut request = request(false);
        request.api_keys = ApiKeys::new().with(Provider::Gemini, "gemini-key");

        let err = orchestrator.analyze(&request).await.unwrap_err();
        assert!(matches!(
            err,
            WorkerError::MissingCredentials(Provider::Youtube)
        ));
    }

    #[tokio::test]
    async fn test_submit_rejects_missing_credentials() {
        let orchestrator = Orchestrator::with_collaborators(config(), working_collaborators());
        let mut request = request(false);
        request.api_keys = ApiKeys::new().with(Provider::Youtube, "yt-key");

        let err = orchestrator.submit(request).await.unwrap_err();
        assert!(matches!(err, WorkerError::MissingCredentials(Provider::Gemini)));
        assert_eq!(orchestrator.clear_jobs().await, 0);
    }

    #[tokio::test]
    async fn test_panicking_pipeline_fails_job() {
        let mut collaborators = working_collaborators();
        let mut analyzer = MockQualitativeAnalyzer::new();
        analyzer
            .expect_analyze()
            .returning(|_, _| panic!("analyzer crashed"));
        collaborators.analyzer = Arc::new(analyzer);

        let orchestrator = Orchestrator::with_collaborators(config(), collaborators);
        let id = orchestrator.submit(request(false)).await.unwrap();
        let job = wait_for_terminal(&orchestrator, &id).await;

        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.error.unwrap().contains("analysis aborted"));
    }

    #[tokio::test]
    async fn test_configured_keys_fill_gaps() {
        let mut collaborators = working_collaborators();
        let mut analyzer = MockQualitativeAnalyzer::new();
        analyzer
            .expect_analyze()
            .withf(|_, key| key.to_string() == "env-gemini")
            .times(1)
            .returning(|_, _| Ok(sample_qualitative()));
        collaborators.analyzer = Arc::new(analyzer);

        let mut config = config();
        config.default_keys = ApiKeys::new().with(Provider::Gemini, "env-gemini");
        let orchestrator = Orchestrator::with_collaborators(config, collaborators);

        let mut request = request(false);
        request.api_keys = ApiKeys::new().with(Provider::Youtube, "yt-key");
        assert!(orchestrator.analyze(&request).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let orchestrator = Orchestrator::with_collaborators(config(), working_collaborators());
        let err = orchestrator
            .status(&JobId::from("does-not-exist"))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkerError::JobNotFound(_)));
    }

    #[tokio::test]
    async fn test_clip_points_without_transcript() {
        let mut collaborators = working_collaborators();
        let mut analyzer = MockQualitativeAnalyzer::new();
        analyzer
            .expect_analyze()
            .withf(|input, _| input.transcript.is_empty() && !input.comments.is_empty())
            .returning(|_, _| Ok(sample_qualitative()));
        collaborators.analyzer = Arc::new(analyzer);

        let orchestrator = Orchestrator::with_collaborators(config(), collaborators);
        let report = orchestrator
            .clip_points("dQw4w9WgXcQ", &request(false).api_keys)
            .await
            .unwrap();

        assert_eq!(report.golden_clip.unwrap().start_time, 90.0);
        assert!(!report.engagement_hotspots.is_empty());
        assert!(report.ai_suggestion.is_some());
    }

    #[tokio::test]
    async fn test_emotion_analysis_needs_only_youtube_key() {
        let orchestrator = Orchestrator::with_collaborators(config(), working_collaborators());
        let keys = ApiKeys::new().with(Provider::Youtube, "yt-key");

        let report = orchestrator
            .emotion_analysis("dQw4w9WgXcQ", &keys)
            .await
            .unwrap();
        assert_eq!(report.sentiment.positive_count, 3);

        let err = orchestrator.video_info("bad id", &keys).await.unwrap_err();
        assert!(matches!(err, WorkerError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_content_analysis_forces_download() {
        let orchestrator = Orchestrator::with_collaborators(config(), working_collaborators());
        let report = orchestrator.content_analysis(&request(false)).await.unwrap();

        assert_eq!(report.video_id, "dQw4w9WgXcQ");
        assert_eq!(report.duration_secs, 212.0);
        assert!(report.audio.is_some());
        assert_eq!(report.content.key_phrases.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_and_clear_jobs() {
        let orchestrator = Orchestrator::with_collaborators(config(), working_collaborators());
        let first = orchestrator.submit(request(false)).await.unwrap();
        orchestrator.submit(request(false)).await.unwrap();

        orchestrator.remove_job(&first).await.unwrap();
        assert!(matches!(
            orchestrator.status(&first).await,
            Err(WorkerError::JobNotFound(_))
        ));
        assert_eq!(orchestrator.clear_jobs().await, 1);
    }
}
