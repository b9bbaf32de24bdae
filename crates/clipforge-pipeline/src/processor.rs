//! Run orchestration.
//!
//! Drives one processing run through its states: `Transcribing →
//! Analyzing → Generating → Done`, or `Error` from any of them. The
//! pipeline itself is pure computation between two collaborator calls
//! (scene analysis up front, one hook request per selected clip), so no
//! locking is needed here.

use tracing::{info, warn};
use validator::Validate;

use clipforge_models::{Clip, ProcessingConfig, ProcessingState, RunStatus, TimedLine};

use crate::chunker::chunk_words;
use crate::error::{PipelineError, PipelineResult};
use crate::gemini::AnalysisClient;
use crate::segmenter::segment_lines;
use crate::selector::{select_top_groups, select_top_scenes, CandidateClip, TARGET_CLIPS};

/// Fallback target duration when no length band is configured.
const DEFAULT_TARGET_DURATION: f64 = 45.0;

/// Maximum excerpt length handed to the hook collaborator.
const HOOK_EXCERPT_CHARS: usize = 200;

/// Observer of run progress snapshots.
pub type StateObserver = Box<dyn Fn(ProcessingState) + Send + Sync>;

/// Orchestrates one processing run from source video to final clip set.
pub struct VideoProcessor {
    client: AnalysisClient,
    config: ProcessingConfig,
    observer: Option<StateObserver>,
}

impl VideoProcessor {
    pub fn new(client: AnalysisClient, config: ProcessingConfig) -> Self {
        Self {
            client,
            config,
            observer: None,
        }
    }

    /// Attach a progress observer.
    pub fn with_observer(mut self, observer: StateObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Process one video into its ranked clip set.
    ///
    /// Fails as a whole: any collaborator or selection error becomes the
    /// run's single terminal error state, with no partial results.
    pub async fn run(&self, video_filename: &str, duration: f64) -> PipelineResult<Vec<Clip>> {
        match self.run_inner(video_filename, duration).await {
            Ok(clips) => {
                self.emit(ProcessingState::progress(
                    RunStatus::Done,
                    "Your clips are ready!",
                    100.0,
                ));
                Ok(clips)
            }
            Err(e) => {
                warn!(error = %e, "processing run failed");
                self.emit(ProcessingState::error(format!("Error: {e}")));
                Err(e)
            }
        }
    }

    async fn run_inner(&self, video_filename: &str, duration: f64) -> PipelineResult<Vec<Clip>> {
        self.config
            .validate()
            .map_err(|e| PipelineError::invalid_input(e.to_string()))?;
        if duration <= 0.0 {
            return Err(PipelineError::invalid_input("video has no duration"));
        }

        let caption_language = self.config.caption_language();
        let topic = video_topic(video_filename);
        let band = self.config.clip_length.band();
        let (min, max) = band.unwrap_or((30.0, 90.0));

        self.emit(ProcessingState::progress(
            RunStatus::Transcribing,
            format!("Generating transcript in {}...", caption_language.as_str()),
            10.0,
        ));
        let scenes = self
            .client
            .analyze_video_content(
                &topic,
                duration,
                self.config.video_language,
                caption_language,
                (min, max),
            )
            .await?;

        self.emit(ProcessingState::progress(
            RunStatus::Analyzing,
            "Analyzing for engaging moments...",
            40.0,
        ));
        let candidates = self.pick_candidates(&scenes, band)?;
        if candidates.is_empty() {
            return Err(PipelineError::NoClipWorthyContent);
        }

        self.emit(ProcessingState::progress(
            RunStatus::Generating,
            "Creating short clips...",
            70.0,
        ));
        let total = candidates.len();
        let mut clips = Vec::with_capacity(total);
        for (i, candidate) in candidates.into_iter().enumerate() {
            let excerpt: String = candidate.text().chars().take(HOOK_EXCERPT_CHARS).collect();
            // Hook failures are fatal for the whole run.
            let hook = self.client.generate_hook(&excerpt, caption_language).await?;

            let (start, end) = candidate.time_range();
            let transcript = if self.config.template.is_word_highlight() {
                chunk_words(&candidate.lines, self.config.words_per_caption)
            } else {
                candidate.lines
            };

            clips.push(Clip::new(
                i,
                start,
                end,
                hook,
                transcript,
                self.config.template.style(),
            ));
            self.emit(ProcessingState::progress(
                RunStatus::Generating,
                "Creating short clips...",
                70.0 + 30.0 * (i + 1) as f64 / total as f64,
            ));
        }

        info!(clips = clips.len(), "run complete");
        Ok(clips)
    }

    /// Build the candidate set for selection.
    ///
    /// The transcript is re-segmented into the configured length band
    /// and scored; when segmentation yields nothing (or no band is
    /// configured), the raw scene list ranked by virality is the
    /// fallback pool.
    fn pick_candidates(
        &self,
        scenes: &[clipforge_models::Scene],
        band: Option<(f64, f64)>,
    ) -> PipelineResult<Vec<CandidateClip>> {
        if let Some((min, max)) = band {
            let lines: Vec<TimedLine> = scenes
                .iter()
                .flat_map(|s| s.transcript.iter().cloned())
                .collect();
            let groups = segment_lines(&lines, min, max);
            if !groups.is_empty() {
                let target = self
                    .config
                    .clip_length
                    .target_duration()
                    .unwrap_or(DEFAULT_TARGET_DURATION);
                return Ok(select_top_groups(groups, target, TARGET_CLIPS));
            }
            warn!("segmentation yielded no groups, falling back to scene pool");
        }

        // A scene without caption lines cannot be rendered; drop those
        // before ranking so they never occupy a top-K slot.
        let usable: Vec<clipforge_models::Scene> = scenes
            .iter()
            .filter(|s| !s.transcript.is_empty())
            .cloned()
            .collect();
        let ranked = select_top_scenes(&usable, band, TARGET_CLIPS)?;
        Ok(ranked
            .into_iter()
            .map(|s| {
                let score = s.virality_score;
                CandidateClip {
                    lines: s.transcript,
                    score,
                }
            })
            .collect())
    }

    fn emit(&self, state: ProcessingState) {
        if let Some(observer) = &self.observer {
            observer(state);
        }
    }
}

/// Derive a human-readable topic from a video file name.
pub fn video_topic(filename: &str) -> String {
    let stem = filename.rsplit_once('.').map(|(s, _)| s).unwrap_or(filename);
    stem.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipforge_models::{CaptionTemplate, Scene, Word};
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gemini_body(inner: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": { "parts": [{ "text": inner }] }
            }]
        })
    }

    /// One scene, 0-40s, five 8s lines with word timestamps.
    fn scenes_json() -> String {
        let lines: Vec<serde_json::Value> = (0..5)
            .map(|i| {
                let start = i as f64 * 8.0;
                json!({
                    "start": start,
                    "end": start + 8.0,
                    "text": format!("word{} more{}", i, i),
                    "emoji": "🔥",
                    "words": [
                        {"start": start, "end": start + 4.0, "text": format!("word{i}")},
                        {"start": start + 4.0, "end": start + 8.0, "text": format!("more{i}")}
                    ]
                })
            })
            .collect();
        json!({
            "scenes": [{
                "startTime": 0.0,
                "endTime": 40.0,
                "topic": "hooks",
                "summary": "why hooks matter",
                "viralityScore": 8.0,
                "reasoning": "strong",
                "transcript": lines
            }]
        })
        .to_string()
    }

    async fn mock_collaborators(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-pro:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(&scenes_json())))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body("A great hook")))
            .mount(server)
            .await;
    }

    fn observer(states: Arc<Mutex<Vec<ProcessingState>>>) -> StateObserver {
        Box::new(move |state| states.lock().unwrap().push(state))
    }

    #[tokio::test]
    async fn test_run_produces_clips_and_state_sequence() {
        let server = MockServer::start().await;
        mock_collaborators(&server).await;

        let states = Arc::new(Mutex::new(Vec::new()));
        let processor = VideoProcessor::new(
            AnalysisClient::with_base_url("test-key", server.uri()),
            ProcessingConfig::default(),
        )
        .with_observer(observer(states.clone()));

        let clips = processor.run("my_cool_video.mp4", 120.0).await.unwrap();
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].hook, "A great hook");
        assert_eq!(clips[0].start_time, 0.0);
        assert_eq!(clips[0].end_time, 40.0);

        let states = states.lock().unwrap();
        assert_eq!(states.first().unwrap().status, RunStatus::Transcribing);
        assert_eq!(states.last().unwrap().status, RunStatus::Done);
        assert!(states
            .windows(2)
            .all(|w| w[0].progress <= w[1].progress));
        assert!((states.last().unwrap().progress - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_karaoke_template_chunks_transcript() {
        let server = MockServer::start().await;
        mock_collaborators(&server).await;

        let config = ProcessingConfig {
            template: CaptionTemplate::Karaoke,
            words_per_caption: 3,
            ..Default::default()
        };
        let processor =
            VideoProcessor::new(AnalysisClient::with_base_url("test-key", server.uri()), config);

        let clips = processor.run("demo.mp4", 120.0).await.unwrap();
        // 10 words chunked in threes: [3, 3, 3, 1].
        let sizes: Vec<usize> = clips[0].transcript.iter().map(|l| l.words.len()).collect();
        assert_eq!(sizes, vec![3, 3, 3, 1]);
    }

    #[tokio::test]
    async fn test_hook_failure_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-pro:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(&scenes_json())))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model overloaded"))
            .mount(&server)
            .await;

        let states = Arc::new(Mutex::new(Vec::new()));
        let processor = VideoProcessor::new(
            AnalysisClient::with_base_url("test-key", server.uri()),
            ProcessingConfig::default(),
        )
        .with_observer(observer(states.clone()));

        let result = processor.run("demo.mp4", 120.0).await;
        assert!(matches!(result, Err(PipelineError::AiFailed(_))));
        assert_eq!(states.lock().unwrap().last().unwrap().status, RunStatus::Error);
    }

    #[tokio::test]
    async fn test_empty_scenes_is_no_content_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(gemini_body("{\"scenes\": []}")),
            )
            .mount(&server)
            .await;

        let processor = VideoProcessor::new(
            AnalysisClient::with_base_url("test-key", server.uri()),
            ProcessingConfig::default(),
        );
        let result = processor.run("demo.mp4", 20.0).await;
        assert!(matches!(result, Err(PipelineError::NoClipWorthyContent)));
    }

    #[tokio::test]
    async fn test_zero_duration_rejected() {
        let processor = VideoProcessor::new(
            AnalysisClient::with_base_url("test-key", "http://localhost:1"),
            ProcessingConfig::default(),
        );
        let result = processor.run("demo.mp4", 0.0).await;
        assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_original_length_uses_scene_pool() {
        let server = MockServer::start().await;
        mock_collaborators(&server).await;

        let config = ProcessingConfig {
            clip_length: clipforge_models::ClipLength::Original,
            ..Default::default()
        };
        let processor =
            VideoProcessor::new(AnalysisClient::with_base_url("test-key", server.uri()), config);

        let clips = processor.run("demo.mp4", 120.0).await.unwrap();
        assert_eq!(clips.len(), 1);
        // Scene timing flows through unchanged.
        assert_eq!(clips[0].end_time, 40.0);
    }

    #[test]
    fn test_video_topic_from_filename() {
        assert_eq!(video_topic("my_cool_video.mp4"), "my cool video");
        assert_eq!(video_topic("talk.mov"), "talk");
        assert_eq!(video_topic("no extension"), "no extension");
    }

    #[test]
    fn test_scene_fallback_skips_empty_transcripts() {
        let with_lines = Scene {
            start_time: 0.0,
            end_time: 40.0,
            topic: "t".to_string(),
            summary: "s".to_string(),
            virality_score: 7.0,
            reasoning: "r".to_string(),
            transcript: vec![TimedLine {
                text: "hello".to_string(),
                start: 0.0,
                end: 2.0,
                words: vec![Word {
                    text: "hello".to_string(),
                    start: 0.0,
                    end: 2.0,
                }],
                emoji: None,
            }],
        };
        let without_lines = Scene {
            start_time: 40.0,
            end_time: 80.0,
            virality_score: 9.0,
            transcript: vec![],
            ..with_lines.clone()
        };
        let processor = VideoProcessor::new(
            AnalysisClient::with_base_url("k", "http://localhost:1"),
            ProcessingConfig {
                clip_length: clipforge_models::ClipLength::Original,
                ..Default::default()
            },
        );
        let candidates = processor
            .pick_candidates(&[with_lines, without_lines], None)
            .unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].lines[0].text, "hello");
    }

    #[test]
    fn test_low_ranked_usable_scene_survives_empty_high_scorers() {
        let usable = Scene {
            start_time: 0.0,
            end_time: 40.0,
            topic: "t".to_string(),
            summary: "s".to_string(),
            virality_score: 2.0,
            reasoning: "r".to_string(),
            transcript: vec![TimedLine::new("kept line", 0.0, 2.0)],
        };
        // Enough empty-transcript scenes to fill every selection slot
        // ahead of the usable one.
        let mut scenes: Vec<Scene> = (0..TARGET_CLIPS)
            .map(|i| Scene {
                start_time: 40.0 + i as f64 * 40.0,
                end_time: 80.0 + i as f64 * 40.0,
                virality_score: 9.0,
                transcript: vec![],
                ..usable.clone()
            })
            .collect();
        scenes.push(usable);

        let processor = VideoProcessor::new(
            AnalysisClient::with_base_url("k", "http://localhost:1"),
            ProcessingConfig {
                clip_length: clipforge_models::ClipLength::Original,
                ..Default::default()
            },
        );
        let candidates = processor.pick_candidates(&scenes, None).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].lines[0].text, "kept line");
    }
}
