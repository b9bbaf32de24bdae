//! Transcode job runner.
//!
//! Drives one render plan through the engine:
//! `Idle → StagingInputs → Executing → Extracting → CleaningUp →
//! {Succeeded | Failed}`. Cleanup of every staged working-storage entry
//! runs on every exit path; the engine's working storage is a shared,
//! bounded resource reused across sequential jobs.

use std::path::PathBuf;

use metrics::counter;
use tracing::{debug, info, warn};

use crate::engine::{EngineService, TranscodeEngine};
use crate::error::{MediaError, MediaResult};
use crate::plan::{InputKind, RenderPlan, FONT_NAME, SUBTITLES_NAME};
use crate::progress::ProgressCallback;

/// States of one transcode job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    StagingInputs,
    Executing,
    Extracting,
    CleaningUp,
    Succeeded,
    Failed,
}

impl JobState {
    /// Terminal state for a finished job.
    pub fn terminal(success: bool) -> Self {
        if success {
            JobState::Succeeded
        } else {
            JobState::Failed
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }
}

/// Local files staged into working storage for one job.
#[derive(Debug, Clone)]
pub struct RenderAssets {
    /// Source video
    pub video: PathBuf,
    /// Watermark image, required iff the plan declares one
    pub watermark: Option<PathBuf>,
    /// Music bed, required iff the plan declares one
    pub music: Option<PathBuf>,
    /// Font resource for drawtext overlays
    pub font: PathBuf,
}

/// Runs render plans against a shared engine, one job at a time.
pub struct TranscodeJobRunner<'a, E> {
    service: &'a EngineService<E>,
}

impl<'a, E: TranscodeEngine> TranscodeJobRunner<'a, E> {
    pub fn new(service: &'a EngineService<E>) -> Self {
        Self { service }
    }

    /// Execute one plan and return the output artifact bytes.
    ///
    /// Per-job execution failures are surfaced, not retried. Staged
    /// entries are removed before returning on both success and failure;
    /// cleanup errors are logged and never mask the triggering error.
    pub async fn run(
        &self,
        plan: &RenderPlan,
        assets: &RenderAssets,
        progress: Option<ProgressCallback>,
    ) -> MediaResult<Vec<u8>> {
        self.service.ensure_loaded().await?;
        let _job = self.service.lock_job().await;

        let mut state = JobState::Idle;
        let mut staged: Vec<String> = Vec::new();

        let result = self
            .execute(plan, assets, progress, &mut state, &mut staged)
            .await;

        state = JobState::CleaningUp;
        debug!(?state, staged = staged.len(), "cleaning up working storage");
        self.cleanup(&staged, &plan.output).await;

        state = JobState::terminal(result.is_ok());
        match &result {
            Ok(artifact) => {
                counter!("clipforge_transcode_jobs_total", "status" => "succeeded").increment(1);
                info!(?state, bytes = artifact.len(), "transcode job succeeded");
            }
            Err(e) => {
                counter!("clipforge_transcode_jobs_total", "status" => "failed").increment(1);
                warn!(?state, error = %e, "transcode job failed");
            }
        }
        result
    }

    async fn execute(
        &self,
        plan: &RenderPlan,
        assets: &RenderAssets,
        progress: Option<ProgressCallback>,
        state: &mut JobState,
        staged: &mut Vec<String>,
    ) -> MediaResult<Vec<u8>> {
        let engine = self.service.engine();

        *state = JobState::StagingInputs;
        for input in &plan.inputs {
            let path = match input.kind {
                InputKind::SourceVideo => Some(&assets.video),
                InputKind::Watermark => assets.watermark.as_ref(),
                InputKind::Music => assets.music.as_ref(),
            }
            .ok_or_else(|| {
                MediaError::staging_failed(&input.name, "no local asset for declared input")
            })?;
            let data = tokio::fs::read(path)
                .await
                .map_err(|e| MediaError::staging_failed(&input.name, e.to_string()))?;
            engine.write_file(&input.name, &data).await?;
            staged.push(input.name.clone());
        }

        engine
            .write_file(SUBTITLES_NAME, plan.subtitles.as_bytes())
            .await?;
        staged.push(SUBTITLES_NAME.to_string());

        let font = tokio::fs::read(&assets.font)
            .await
            .map_err(|e| MediaError::staging_failed(FONT_NAME, e.to_string()))?;
        engine.write_file(FONT_NAME, &font).await?;
        staged.push(FONT_NAME.to_string());

        *state = JobState::Executing;
        engine.exec(&plan.build_args(), progress).await?;

        *state = JobState::Extracting;
        engine.read_file(&plan.output).await
    }

    /// Remove every staged entry plus the output artifact, best-effort.
    async fn cleanup(&self, staged: &[String], output: &str) {
        let engine = self.service.engine();
        for name in staged.iter().map(String::as_str).chain([output]) {
            if let Err(e) = engine.delete_file(name).await {
                warn!(name, error = %e, "failed to remove staged file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::build_render_plan;
    use crate::testing::MockEngine;
    use clipforge_models::{CaptionTemplate, Clip, ProcessingConfig, TimedLine};
    use std::io::Write;

    fn write_temp(dir: &tempfile::TempDir, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(data).unwrap();
        path
    }

    fn test_setup(dir: &tempfile::TempDir) -> (Clip, ProcessingConfig, RenderAssets) {
        let clip = Clip::new(
            0,
            5.0,
            35.0,
            "A hook",
            vec![TimedLine::new("line", 5.0, 8.0)],
            CaptionTemplate::Hormozi1.style(),
        );
        let assets = RenderAssets {
            video: write_temp(dir, "source.mp4", b"video-bytes"),
            watermark: None,
            music: None,
            font: write_temp(dir, "font.ttf", b"font-bytes"),
        };
        (clip, ProcessingConfig::default(), assets)
    }

    #[tokio::test]
    async fn test_success_leaves_storage_empty() {
        let dir = tempfile::tempdir().unwrap();
        let (clip, config, assets) = test_setup(&dir);
        let plan = build_render_plan(&clip, &config).unwrap();

        let service = EngineService::new(MockEngine::default());
        let runner = TranscodeJobRunner::new(&service);
        let artifact = runner.run(&plan, &assets, None).await.unwrap();

        assert_eq!(artifact, b"artifact");
        assert!(service.engine().storage_names().is_empty());
    }

    #[tokio::test]
    async fn test_exec_failure_still_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let (clip, config, assets) = test_setup(&dir);
        let plan = build_render_plan(&clip, &config).unwrap();

        let engine = MockEngine::default();
        engine.fail_on_exec(0);
        let service = EngineService::new(engine);
        let runner = TranscodeJobRunner::new(&service);

        let result = runner.run(&plan, &assets, None).await;
        assert!(matches!(result, Err(MediaError::ExecFailed { .. })));
        assert!(service.engine().storage_names().is_empty());
    }

    #[tokio::test]
    async fn test_staging_failure_cleans_partial_state() {
        let dir = tempfile::tempdir().unwrap();
        let (clip, mut config, assets) = test_setup(&dir);
        // Declare a watermark input without providing the asset.
        config.watermark_file = Some(PathBuf::from("declared.png"));
        let plan = build_render_plan(&clip, &config).unwrap();

        let service = EngineService::new(MockEngine::default());
        let runner = TranscodeJobRunner::new(&service);

        let result = runner.run(&plan, &assets, None).await;
        assert!(matches!(result, Err(MediaError::StagingFailed { .. })));
        // The already-staged source video was removed again.
        assert!(service.engine().storage_names().is_empty());
        assert_eq!(service.engine().exec_calls(), 0);
    }

    #[test]
    fn test_terminal_state_matches_outcome() {
        assert_eq!(JobState::terminal(true), JobState::Succeeded);
        assert_eq!(JobState::terminal(false), JobState::Failed);
        assert!(JobState::Succeeded.is_terminal());
        assert!(!JobState::CleaningUp.is_terminal());
    }

    #[tokio::test]
    async fn test_exec_receives_plan_args() {
        let dir = tempfile::tempdir().unwrap();
        let (clip, config, assets) = test_setup(&dir);
        let plan = build_render_plan(&clip, &config).unwrap();

        let service = EngineService::new(MockEngine::default());
        let runner = TranscodeJobRunner::new(&service);
        runner.run(&plan, &assets, None).await.unwrap();

        let recorded = service.engine().recorded_args();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0], plan.build_args());
    }
}
