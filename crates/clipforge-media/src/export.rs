//! Single and batch clip export.
//!
//! Batch export processes clips one at a time in stable order against the
//! shared engine instance (its working storage is a single namespace) and
//! packages the artifacts into one ZIP archive with deterministic entry
//! names. A failed clip aborts the remaining batch.

use std::io::{Cursor, Write};

use tracing::info;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use clipforge_models::{Clip, ProcessingConfig};

use crate::engine::{EngineService, TranscodeEngine};
use crate::error::MediaResult;
use crate::plan::build_render_plan;
use crate::runner::{RenderAssets, TranscodeJobRunner};

/// Export one clip, returning the encoded artifact bytes.
pub async fn export_clip<E: TranscodeEngine>(
    service: &EngineService<E>,
    clip: &Clip,
    config: &ProcessingConfig,
    assets: &RenderAssets,
) -> MediaResult<Vec<u8>> {
    let plan = build_render_plan(clip, config)?;
    let runner = TranscodeJobRunner::new(service);
    runner.run(&plan, assets, None).await
}

/// Export all clips sequentially and package them into a ZIP archive.
///
/// Entries are named `clip_{index:02}_{sanitized_hook}.mp4`. The engine
/// is initialized once and reused across jobs.
pub async fn export_all_clips<E: TranscodeEngine>(
    service: &EngineService<E>,
    clips: &[Clip],
    config: &ProcessingConfig,
    assets: &RenderAssets,
) -> MediaResult<Vec<u8>> {
    service.ensure_loaded().await?;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for (index, clip) in clips.iter().enumerate() {
        info!(clip_id = %clip.id, index, total = clips.len(), "exporting clip");
        let artifact = export_clip(service, clip, config, assets).await?;

        writer.start_file(clip.output_filename(index), options)?;
        writer.write_all(&artifact)?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediaError;
    use crate::testing::MockEngine;
    use clipforge_models::{CaptionTemplate, TimedLine};
    use std::io::Write as _;
    use std::path::PathBuf;
    use zip::ZipArchive;

    fn write_temp(dir: &tempfile::TempDir, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(data).unwrap();
        path
    }

    fn clips() -> Vec<Clip> {
        let style = CaptionTemplate::Hormozi1.style();
        vec![
            Clip::new(
                0,
                0.0,
                30.0,
                "First hook",
                vec![TimedLine::new("a", 0.0, 2.0)],
                style.clone(),
            ),
            Clip::new(
                1,
                40.0,
                70.0,
                "Second hook!",
                vec![TimedLine::new("b", 40.0, 42.0)],
                style,
            ),
        ]
    }

    fn assets(dir: &tempfile::TempDir) -> RenderAssets {
        RenderAssets {
            video: write_temp(dir, "source.mp4", b"video"),
            watermark: None,
            music: None,
            font: write_temp(dir, "font.ttf", b"font"),
        }
    }

    #[tokio::test]
    async fn test_batch_export_archive_names() {
        let dir = tempfile::tempdir().unwrap();
        let service = EngineService::new(MockEngine::default());

        let archive_bytes = export_all_clips(
            &service,
            &clips(),
            &ProcessingConfig::default(),
            &assets(&dir),
        )
        .await
        .unwrap();

        let mut archive = ZipArchive::new(Cursor::new(archive_bytes)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["clip_00_first_hook.mp4", "clip_01_second_hook.mp4"]
        );
        // Engine loaded once for the whole batch.
        assert_eq!(service.engine().load_calls(), 1);
    }

    #[tokio::test]
    async fn test_batch_aborts_on_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let engine = MockEngine::default();
        engine.fail_on_exec(1); // second clip fails
        let service = EngineService::new(engine);

        let result = export_all_clips(
            &service,
            &clips(),
            &ProcessingConfig::default(),
            &assets(&dir),
        )
        .await;

        assert!(matches!(result, Err(MediaError::ExecFailed { .. })));
        assert_eq!(service.engine().exec_calls(), 2);
        // Both jobs' staged files were cleaned up despite the abort.
        assert!(service.engine().storage_names().is_empty());
    }
}
