//! ClipForge one-shot processing binary.
//!
//! Usage: `clipforge <video-path> <duration-seconds>`
//!
//! Runs the full pipeline against the video, renders every selected
//! clip through system ffmpeg and writes a `<stem>_clips.zip` archive
//! next to the source. The font for text overlays comes from
//! `CLIPFORGE_FONT` (default `font.ttf`).

use std::path::PathBuf;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use clipforge_media::{export_all_clips, EngineService, FfmpegEngine, RenderAssets};
use clipforge_models::{ProcessingConfig, ProcessingState};
use clipforge_pipeline::{AnalysisClient, VideoProcessor};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("clipforge=info".parse().unwrap())
        .add_directive("info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let mut args = std::env::args().skip(1);
    let (video, duration) = match (args.next(), args.next()) {
        (Some(v), Some(d)) => match d.parse::<f64>() {
            Ok(d) if d > 0.0 => (PathBuf::from(v), d),
            _ => {
                error!("duration must be a positive number of seconds");
                std::process::exit(2);
            }
        },
        _ => {
            eprintln!("usage: clipforge <video-path> <duration-seconds>");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(video, duration).await {
        error!("Run failed: {e}");
        std::process::exit(1);
    }
}

async fn run(video: PathBuf, duration: f64) -> anyhow::Result<()> {
    let filename = video
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("invalid video path"))?
        .to_string();

    info!(video = %video.display(), duration, "Starting clipforge run");

    let config = ProcessingConfig::default();
    let client = AnalysisClient::new()?;
    let processor = VideoProcessor::new(client, config.clone()).with_observer(Box::new(
        |state: ProcessingState| {
            info!(
                status = state.status.as_str(),
                progress = state.progress,
                "{}",
                state.message
            );
        },
    ));

    let clips = processor.run(&filename, duration).await?;
    info!(clips = clips.len(), "Rendering clips");

    let assets = RenderAssets {
        video: video.clone(),
        watermark: config.watermark_file.clone(),
        music: config.background_music_file.clone(),
        font: std::env::var("CLIPFORGE_FONT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("font.ttf")),
    };

    let service = EngineService::new(FfmpegEngine::new()?);
    let archive = export_all_clips(&service, &clips, &config, &assets).await?;

    let stem = video
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("clips");
    let out_path = video.with_file_name(format!("{stem}_clips.zip"));

    tokio::fs::write(&out_path, &archive).await?;
    info!(archive = %out_path.display(), bytes = archive.len(), "Export complete");
    Ok(())
}
