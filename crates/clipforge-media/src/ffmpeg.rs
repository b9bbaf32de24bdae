//! System-ffmpeg implementation of the transcoding engine.
//!
//! Working storage is a per-engine temporary directory; staged names are
//! flat (no path separators), matching the contract's content-addressed
//! namespace. Commands run with the working directory as cwd so plan
//! argument lists can reference staged names directly.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::engine::TranscodeEngine;
use crate::error::{MediaError, MediaResult};
use crate::progress::{is_progress_line, parse_progress_line, EngineProgress, ProgressCallback};

/// Transcoding engine backed by the system `ffmpeg` binary.
pub struct FfmpegEngine {
    workdir: TempDir,
}

impl FfmpegEngine {
    /// Create an engine with a fresh temporary working storage.
    pub fn new() -> MediaResult<Self> {
        Ok(Self {
            workdir: TempDir::new()?,
        })
    }

    fn storage_path(&self, name: &str) -> MediaResult<PathBuf> {
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(MediaError::InvalidStorageName(name.to_string()));
        }
        Ok(self.workdir.path().join(name))
    }
}

#[async_trait]
impl TranscodeEngine for FfmpegEngine {
    async fn load(&self) -> MediaResult<()> {
        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;
        debug!(workdir = %self.workdir.path().display(), "ffmpeg engine ready");
        Ok(())
    }

    async fn write_file(&self, name: &str, data: &[u8]) -> MediaResult<()> {
        let path = self.storage_path(name)?;
        tokio::fs::write(&path, data).await?;
        Ok(())
    }

    async fn read_file(&self, name: &str) -> MediaResult<Vec<u8>> {
        let path = self.storage_path(name)?;
        if !path.exists() {
            return Err(MediaError::OutputMissing(name.to_string()));
        }
        Ok(tokio::fs::read(&path).await?)
    }

    async fn delete_file(&self, name: &str) -> MediaResult<()> {
        let path = self.storage_path(name)?;
        if path.exists() {
            tokio::fs::remove_file(&path).await?;
        }
        Ok(())
    }

    async fn exec(&self, args: &[String], progress: Option<ProgressCallback>) -> MediaResult<()> {
        let mut full_args = vec![
            "-y".to_string(),
            "-v".to_string(),
            "error".to_string(),
            "-progress".to_string(),
            "pipe:2".to_string(),
        ];
        full_args.extend_from_slice(args);

        debug!("Running ffmpeg {}", full_args.join(" "));

        let mut child = Command::new("ffmpeg")
            .args(&full_args)
            .current_dir(self.workdir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| MediaError::exec_failed("stderr not captured", None, None))?;
        let mut reader = BufReader::new(stderr).lines();

        // Parse progress markers and keep the raw tail for error reports.
        let stderr_handle = tokio::spawn(async move {
            let mut current = EngineProgress::default();
            let mut raw = Vec::new();
            while let Ok(Some(line)) = reader.next_line().await {
                if is_progress_line(&line) {
                    if let Some(update) = parse_progress_line(&line, &mut current) {
                        if let Some(cb) = progress.as_ref() {
                            cb(update);
                        }
                    }
                } else {
                    raw.push(line);
                }
            }
            raw
        });

        let status = child.wait().await?;
        let raw_stderr = stderr_handle.await.unwrap_or_default();

        if status.success() {
            Ok(())
        } else {
            let tail = raw_stderr
                .iter()
                .rev()
                .take(10)
                .rev()
                .cloned()
                .collect::<Vec<_>>()
                .join("\n");
            Err(MediaError::exec_failed(
                "ffmpeg exited with non-zero status",
                (!tail.is_empty()).then_some(tail),
                status.code(),
            ))
        }
    }
}
