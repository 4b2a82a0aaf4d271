use anyhow::{Context, Result};
use std::path::Path;

use crate::TubegrabError;

/// Create a directory and its parents; an existing directory is fine
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    tracing::debug!("Creating output directory {}", path.display());
    fs_err::create_dir_all(path)
        .map_err(|e| TubegrabError::OutputDirectory(path.display().to_string(), e.to_string()))
        .context("Failed to prepare output directory")?;
    Ok(())
}

/// Check if the current environment has required tools
pub async fn check_dependencies(yt_dlp: &str, ffmpeg: Option<&Path>) -> Vec<String> {
    let mut missing = Vec::new();

    if !check_command_available(yt_dlp, "--version").await {
        missing.push(format!("{} - required for every download", yt_dlp));
    }

    // ffmpeg takes a single dash; a configured location may be a directory
    let ffmpeg = match ffmpeg {
        Some(path) if path.is_dir() => path.join("ffmpeg").display().to_string(),
        Some(path) => path.display().to_string(),
        None => "ffmpeg".to_string(),
    };
    if !check_command_available(&ffmpeg, "-version").await {
        missing.push(format!(
            "{} - required for MP3 conversion and merging video with audio",
            ffmpeg
        ));
    }

    missing
}

/// Check if a command can be run
async fn check_command_available(command: &str, version_flag: &str) -> bool {
    use std::process::Stdio;
    use tokio::process::Command;

    Command::new(command)
        .arg(version_flag)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}
