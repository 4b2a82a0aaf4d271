use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use super::{Extraction, MediaExtractor};
use crate::options::ExtractorConfig;
use crate::{Result, TubegrabError};

/// Written once per item by yt-dlp after format selection, before the download
const REPORT_TEMPLATE: &str = "%(.{title,filename})j";

/// One line of the report file
#[derive(Debug, Deserialize)]
struct ReportLine {
    title: Option<String>,
    filename: Option<String>,
}

/// Media extractor backed by the yt-dlp binary
pub struct YtDlpExtractor {
    yt_dlp_path: String,
    ffmpeg_location: Option<PathBuf>,
}

impl YtDlpExtractor {
    pub fn new() -> Self {
        Self {
            yt_dlp_path: "yt-dlp".to_string(),
            ffmpeg_location: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.yt_dlp_path = path.into();
        self
    }

    /// Directory or binary yt-dlp should use for post-processing
    pub fn with_ffmpeg_location(mut self, location: Option<PathBuf>) -> Self {
        self.ffmpeg_location = location;
        self
    }

    pub fn path(&self) -> &str {
        &self.yt_dlp_path
    }

    fn build_args(&self, config: &ExtractorConfig, report_path: &Path) -> Vec<String> {
        let mut args = vec![
            "--newline".to_string(),
            "--print-to-file".to_string(),
            REPORT_TEMPLATE.to_string(),
            report_path.to_string_lossy().into_owned(),
        ];

        if let Some(location) = &self.ffmpeg_location {
            args.push("--ffmpeg-location".to_string());
            args.push(location.to_string_lossy().into_owned());
        }

        args.extend(config.to_args());
        args
    }

    /// Take the last reported item from the report file
    fn parse_report(contents: &str, url: &str) -> Result<Extraction> {
        let line = contents
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .ok_or_else(|| TubegrabError::MissingReport(url.to_string()))?;

        let report: ReportLine = serde_json::from_str(line.trim())
            .with_context(|| format!("Unreadable yt-dlp report: {}", line))?;

        let filename = report
            .filename
            .filter(|name| !name.is_empty())
            .ok_or_else(|| TubegrabError::MissingReport(url.to_string()))?;

        Ok(Extraction {
            filename: PathBuf::from(filename),
            title: report.title,
        })
    }

    /// Pick the most useful failure text from yt-dlp's stderr
    fn failure_message(stderr_lines: &[String], status: std::process::ExitStatus) -> String {
        stderr_lines
            .iter()
            .rev()
            .find(|line| line.starts_with("ERROR:"))
            .or_else(|| stderr_lines.last())
            .map(|line| line.trim_start_matches("ERROR:").trim().to_string())
            .unwrap_or_else(|| format!("yt-dlp exited with {}", status))
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn extract(&self, config: &ExtractorConfig) -> Result<Extraction> {
        let report = tempfile::NamedTempFile::new()
            .context("Failed to create yt-dlp report file")?;
        let args = self.build_args(config, report.path());

        tracing::debug!("Running {} {}", self.yt_dlp_path, args.join(" "));

        // stdin stays with the prompt loop; progress goes straight to the terminal
        let mut child = Command::new(&self.yt_dlp_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TubegrabError::ToolUnavailable(self.yt_dlp_path.clone(), e.to_string()))?;

        let stderr = child
            .stderr
            .take()
            .context("yt-dlp stderr was not captured")?;

        let mut stderr_lines = Vec::new();
        let mut lines = BufReader::new(stderr).lines();
        while let Some(line) = lines.next_line().await? {
            eprintln!("{}", line);
            if !line.trim().is_empty() {
                stderr_lines.push(line);
            }
        }

        let status = child.wait().await.context("Failed to wait for yt-dlp")?;
        if !status.success() {
            let message = Self::failure_message(&stderr_lines, status);
            return Err(TubegrabError::ExtractionFailed(message).into());
        }

        let contents = fs_err::read_to_string(report.path())?;
        Self::parse_report(&contents, &config.url)
    }

    fn name(&self) -> &'static str {
        "yt-dlp"
    }
}

impl Default for YtDlpExtractor {
    fn default() -> Self {
        Self::new()
    }
}
