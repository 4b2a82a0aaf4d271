use anyhow::Result;
use std::io::Write;

use crate::download::DownloadResult;
use crate::options::{DownloadRequest, MediaKind, QualityTier};

pub const EXIT_TOKEN: &str = "q";

pub const URL_PROMPT: &str = "Enter a video URL ('q' to quit): ";
pub const QUALITY_PROMPT: &str = "Choice (1-4, default 1): ";
pub const SUBTITLE_PROMPT: &str = "Download subtitles (ja, en)? [y/N]: ";
pub const EMPTY_URL_REMINDER: &str = "No URL entered.";
pub const GOODBYE: &str = "Exiting.";
pub const SUCCESS_MARKER: &str = "✓ Saved:";
pub const FAILURE_MARKER: &str = "✗ Download failed.";

/// Print the tool banner
pub fn print_banner(out: &mut impl Write, kind: MediaKind) -> Result<()> {
    let title = match kind {
        MediaKind::Audio => "YouTube Audio Downloader",
        MediaKind::Video => "YouTube Video Downloader",
    };
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "=".repeat(50))?;
    Ok(())
}

/// Write a prompt without a trailing newline
pub fn prompt(out: &mut impl Write, text: &str) -> Result<()> {
    write!(out, "{}", text)?;
    out.flush()?;
    Ok(())
}

pub fn print_quality_menu(out: &mut impl Write) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "Select quality:")?;
    for (index, tier) in QualityTier::ALL.iter().enumerate() {
        writeln!(out, "{}. {} ({})", index + 1, tier.label(), tier)?;
    }
    Ok(())
}

/// Status lines printed before a download starts
pub fn report_start(out: &mut impl Write, request: &DownloadRequest) -> Result<()> {
    writeln!(out, "Starting download: {}", request.url())?;

    if request.kind() == MediaKind::Video {
        writeln!(out, "Quality: {}", request.quality())?;
        if request.wants_subtitles() {
            writeln!(out, "Subtitles: {}", request.subtitle_languages().join(", "))?;
        } else {
            writeln!(out, "Subtitles: off")?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Completion or error line, then the final marker
pub fn report_result(out: &mut impl Write, result: &DownloadResult) -> Result<()> {
    match (&result.output_file, result.success) {
        (Some(path), true) => {
            if let Some(title) = &result.title {
                writeln!(out, "Title: {}", title)?;
            }
            writeln!(out, "Download complete: {}", path.display())?;
            for subtitle in &result.subtitle_files {
                writeln!(out, "Subtitle: {}", subtitle.display())?;
            }
            writeln!(out)?;
            writeln!(out, "{} {}", SUCCESS_MARKER, path.display())?;
        }
        _ => {
            let message = result.error.as_deref().unwrap_or("unknown error");
            writeln!(out, "Error: {}", message)?;
            writeln!(out)?;
            writeln!(out, "{}", FAILURE_MARKER)?;
        }
    }
    out.flush()?;
    Ok(())
}
