//! Tubegrab - interactive audio and video downloaders built on yt-dlp
//!
//! This library provides the pieces shared by the `yt-audio` and `yt-video`
//! binaries: turning a user's choices into yt-dlp options, running the
//! extractor, locating the files it produced and driving the prompt loop.

pub mod app;
pub mod cli;
pub mod config;
pub mod download;
pub mod extractors;
pub mod options;
pub mod output;
pub mod session;
pub mod utils;

pub use config::Config;
pub use download::{DownloadResult, Downloader};
pub use extractors::{Extraction, MediaExtractor};
pub use options::{DownloadRequest, ExtractorConfig, MediaKind, QualityTier};
pub use session::Session;

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to tubegrab
#[derive(thiserror::Error, Debug)]
pub enum TubegrabError {
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("{0} is not available: {1}")]
    ToolUnavailable(String, String),

    #[error("yt-dlp did not report a filename for {0}")]
    MissingReport(String),

    #[error("Cannot create output directory {0}: {1}")]
    OutputDirectory(String, String),
}
