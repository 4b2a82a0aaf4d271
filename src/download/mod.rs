use std::path::{Path, PathBuf};

use crate::extractors::{Extraction, MediaExtractor};
use crate::options::{DownloadRequest, MediaKind, AUDIO_CODEC, SUBTITLE_FORMAT};
use crate::utils;

/// Outcome of one download
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadResult {
    pub success: bool,

    /// Final media file, after post-processing
    pub output_file: Option<PathBuf>,

    /// Subtitle files found next to the media file
    pub subtitle_files: Vec<PathBuf>,

    /// Title of the remote item, when the extractor reported one
    pub title: Option<String>,

    /// Failure text when `success` is false
    pub error: Option<String>,
}

impl DownloadResult {
    pub fn completed(output_file: PathBuf, subtitle_files: Vec<PathBuf>) -> Self {
        Self {
            success: true,
            output_file: Some(output_file),
            subtitle_files,
            title: None,
            error: None,
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            output_file: None,
            subtitle_files: Vec::new(),
            title: None,
            error: Some(message.into()),
        }
    }
}

/// Runs a request through an extractor and works out what landed on disk
pub struct Downloader<E> {
    extractor: E,
}

impl<E: MediaExtractor> Downloader<E> {
    pub fn new(extractor: E) -> Self {
        Self { extractor }
    }

    /// Download one request. Never returns an error: every failure is
    /// logged and reported as a failed result.
    pub async fn download(&self, request: &DownloadRequest) -> DownloadResult {
        tracing::info!("Starting download of {} via {}", request.url(), self.extractor.name());

        if let Err(e) = utils::ensure_dir(request.output_dir()) {
            tracing::error!("{:#}", e);
            return DownloadResult::failed(format!("{:#}", e));
        }

        let config = request.extractor_config();
        tracing::debug!(?config, "Extractor options");

        match self.extractor.extract(&config).await {
            Ok(extraction) => {
                let result = resolve_outputs(request, &extraction);
                tracing::info!("Download finished: {:?}", result.output_file);
                result
            }
            Err(e) => {
                tracing::error!("Download of {} failed: {:#}", request.url(), e);
                DownloadResult::failed(format!("{:#}", e))
            }
        }
    }
}

/// Work out the final media path and subtitle files from the filename the
/// extractor prepared.
///
/// Relies on yt-dlp's naming: post-processing keeps the base name and swaps
/// the extension, subtitles are written as `<base>.<lang>.<format>`.
pub fn resolve_outputs(request: &DownloadRequest, extraction: &Extraction) -> DownloadResult {
    let reported = &extraction.filename;

    let output_file = match request.kind() {
        MediaKind::Audio => reported.with_extension(AUDIO_CODEC),
        MediaKind::Video => reported.clone(),
    };

    let subtitle_files = if request.wants_subtitles() {
        find_subtitles(reported, request.subtitle_languages())
    } else {
        Vec::new()
    };

    DownloadResult::completed(output_file, subtitle_files).with_title(extraction.title.clone())
}

/// Probe `<base>.<lang>.srt` for each language, keeping only files that exist
pub fn find_subtitles(reported: &Path, languages: &[String]) -> Vec<PathBuf> {
    let base = reported.with_extension("");

    languages
        .iter()
        .map(|lang| {
            let mut name = base.clone().into_os_string();
            name.push(format!(".{}.{}", lang, SUBTITLE_FORMAT));
            PathBuf::from(name)
        })
        .filter(|path| path.is_file())
        .collect()
}
