use async_trait::async_trait;
use std::path::PathBuf;

pub mod ytdlp;

pub use ytdlp::YtDlpExtractor;

use crate::options::ExtractorConfig;
use crate::Result;

/// What the extractor reported about a finished download
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Filename the extractor prepared from the output template, before any
    /// post-processing changed its extension
    pub filename: PathBuf,

    /// Title of the remote item
    pub title: Option<String>,
}

/// Trait for the external collaborator that resolves and downloads media
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Download the media described by `config`, blocking until any
    /// post-processing has finished
    async fn extract(&self, config: &ExtractorConfig) -> Result<Extraction>;

    /// Get the name of this extractor
    fn name(&self) -> &'static str;
}
