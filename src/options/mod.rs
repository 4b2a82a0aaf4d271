use std::fmt;
use std::path::{Path, PathBuf};

/// Default directory downloads are written to
pub const DEFAULT_OUTPUT_DIR: &str = "downloads";

/// Subtitle languages requested when subtitles are enabled, in probe order
pub const DEFAULT_SUBTITLE_LANGUAGES: [&str; 2] = ["ja", "en"];

/// Output filename template: `<remote title>.<extension>`
pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

pub const AUDIO_FORMAT_SELECTOR: &str = "bestaudio/best";
pub const AUDIO_CODEC: &str = "mp3";
pub const AUDIO_BITRATE_KBPS: u32 = 192;
pub const VIDEO_CONTAINER: &str = "mp4";
pub const SUBTITLE_FORMAT: &str = "srt";

/// Quality name used when a lookup misses
const FALLBACK_QUALITY: &str = "best";

/// Quality name -> yt-dlp format expression.
///
/// Capped tiers prefer an mp4 video + m4a audio pair under the height limit,
/// then a single mp4 under the limit, then whatever is best.
const QUALITY_FORMATS: &[(&str, &str)] = &[
    ("best", "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best"),
    (
        "high",
        "bestvideo[height<=1080][ext=mp4]+bestaudio[ext=m4a]/best[height<=1080][ext=mp4]/best",
    ),
    (
        "medium",
        "bestvideo[height<=720][ext=mp4]+bestaudio[ext=m4a]/best[height<=720][ext=mp4]/best",
    ),
    (
        "low",
        "bestvideo[height<=480][ext=mp4]+bestaudio[ext=m4a]/best[height<=480][ext=mp4]/best",
    ),
];

const BROWSER_HEADERS: &[(&str, &str)] = &[
    (
        "User-Agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    ),
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
    ),
    ("Accept-Language", "en-us,en;q=0.5"),
    ("Sec-Fetch-Mode", "navigate"),
];

/// Look up the format expression for a quality name, falling back to `best`
pub fn format_selector_for(quality: &str) -> &'static str {
    let quality = quality.trim().to_lowercase();
    QUALITY_FORMATS
        .iter()
        .find(|(name, _)| *name == quality)
        .or_else(|| QUALITY_FORMATS.iter().find(|(name, _)| *name == FALLBACK_QUALITY))
        .map_or(QUALITY_FORMATS[0].1, |(_, selector)| *selector)
}

/// What kind of media a tool downloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

/// Coarse video resolution category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityTier {
    #[default]
    Best,
    High,
    Medium,
    Low,
}

impl QualityTier {
    pub const ALL: [QualityTier; 4] = [
        QualityTier::Best,
        QualityTier::High,
        QualityTier::Medium,
        QualityTier::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Best => "best",
            QualityTier::High => "high",
            QualityTier::Medium => "medium",
            QualityTier::Low => "low",
        }
    }

    /// Menu label shown next to the choice number
    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::Best => "Best available",
            QualityTier::High => "High - 1080p",
            QualityTier::Medium => "Medium - 720p",
            QualityTier::Low => "Low - 480p",
        }
    }

    /// Parse a tier name; unknown names mean `Best`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "high" => QualityTier::High,
            "medium" => QualityTier::Medium,
            "low" => QualityTier::Low,
            _ => QualityTier::Best,
        }
    }

    /// Parse a numeric menu choice (1-4); empty or anything else means `Best`
    pub fn from_menu_choice(choice: &str) -> Self {
        match choice.trim() {
            "2" => QualityTier::High,
            "3" => QualityTier::Medium,
            "4" => QualityTier::Low,
            _ => QualityTier::Best,
        }
    }

    pub fn format_selector(&self) -> &'static str {
        format_selector_for(self.as_str())
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Client-side settings that help avoid blocked requests.
///
/// Best-effort only: downloads must work with the default profile too.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkProfile {
    /// Send desktop-browser headers and player client hints
    pub browser_headers: bool,

    /// Player clients yt-dlp should try, in order
    pub player_clients: Vec<String>,

    /// Player fetches yt-dlp should skip
    pub player_skip: Vec<String>,

    /// Netscape-format cookie file
    pub cookies_file: Option<PathBuf>,
}

impl Default for NetworkProfile {
    fn default() -> Self {
        Self {
            browser_headers: false,
            player_clients: vec!["android".to_string(), "web".to_string()],
            player_skip: vec!["webpage".to_string(), "configs".to_string()],
            cookies_file: None,
        }
    }
}

impl NetworkProfile {
    fn headers(&self) -> Vec<(String, String)> {
        if !self.browser_headers {
            return Vec::new();
        }
        BROWSER_HEADERS
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    fn extractor_args(&self) -> Option<String> {
        if !self.browser_headers {
            return None;
        }

        let mut parts = Vec::new();
        if !self.player_clients.is_empty() {
            parts.push(format!("player_client={}", self.player_clients.join(",")));
        }
        if !self.player_skip.is_empty() {
            parts.push(format!("player_skip={}", self.player_skip.join(",")));
        }

        if parts.is_empty() {
            None
        } else {
            Some(format!("youtube:{}", parts.join(";")))
        }
    }
}

/// One user download, built fresh for every URL
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRequest {
    url: String,
    output_dir: PathBuf,
    kind: MediaKind,
    quality: QualityTier,
    include_subtitles: bool,
    subtitle_languages: Vec<String>,
    network: NetworkProfile,
}

impl DownloadRequest {
    fn new(url: &str, kind: MediaKind, quality: QualityTier) -> Self {
        Self {
            url: url.trim().to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            kind,
            quality,
            include_subtitles: false,
            subtitle_languages: DEFAULT_SUBTITLE_LANGUAGES
                .iter()
                .map(|lang| lang.to_string())
                .collect(),
            network: NetworkProfile::default(),
        }
    }

    /// Best audio, converted to MP3
    pub fn audio(url: &str) -> Self {
        Self::new(url, MediaKind::Audio, QualityTier::Best)
    }

    pub fn video(url: &str, quality: QualityTier) -> Self {
        Self::new(url, MediaKind::Video, quality)
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Ignored for audio requests
    pub fn with_subtitles(mut self, include: bool) -> Self {
        self.include_subtitles = include;
        self
    }

    pub fn with_subtitle_languages(mut self, languages: Vec<String>) -> Self {
        if !languages.is_empty() {
            self.subtitle_languages = languages;
        }
        self
    }

    pub fn with_network(mut self, network: NetworkProfile) -> Self {
        self.network = network;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn quality(&self) -> QualityTier {
        self.quality
    }

    /// Whether subtitle files should be fetched and probed for
    pub fn wants_subtitles(&self) -> bool {
        self.kind == MediaKind::Video && self.include_subtitles
    }

    pub fn subtitle_languages(&self) -> &[String] {
        &self.subtitle_languages
    }

    pub fn network(&self) -> &NetworkProfile {
        &self.network
    }

    /// Translate the request into extractor options
    pub fn extractor_config(&self) -> ExtractorConfig {
        let (format_selector, merge_output_format, audio_extraction) = match self.kind {
            MediaKind::Audio => (
                AUDIO_FORMAT_SELECTOR.to_string(),
                None,
                Some(AudioExtraction {
                    codec: AUDIO_CODEC.to_string(),
                    bitrate_kbps: AUDIO_BITRATE_KBPS,
                }),
            ),
            MediaKind::Video => (
                self.quality.format_selector().to_string(),
                Some(VIDEO_CONTAINER.to_string()),
                None,
            ),
        };

        let subtitles = self.wants_subtitles().then(|| SubtitleOptions {
            languages: self.subtitle_languages.clone(),
            format: SUBTITLE_FORMAT.to_string(),
            manual: true,
            automatic: true,
        });

        ExtractorConfig {
            url: self.url.clone(),
            format_selector,
            output_template: self.output_dir.join(OUTPUT_TEMPLATE),
            merge_output_format,
            audio_extraction,
            subtitles,
            http_headers: self.network.headers(),
            extractor_args: self.network.extractor_args(),
            cookies_file: self.network.cookies_file.clone(),
            no_playlist: true,
        }
    }
}

/// Post-download audio conversion
#[derive(Debug, Clone, PartialEq)]
pub struct AudioExtraction {
    pub codec: String,
    pub bitrate_kbps: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleOptions {
    pub languages: Vec<String>,
    pub format: String,

    /// Uploader-provided subtitles
    pub manual: bool,

    /// Auto-generated captions
    pub automatic: bool,
}

/// Options handed to the extractor for a single call
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorConfig {
    pub url: String,
    pub format_selector: String,
    pub output_template: PathBuf,
    pub merge_output_format: Option<String>,
    pub audio_extraction: Option<AudioExtraction>,
    pub subtitles: Option<SubtitleOptions>,
    pub http_headers: Vec<(String, String)>,
    pub extractor_args: Option<String>,
    pub cookies_file: Option<PathBuf>,
    pub no_playlist: bool,
}

impl ExtractorConfig {
    /// Render as yt-dlp command-line arguments. The URL always comes last.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "--format".to_string(),
            self.format_selector.clone(),
            "--output".to_string(),
            self.output_template.to_string_lossy().into_owned(),
        ];

        if self.no_playlist {
            args.push("--no-playlist".to_string());
        }

        if let Some(container) = &self.merge_output_format {
            args.push("--merge-output-format".to_string());
            args.push(container.clone());
        }

        if let Some(audio) = &self.audio_extraction {
            args.push("--extract-audio".to_string());
            args.push("--audio-format".to_string());
            args.push(audio.codec.clone());
            args.push("--audio-quality".to_string());
            args.push(format!("{}K", audio.bitrate_kbps));
        }

        if let Some(subs) = &self.subtitles {
            if subs.manual {
                args.push("--write-subs".to_string());
            }
            if subs.automatic {
                args.push("--write-auto-subs".to_string());
            }
            args.push("--sub-langs".to_string());
            args.push(subs.languages.join(","));
            args.push("--sub-format".to_string());
            args.push(format!("{}/best", subs.format));
            args.push("--convert-subs".to_string());
            args.push(subs.format.clone());
        }

        for (name, value) in &self.http_headers {
            args.push("--add-header".to_string());
            args.push(format!("{}:{}", name, value));
        }

        if let Some(extractor_args) = &self.extractor_args {
            args.push("--extractor-args".to_string());
            args.push(extractor_args.clone());
        }

        if let Some(cookies) = &self.cookies_file {
            args.push("--cookies".to_string());
            args.push(cookies.to_string_lossy().into_owned());
        }

        args.push("--".to_string());
        args.push(self.url.clone());
        args
    }
}
