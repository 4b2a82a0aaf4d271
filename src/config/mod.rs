use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::options::{MediaKind, NetworkProfile, DEFAULT_OUTPUT_DIR, DEFAULT_SUBTITLE_LANGUAGES};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,

    /// Request settings passed through to yt-dlp
    pub network: NetworkConfig,

    /// Subtitle settings for the video tool
    pub subtitles: SubtitleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory downloads are written to
    pub output_dir: PathBuf,

    /// yt-dlp executable
    pub ytdlp_path: String,

    /// ffmpeg binary or the directory containing it
    pub ffmpeg_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Browser headers and player client hints for the audio tool
    pub audio_browser_headers: bool,

    /// Browser headers and player client hints for the video tool
    pub video_browser_headers: bool,

    pub player_clients: Vec<String>,

    pub player_skip: Vec<String>,

    /// Netscape-format cookie file
    pub cookies_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleConfig {
    /// Languages to request, in the order files are probed
    pub languages: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            ytdlp_path: "yt-dlp".to_string(),
            ffmpeg_path: None,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let profile = NetworkProfile::default();
        Self {
            audio_browser_headers: true,
            video_browser_headers: false,
            player_clients: profile.player_clients,
            player_skip: profile.player_skip,
            cookies_file: None,
        }
    }
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            languages: DEFAULT_SUBTITLE_LANGUAGES
                .iter()
                .map(|lang| lang.to_string())
                .collect(),
        }
    }
}

impl Config {
    /// Load configuration from `explicit`, or from the usual locations,
    /// falling back to defaults when no file exists
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Some(path.to_path_buf())
            }
            None => Self::config_path().filter(|path| path.exists()),
        };

        match config_path {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::load_from(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Load and validate a specific config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Get configuration file path
    fn config_path() -> Option<PathBuf> {
        // Current directory first for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir().map(|dir| dir.join("tubegrab").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.app.ytdlp_path.trim().is_empty() {
            anyhow::bail!("app.ytdlp_path must not be empty");
        }

        if self.subtitles.languages.is_empty() {
            anyhow::bail!("subtitles.languages needs at least one language");
        }

        if self.app.output_dir.as_os_str().is_empty() {
            anyhow::bail!("app.output_dir must not be empty");
        }

        Ok(())
    }

    /// Network profile for one of the tools
    pub fn network_profile(&self, kind: MediaKind) -> NetworkProfile {
        let browser_headers = match kind {
            MediaKind::Audio => self.network.audio_browser_headers,
            MediaKind::Video => self.network.video_browser_headers,
        };

        NetworkProfile {
            browser_headers,
            player_clients: self.network.player_clients.clone(),
            player_skip: self.network.player_skip.clone(),
            cookies_file: self.network.cookies_file.clone(),
        }
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Output Directory: {}", self.app.output_dir.display());
        println!("  yt-dlp: {}", self.app.ytdlp_path);
        if let Some(ffmpeg) = &self.app.ffmpeg_path {
            println!("  ffmpeg: {}", ffmpeg.display());
        }
        println!("  Browser Headers (audio): {}", self.network.audio_browser_headers);
        println!("  Browser Headers (video): {}", self.network.video_browser_headers);
        if let Some(cookies) = &self.network.cookies_file {
            println!("  Cookies: {}", cookies.display());
        }
        println!("  Subtitle Languages: {}", self.subtitles.languages.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.app.output_dir, PathBuf::from("downloads"));
        assert_eq!(config.app.ytdlp_path, "yt-dlp");
        assert_eq!(config.subtitles.languages, vec!["ja", "en"]);
        assert!(config.network_profile(MediaKind::Audio).browser_headers);
        assert!(!config.network_profile(MediaKind::Video).browser_headers);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs_err::write(
            &path,
            "app:\n  output_dir: /srv/media\nnetwork:\n  video_browser_headers: true\n  cookies_file: cookies.txt\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.app.output_dir, PathBuf::from("/srv/media"));
        assert_eq!(config.app.ytdlp_path, "yt-dlp");

        let profile = config.network_profile(MediaKind::Video);
        assert!(profile.browser_headers);
        assert_eq!(profile.cookies_file, Some(PathBuf::from("cookies.txt")));
        assert_eq!(profile.player_clients, vec!["android", "web"]);
    }

    #[test]
    fn test_invalid_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        fs_err::write(&path, "subtitles:\n  languages: []\n").unwrap();
        assert!(Config::load_from(&path).is_err());

        fs_err::write(&path, "app:\n  ytdlp_path: ''\n").unwrap();
        assert!(Config::load_from(&path).is_err());

        fs_err::write(&path, "app: [not, a, map]\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("absent.yaml"))).is_err());
    }
}
