use clap::{Args, Parser};
use std::path::PathBuf;

/// Flags shared by both tools. None of them are required.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Directory to save downloads in (default: downloads)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Config file to use instead of the default locations
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// yt-dlp executable to run
    #[arg(long = "yt-dlp", value_name = "PATH", env = "TUBEGRAB_YTDLP")]
    pub yt_dlp: Option<String>,

    /// Send desktop-browser headers and player client hints
    #[arg(long, overrides_with = "no_browser_headers")]
    pub browser_headers: bool,

    /// Use yt-dlp's own request defaults
    #[arg(long, overrides_with = "browser_headers")]
    pub no_browser_headers: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub show_config: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    /// Browser header setting from the command line, if one was given
    pub fn browser_headers_override(&self) -> Option<bool> {
        if self.browser_headers {
            Some(true)
        } else if self.no_browser_headers {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "yt-audio",
    about = "Download the audio track of a video as a 192 kbps MP3",
    version,
    long_about = "Prompts for video URLs and saves the best available audio of each as a 192 kbps MP3, named after the video title. Enter 'q' to quit. Requires yt-dlp and ffmpeg."
)]
pub struct AudioCli {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Parser, Debug)]
#[command(
    name = "yt-video",
    about = "Download videos as MP4 at a chosen quality",
    version,
    long_about = "Prompts for video URLs, a quality tier (best, 1080p, 720p, 480p) and whether to fetch Japanese and English subtitles, then saves each video as an MP4 named after its title. Enter 'q' to quit. Requires yt-dlp and ffmpeg."
)]
pub struct VideoCli {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Skip the subtitle question and never download subtitles
    #[arg(long)]
    pub no_subtitle_prompt: bool,
}
