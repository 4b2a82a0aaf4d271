//! Startup shared by the `yt-audio` and `yt-video` binaries

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::CommonArgs;
use crate::config::Config;
use crate::download::Downloader;
use crate::extractors::YtDlpExtractor;
use crate::options::MediaKind;
use crate::session::{Session, SessionSettings};
use crate::utils;

/// Initialize tracing. Logs go to stderr so prompts on stdout stay readable.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "tubegrab=debug" } else { "tubegrab=warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Merge command-line flags over the loaded configuration
pub fn settings_for(kind: MediaKind, config: &Config, args: &CommonArgs) -> SessionSettings {
    let mut network = config.network_profile(kind);
    if let Some(browser_headers) = args.browser_headers_override() {
        network.browser_headers = browser_headers;
    }

    SessionSettings {
        kind,
        output_dir: args
            .output_dir
            .clone()
            .unwrap_or_else(|| config.app.output_dir.clone()),
        ask_subtitles: kind == MediaKind::Video,
        subtitle_languages: config.subtitles.languages.clone(),
        network,
    }
}

/// Run one tool until the user quits
pub async fn run(kind: MediaKind, args: &CommonArgs, ask_subtitles: bool) -> Result<()> {
    init_tracing(args.verbose);

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(path) = &args.yt_dlp {
        config.app.ytdlp_path = path.clone();
    }

    if args.show_config {
        config.display();
        return Ok(());
    }

    // Check for required external tools (non-fatal)
    let missing_deps =
        utils::check_dependencies(&config.app.ytdlp_path, config.app.ffmpeg_path.as_deref()).await;
    if !missing_deps.is_empty() {
        eprintln!("⚠️  Dependency check warnings:");
        for dep in missing_deps {
            eprintln!("   • {}", dep);
        }
        eprintln!("   (Continuing anyway - downloads will fail until these are installed)");
    }

    let extractor = YtDlpExtractor::new()
        .with_path(config.app.ytdlp_path.clone())
        .with_ffmpeg_location(config.app.ffmpeg_path.clone());

    let mut settings = settings_for(kind, &config, args);
    settings.ask_subtitles = settings.ask_subtitles && ask_subtitles;
    tracing::debug!(?settings, "Session settings");

    let stdin = std::io::stdin();
    let mut session = Session::new(
        Downloader::new(extractor),
        settings,
        stdin.lock(),
        std::io::stdout(),
    );
    session.run().await
}
