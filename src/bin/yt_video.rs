use anyhow::Result;
use clap::Parser;

use tubegrab::cli::VideoCli;
use tubegrab::MediaKind;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = VideoCli::parse();
    tubegrab::app::run(MediaKind::Video, &cli.common, !cli.no_subtitle_prompt).await
}
