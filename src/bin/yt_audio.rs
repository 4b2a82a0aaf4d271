use anyhow::Result;
use clap::Parser;

use tubegrab::cli::AudioCli;
use tubegrab::MediaKind;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = AudioCli::parse();
    tubegrab::app::run(MediaKind::Audio, &cli.common, false).await
}
