#![forbid(unsafe_code)]

mod cmd;

use clap::Parser;
use cmd::{download::Download, manifest::Manifest, parse::Parse, sync::Sync, urls::Urls};
use feed_common::{
    cli::CommandDefaults, cli::log::Logging, progress::Progress, utils::measure::MeasureTime,
};
use std::{ops::Deref, process::ExitCode};

#[derive(Debug, Parser)]
#[command(version, about = "OVAL feed tool", author, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    logging: Logging,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    Sync(Sync),
    Download(Download),
    Parse(Parse),
    Urls(Urls),
    Manifest(Manifest),
}

impl Deref for Command {
    type Target = dyn CommandDefaults;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Sync(cmd) => cmd,
            Self::Download(cmd) => cmd,
            Self::Parse(cmd) => cmd,
            Self::Urls(cmd) => cmd,
            Self::Manifest(cmd) => cmd,
        }
    }
}

impl Command {
    pub async fn run<P: Progress>(self, progress: P) -> anyhow::Result<()> {
        match self {
            Self::Sync(cmd) => cmd.run(progress).await,
            Self::Download(cmd) => cmd.run(progress).await,
            Self::Parse(cmd) => cmd.run(progress).await,
            Self::Urls(cmd) => cmd.run(),
            Self::Manifest(cmd) => cmd.run().await,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let progress = self
            .logging
            .init(&["oval", "oval_walker"], self.command.progress());

        log::debug!("Setup complete, start processing");

        let time = MeasureTime::new();
        self.command.run(progress).await?;
        drop(time);

        Ok(())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = Cli::parse().run().await {
        log::error!("Failed to execute: {err}");
        for (n, cause) in err.chain().enumerate().skip(1) {
            log::info!("  {n}: {cause}");
        }
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
