use crate::cmd::{
    ParseArguments, ProviderArguments, RegistryArguments, RunnerArguments, StoreArguments,
};
use anyhow::Context;
use feed_common::{
    cli::{CommandDefaults, client::ClientArguments},
    progress::Progress,
};
use std::{
    fs::File,
    io::{BufWriter, Write, stdout},
    path::PathBuf,
};

/// Download and parse all feeds, writing the resulting catalog as JSON.
#[derive(clap::Args, Debug)]
pub struct Sync {
    #[command(flatten)]
    client: ClientArguments,

    #[command(flatten)]
    registry: RegistryArguments,

    #[command(flatten)]
    store: StoreArguments,

    #[command(flatten)]
    runner: RunnerArguments,

    #[command(flatten)]
    parse: ParseArguments,

    /// File to write the catalog to, defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// File to write the URLs of all processed feeds to.
    #[arg(short, long)]
    urls: Option<PathBuf>,
}

impl CommandDefaults for Sync {}

impl Sync {
    pub async fn run<P: Progress>(self, progress: P) -> anyhow::Result<()> {
        let mut provider = ProviderArguments {
            client: self.client,
            registry: self.registry,
            store: self.store,
            runner: self.runner,
            parse: self.parse,
        }
        .into_provider(progress)
        .await?;

        let result = provider.get().await;

        // report what was touched, even when failing
        for url in provider.urls() {
            log::debug!("Processed: {url}");
        }
        if let Some(path) = &self.urls {
            let mut out = BufWriter::new(
                File::create(path)
                    .with_context(|| format!("Creating URL list {}", path.display()))?,
            );
            for url in provider.urls() {
                writeln!(out, "{url}")?;
            }
            out.flush()?;
        }

        let catalog = result?;
        log::info!("Found {} advisories", catalog.len());

        match &self.output {
            Some(path) => {
                let mut out = BufWriter::new(
                    File::create(path)
                        .with_context(|| format!("Creating output {}", path.display()))?,
                );
                serde_json::to_writer_pretty(&mut out, &catalog)?;
                out.flush()?;
            }
            None => {
                let mut out = stdout().lock();
                serde_json::to_writer_pretty(&mut out, &catalog)?;
                writeln!(out)?;
            }
        }

        Ok(())
    }
}
