use crate::cmd::{ParseArguments, RegistryArguments, StoreArguments};
use feed_common::{cli::CommandDefaults, fetcher::Fetcher, progress::Progress};
use oval_walker::{
    parse::{ParserAdapter, definitions::DefinitionWalker},
    provider::OvalProvider,
};
use std::io::{Write, stdout};

/// Parse the documents already present in the workspace, without downloading anything.
#[derive(clap::Args, Debug)]
pub struct Parse {
    #[command(flatten)]
    registry: RegistryArguments,

    #[command(flatten)]
    store: StoreArguments,

    #[command(flatten)]
    parse: ParseArguments,
}

impl CommandDefaults for Parse {}

impl Parse {
    pub async fn run<P: Progress>(self, progress: P) -> anyhow::Result<()> {
        // never used for fetching
        let fetcher = Fetcher::new(Default::default()).await?;

        let provider = OvalProvider::new(
            self.registry.try_into()?,
            self.store.downloader(fetcher)?,
            ParserAdapter::new(DefinitionWalker, self.parse.into()),
        )
        .with_progress(progress);

        let catalog = provider.parse().await?;
        log::info!("Found {} advisories", catalog.len());

        let mut out = stdout().lock();
        serde_json::to_writer_pretty(&mut out, &catalog)?;
        writeln!(out)?;

        Ok(())
    }
}
