use crate::cmd::{
    ParseArguments, ProviderArguments, RegistryArguments, RunnerArguments, StoreArguments,
};
use feed_common::{
    cli::{CommandDefaults, client::ClientArguments},
    progress::Progress,
};

/// Like sync, but only downloads the documents into the workspace.
#[derive(clap::Args, Debug)]
pub struct Download {
    #[command(flatten)]
    client: ClientArguments,

    #[command(flatten)]
    registry: RegistryArguments,

    #[command(flatten)]
    store: StoreArguments,

    #[command(flatten)]
    runner: RunnerArguments,
}

impl CommandDefaults for Download {}

impl Download {
    pub async fn run<P: Progress>(self, progress: P) -> anyhow::Result<()> {
        let mut provider = ProviderArguments {
            client: self.client,
            registry: self.registry,
            store: self.store,
            runner: self.runner,
            parse: ParseArguments::default(),
        }
        .into_provider(progress)
        .await?;

        provider.download().await?;

        Ok(())
    }
}
