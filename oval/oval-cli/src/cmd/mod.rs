use anyhow::Context;
use feed_common::{cli::client::ClientArguments, fetcher::Fetcher, progress::Progress};
use oval_walker::{
    download::{DownloadOptions, Downloader},
    manifest::Registry,
    parse::{
        ParserAdapter,
        definitions::{DefinitionConfig, DefinitionWalker},
    },
    provider::{OvalProvider, ProviderOptions},
    resolve::PathResolver,
};
use std::path::PathBuf;

pub mod download;
pub mod manifest;
pub mod parse;
pub mod sync;
pub mod urls;

#[derive(Debug, clap::Parser)]
#[command(next_help_heading = "Feeds")]
pub struct RegistryArguments {
    /// A JSON file listing the feeds to process, defaults to the Red Hat feeds.
    #[arg(short, long)]
    pub registry: Option<PathBuf>,
}

impl TryFrom<RegistryArguments> for Registry {
    type Error = anyhow::Error;

    fn try_from(value: RegistryArguments) -> Result<Self, Self::Error> {
        Ok(match value.registry {
            Some(path) => Registry::from_path(&path)
                .with_context(|| format!("Loading registry from {}", path.display()))?,
            None => Registry::redhat(),
        })
    }
}

#[derive(Debug, clap::Parser)]
#[command(next_help_heading = "Storage")]
pub struct StoreArguments {
    /// Directory to store the decompressed documents in, defaults to the local directory.
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Disable applying the modification timestamp to the downloaded file.
    #[arg(long)]
    pub no_timestamps: bool,

    /// Maximum decompressed size of a single document, in bytes. Zero means, unlimited.
    #[arg(long, default_value_t = 0)]
    pub limit: usize,
}

impl StoreArguments {
    pub fn resolver(&self) -> anyhow::Result<PathResolver> {
        let root = match &self.data {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("Get current working directory")?,
        };

        Ok(PathResolver::new(root))
    }

    pub fn downloader(&self, fetcher: Fetcher) -> anyhow::Result<Downloader> {
        Ok(Downloader::new(fetcher, self.resolver()?).with_options(
            DownloadOptions::new()
                .limit(self.limit)
                .no_timestamps(self.no_timestamps),
        ))
    }
}

#[derive(Debug, clap::Parser)]
#[command(next_help_heading = "Processing")]
pub struct RunnerArguments {
    /// Number of concurrent downloads. Zero means, unlimited.
    #[arg(short, long, default_value_t = 1)]
    pub workers: usize,
}

impl From<RunnerArguments> for ProviderOptions {
    fn from(value: RunnerArguments) -> Self {
        ProviderOptions::new().workers(value.workers)
    }
}

#[derive(Debug, clap::Parser)]
#[command(next_help_heading = "Parsing")]
pub struct ParseArguments {
    /// The reference source providing the identifier of an advisory.
    #[arg(long, default_value = "RHSA")]
    pub key_source: String,

    /// Definition classes to accept. Accepts all classes if given an empty value.
    #[arg(long, default_values_t = ["patch".to_string()])]
    pub class: Vec<String>,
}

impl Default for ParseArguments {
    fn default() -> Self {
        let config = DefinitionConfig::default();
        Self {
            key_source: config.key_source,
            class: config.classes,
        }
    }
}

impl From<ParseArguments> for DefinitionConfig {
    fn from(value: ParseArguments) -> Self {
        DefinitionConfig {
            key_source: value.key_source,
            classes: value
                .class
                .into_iter()
                .filter(|class| !class.is_empty())
                .collect(),
        }
    }
}

/// Everything required to set up an [`OvalProvider`].
pub struct ProviderArguments {
    pub client: ClientArguments,
    pub registry: RegistryArguments,
    pub store: StoreArguments,
    pub runner: RunnerArguments,
    pub parse: ParseArguments,
}

impl ProviderArguments {
    pub async fn into_provider<P: Progress>(
        self,
        progress: P,
    ) -> anyhow::Result<OvalProvider<DefinitionWalker, P>> {
        let registry = self.registry.try_into()?;
        let fetcher = self.client.new_fetcher().await?;
        let downloader = self.store.downloader(fetcher)?;
        let adapter = ParserAdapter::new(DefinitionWalker, self.parse.into());

        Ok(OvalProvider::new(registry, downloader, adapter)
            .with_options(self.runner.into())
            .with_progress(progress))
    }
}
