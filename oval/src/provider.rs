//! Running the full pipeline: download, then parse

use crate::download::{DownloadError, Downloader};
use crate::manifest::Registry;
use crate::parse::{Catalog, OvalWalker, ParserAdapter};
use feed_common::progress::{Progress, ProgressBar};
use feed_common::utils::url::join_path;
use futures::{StreamExt, stream};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error<WE>
where
    WE: std::error::Error,
{
    #[error(transparent)]
    Download(#[from] DownloadError),
    #[error(transparent)]
    Parse(WE),
}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderOptions {
    /// Number of concurrent downloads. Zero means, unlimited.
    pub workers: usize,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

impl ProviderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }
}

/// All URLs a registry refers to: the manifest and every document of each entry.
///
/// This includes entries which are not downloaded.
pub fn provenance(registry: &Registry) -> BTreeSet<String> {
    registry
        .iter()
        .flat_map(|entry| {
            entry
                .oval_paths
                .iter()
                .flat_map(move |path| [entry.manifest_url(), entry.oval_url(path)])
        })
        .collect()
}

/// Builds a catalog from all feeds of a registry.
pub struct OvalProvider<W, P = ()>
where
    W: OvalWalker,
    P: Progress,
{
    registry: Registry,
    downloader: Downloader,
    adapter: ParserAdapter<W>,
    options: ProviderOptions,
    progress: P,
    urls: BTreeSet<String>,
}

impl<W> OvalProvider<W>
where
    W: OvalWalker,
{
    pub fn new(registry: Registry, downloader: Downloader, adapter: ParserAdapter<W>) -> Self {
        Self {
            registry,
            downloader,
            adapter,
            options: Default::default(),
            progress: (),
            urls: Default::default(),
        }
    }
}

impl<W, P> OvalProvider<W, P>
where
    W: OvalWalker,
    P: Progress,
{
    pub fn with_options(mut self, options: ProviderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_progress<P2: Progress>(self, progress: P2) -> OvalProvider<W, P2> {
        OvalProvider {
            registry: self.registry,
            downloader: self.downloader,
            adapter: self.adapter,
            options: self.options,
            progress,
            urls: self.urls,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The URLs of all feeds processed so far, no matter if that was successful.
    pub fn urls(&self) -> &BTreeSet<String> {
        &self.urls
    }

    /// Download and parse all feeds, returning the merged catalog.
    ///
    /// Any failure aborts the whole run.
    pub async fn get(&mut self) -> Result<Catalog<W::Record>, Error<W::Error>> {
        self.download().await?;
        self.parse().await.map_err(Error::Parse)
    }

    /// Download all documents of entries which are not marked as `skip_download`.
    ///
    /// Documents are independent of each other, so they may be downloaded concurrently. The
    /// first failure is returned once all its retries are exhausted.
    ///
    /// Documents sharing a location in the workspace are only downloaded once, from the last
    /// entry referencing it. That is the content a sequential run would leave behind.
    pub async fn download(&mut self) -> Result<(), DownloadError> {
        self.urls.extend(provenance(&self.registry));

        let jobs = self.jobs();

        let workers = match self.options.workers {
            0 => jobs.len().max(1),
            n => n,
        };

        let mut bar = self.progress.start(jobs.len());
        bar.set_message("Downloading".to_string()).await;

        let downloader = &self.downloader;
        let mut downloads = stream::iter(jobs)
            .map(|(base_url, path)| downloader.download_oval_file(base_url, path))
            .buffer_unordered(workers);

        while let Some(result) = downloads.next().await {
            result?;
            bar.tick().await;
        }

        bar.finish().await;

        Ok(())
    }

    /// The downloads to perform, in registry order.
    fn jobs(&self) -> Vec<(&str, &str)> {
        let resolver = self.downloader.resolver();

        let jobs: Vec<_> = self
            .registry
            .iter()
            .filter(|entry| !entry.skip_download)
            .flat_map(|entry| {
                entry
                    .oval_paths
                    .iter()
                    .map(|path| (entry.base_url.as_str(), path.as_str()))
            })
            .collect();

        // the last job for each location wins
        let last: HashMap<PathBuf, usize> = jobs
            .iter()
            .enumerate()
            .map(|(n, (_, path))| (resolver.resolve(path), n))
            .collect();

        jobs.into_iter()
            .enumerate()
            .filter(|(n, (base_url, path))| {
                let superseded = last.get(&resolver.resolve(path)) != Some(n);
                if superseded {
                    log::debug!(
                        "Skipping {}: superseded by a later entry",
                        join_path(base_url, path)
                    );
                }
                !superseded
            })
            .map(|(_, job)| job)
            .collect()
    }

    /// The documents to parse, in merge order.
    ///
    /// Documents of `skip_download` entries are only included if they are present in the
    /// workspace.
    pub fn paths(&self) -> Vec<PathBuf> {
        let resolver = self.downloader.resolver();

        self.registry
            .iter()
            .flat_map(|entry| entry.oval_paths.iter().map(move |path| (entry, path)))
            .filter(|(entry, path)| {
                if entry.skip_download && !resolver.available(path) {
                    log::warn!(
                        "Skipping {}: not present at {}",
                        entry.oval_url(path),
                        resolver.resolve(path).display()
                    );
                    return false;
                }
                true
            })
            .map(|(_, path)| resolver.resolve(path))
            .collect()
    }

    /// Parse all documents present in the workspace, strictly in merge order.
    pub async fn parse(&self) -> Result<Catalog<W::Record>, W::Error> {
        let paths = self.paths();

        let mut bar = self.progress.start(paths.len());
        let mut catalog = Catalog::new();

        for path in paths {
            bar.set_message(path.display().to_string()).await;
            self.adapter.parse_into(&path, &mut catalog)?;
            bar.tick().await;
        }

        bar.finish().await;

        Ok(catalog)
    }
}
