//! Downloading feed documents into the workspace

use crate::resolve::PathResolver;
use feed_common::compression::{Compression, DecompressionOptions};
use feed_common::fetcher::{DataProcessor, Fetcher};
use feed_common::retrieve::RetrievalMetadata;
use feed_common::utils::url::join_path;
use reqwest::{Response, StatusCode};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The server responded with something else than `200 OK`.
    #[error("failed to fetch {url}: {status}")]
    Fetch { url: Url, status: StatusCode },
    /// Requesting, decompressing, or storing the document failed.
    #[error("failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: DownloadCause,
    },
    #[error("invalid feed URL {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// The feed path doesn't name a file inside the workspace.
    #[error("invalid feed path {path:?} of {url}")]
    Path { url: String, path: String },
}

impl DownloadError {
    /// The URL of the document which failed.
    pub fn url(&self) -> &str {
        match self {
            Self::Fetch { url, .. } => url.as_str(),
            Self::Download { url, .. } | Self::Url { url, .. } | Self::Path { url, .. } => url,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadCause {
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for DownloadError {
    fn from(err: reqwest::Error) -> Self {
        Self::Download {
            url: err.url().map(ToString::to_string).unwrap_or_default(),
            source: err.into(),
        }
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DownloadOptions {
    /// The maximum decompressed size of a single document. Zero means, unlimited.
    pub limit: usize,
    /// Don't apply the `Last-Modified` timestamp of the response to the downloaded file.
    pub no_timestamps: bool,
}

impl DownloadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn no_timestamps(mut self, no_timestamps: bool) -> Self {
        self.no_timestamps = no_timestamps;
        self
    }
}

/// Downloads compressed OVAL documents, storing them decompressed in the workspace.
#[derive(Clone, Debug)]
pub struct Downloader {
    fetcher: Fetcher,
    resolver: PathResolver,
    options: DownloadOptions,
}

impl Downloader {
    pub fn new(fetcher: Fetcher, resolver: PathResolver) -> Self {
        Self {
            fetcher,
            resolver,
            options: Default::default(),
        }
    }

    pub fn with_options(mut self, options: DownloadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Download a single document from `{base_url}/{oval_path}`.
    ///
    /// The response is decompressed while being received and stored at the location the
    /// [`PathResolver`] reports for `oval_path`. The whole operation is retried, according to
    /// the configuration of the [`Fetcher`]. On failure, no file is written at the target
    /// location. An existing file is only replaced on success.
    pub async fn download_oval_file(
        &self,
        base_url: &str,
        oval_path: &str,
    ) -> Result<(), DownloadError> {
        let url = join_path(base_url, oval_path);

        log::info!("Downloading {url}");

        let result = match self.resolver.target(oval_path) {
            Some(target) => self.fetch(&url, oval_path, &target).await,
            None => Err(DownloadError::Path {
                url: url.clone(),
                path: oval_path.to_string(),
            }),
        };

        match &result {
            Ok(()) => log::info!("Downloaded {url}"),
            Err(err) => log::error!("Failed to download {url}: {err}"),
        }

        result
    }

    async fn fetch(&self, url: &str, oval_path: &str, target: &Path) -> Result<(), DownloadError> {
        let parsed = Url::parse(url).map_err(|source| DownloadError::Url {
            url: url.to_string(),
            source,
        })?;

        let metadata = self
            .fetcher
            .fetch_processed(
                parsed,
                DecompressingFile {
                    target,
                    compression: self.resolver.compression(oval_path),
                    options: DecompressionOptions::new().limit(self.options.limit),
                },
            )
            .await?;

        if !self.options.no_timestamps {
            if let Err(err) = metadata.apply_mtime(target) {
                log::warn!("{err:#}");
            }
        }

        Ok(())
    }
}

/// Streams a response into a file, decompressing on the fly.
struct DecompressingFile<'a> {
    target: &'a Path,
    compression: Compression,
    options: DecompressionOptions,
}

impl DataProcessor for DecompressingFile<'_> {
    type Type = RetrievalMetadata;
    type Error = DownloadError;

    async fn process(&self, url: &Url, response: Response) -> Result<Self::Type, Self::Error> {
        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::Fetch {
                url: url.clone(),
                status,
            });
        }

        let metadata = RetrievalMetadata::from_response(&response);
        let partial = partial_path(self.target);

        match self.store(response, &partial).await {
            Ok(()) => Ok(metadata),
            Err(source) => {
                // the next attempt starts from scratch anyway
                let _ = fs::remove_file(&partial);
                Err(DownloadError::Download {
                    url: url.to_string(),
                    source,
                })
            }
        }
    }
}

impl DecompressingFile<'_> {
    async fn store(&self, mut response: Response, partial: &Path) -> Result<(), DownloadCause> {
        if let Some(parent) = self.target.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = BufWriter::new(File::create(partial)?);
        let mut writer = self.compression.writer_with(file, &self.options);

        while let Some(chunk) = response.chunk().await? {
            writer.write_all(&chunk)?;
        }

        let file = writer
            .finish()?
            .into_inner()
            .into_inner()
            .map_err(|err| err.into_error())?;
        file.sync_all()?;
        drop(file);

        fs::rename(partial, self.target)?;

        Ok(())
    }
}

/// The sibling file a document is written to, until it is complete.
fn partial_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(ToOwned::to_owned)
        .unwrap_or_else(OsString::new);
    name.push(".part");
    target.with_file_name(name)
}
