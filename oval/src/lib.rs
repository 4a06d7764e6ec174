//! Ingesting OVAL vulnerability feeds
//!
//! ## Idea
//!
//! Vendors publish their security advisories as compressed OVAL documents. A
//! [`manifest::Registry`] lists the feeds to ingest. The [`provider::OvalProvider`] downloads all
//! documents into a workspace directory, decompressing them on the fly, and then runs an
//! [`parse::OvalWalker`] over each of them, merging the results into a single
//! [`parse::Catalog`].
//!
//! The merge order is the order of the registry: if two documents define the same identifier,
//! the record of the later one is kept.
//!
//! ## Example
//!
//! ```rust,no_run
//! use feed_common::fetcher::Fetcher;
//! use oval_walker::download::Downloader;
//! use oval_walker::manifest::Registry;
//! use oval_walker::parse::{ParserAdapter, definitions::DefinitionWalker};
//! use oval_walker::provider::OvalProvider;
//! use oval_walker::resolve::PathResolver;
//!
//! async fn ingest() -> anyhow::Result<()> {
//!   let fetcher = Fetcher::new(Default::default()).await?;
//!   let downloader = Downloader::new(fetcher, PathResolver::new("workspace/input"));
//!   let adapter = ParserAdapter::new(DefinitionWalker, Default::default());
//!
//!   let mut provider = OvalProvider::new(Registry::redhat(), downloader, adapter);
//!   let catalog = provider.get().await?;
//!
//!   log::info!("Found {} advisories, from: {:?}", catalog.len(), provider.urls());
//!
//!   Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used)]

pub mod download;
pub mod manifest;
pub mod parse;
pub mod provider;
pub mod resolve;
