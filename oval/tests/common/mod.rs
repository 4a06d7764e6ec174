#![allow(dead_code)]

use feed_common::fetcher::{Fetcher, FetcherOptions};
use oval_walker::download::Downloader;
use oval_walker::manifest::Registry;
use oval_walker::parse::ParserAdapter;
use oval_walker::parse::definitions::DefinitionWalker;
use oval_walker::provider::OvalProvider;
use oval_walker::resolve::PathResolver;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn bzip2(data: &str) -> Vec<u8> {
    let mut encoder = bzip2::write::BzEncoder::new(vec![], bzip2::Compression::fast());
    encoder.write_all(data.as_bytes()).expect("must encode");
    encoder.finish().expect("must finish encoding")
}

/// An OVAL document, with one patch definition per `(advisory, title)`.
pub fn document(definitions: &[(&str, &str)]) -> String {
    let definitions: String = definitions
        .iter()
        .enumerate()
        .map(|(n, (advisory, title))| {
            format!(
                r#"
    <definition class="patch" id="oval:com.redhat.rhsa:def:{n}" version="1">
      <metadata>
        <title>{title}</title>
        <reference ref_id="{advisory}" ref_url="https://access.redhat.com/errata/{advisory}" source="RHSA"/>
      </metadata>
    </definition>"#
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<oval_definitions xmlns="http://oval.mitre.org/XMLSchema/oval-definitions-5">
  <definitions>{definitions}
  </definitions>
</oval_definitions>
"#
    )
}

pub async fn fetcher(attempts: usize) -> Fetcher {
    Fetcher::new(
        FetcherOptions::new()
            .timeout(Duration::from_secs(10))
            .attempts(attempts)
            .min_delay(Duration::from_millis(1))
            .max_delay(Duration::from_millis(10)),
    )
    .await
    .expect("must create fetcher")
}

pub async fn downloader(root: &Path, attempts: usize) -> Downloader {
    Downloader::new(fetcher(attempts).await, PathResolver::new(root))
}

pub async fn provider(
    root: &Path,
    registry: Registry,
    attempts: usize,
) -> OvalProvider<DefinitionWalker> {
    OvalProvider::new(
        registry,
        downloader(root, attempts).await,
        ParserAdapter::new(DefinitionWalker, Default::default()),
    )
}
