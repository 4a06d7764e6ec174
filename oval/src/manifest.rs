//! The registry of known feeds
//!
//! Every entry describes one generation of a vendor's feed: where it is hosted, the manifest
//! listing its content, and the OVAL documents to ingest. The order of the entries, and of the
//! documents inside each entry, defines the merge order of the final catalog: if two documents
//! define the same identifier, the later one wins.

use feed_common::utils::url::join_path;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A single feed generation.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedManifestEntry {
    /// The URL all paths of this entry are relative to.
    pub base_url: String,
    /// The path to the manifest, only used for provenance.
    pub manifest_path: String,
    /// The compressed OVAL documents, in merge order.
    pub oval_paths: Vec<String>,
    /// The feed is no longer available for download. Its documents may still be provided by
    /// placing them in the workspace up front.
    #[serde(default)]
    pub skip_download: bool,
}

impl FeedManifestEntry {
    pub fn new(
        base_url: impl Into<String>,
        manifest_path: impl Into<String>,
        oval_paths: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            manifest_path: manifest_path.into(),
            oval_paths: oval_paths.into_iter().map(Into::into).collect(),
            skip_download: false,
        }
    }

    pub fn skip_download(mut self, skip_download: bool) -> Self {
        self.skip_download = skip_download;
        self
    }

    /// The absolute URL of the manifest.
    pub fn manifest_url(&self) -> String {
        join_path(&self.base_url, &self.manifest_path)
    }

    /// The absolute URL of an OVAL document of this entry.
    pub fn oval_url(&self, oval_path: &str) -> String {
        join_path(&self.base_url, oval_path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read registry: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse registry: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An ordered list of feeds.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Registry {
    entries: Vec<FeedManifestEntry>,
}

const REDHAT_OVAL_V1: &str = "https://access.redhat.com/security/data/oval";
const REDHAT_OVAL_V2: &str = "https://access.redhat.com/security/data/oval/v2";
const PULP_MANIFEST: &str = "PULP_MANIFEST";

impl Registry {
    pub fn new(entries: impl IntoIterator<Item = FeedManifestEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// The Red Hat Enterprise Linux feeds.
    ///
    /// The original (v1) feed has been retired upstream. It is only processed if its document
    /// was preloaded into the workspace.
    pub fn redhat() -> Self {
        Self::new([
            FeedManifestEntry::new(
                REDHAT_OVAL_V1,
                PULP_MANIFEST,
                ["com.redhat.rhsa-RHEL5.xml.bz2"],
            )
            .skip_download(true),
            FeedManifestEntry::new(
                REDHAT_OVAL_V2,
                PULP_MANIFEST,
                [
                    "RHEL6/rhel-6.oval.xml.bz2",
                    "RHEL7/rhel-7.oval.xml.bz2",
                    "RHEL8/rhel-8.oval.xml.bz2",
                    "RHEL9/rhel-9.oval.xml.bz2",
                ],
            ),
        ])
    }

    /// Read a registry from a JSON array of entries.
    pub fn from_reader(reader: impl Read) -> Result<Self, RegistryError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read a registry from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn entries(&self) -> &[FeedManifestEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedManifestEntry> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a FeedManifestEntry;
    type IntoIter = std::slice::Iter<'a, FeedManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<FeedManifestEntry> for Registry {
    fn from_iter<T: IntoIterator<Item = FeedManifestEntry>>(iter: T) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn urls() {
        let entry = FeedManifestEntry::new("http://x/", "PULP_MANIFEST", ["RHEL8/a.xml.bz2"]);
        assert_eq!(entry.manifest_url(), "http://x/PULP_MANIFEST");
        assert_eq!(entry.oval_url("RHEL8/a.xml.bz2"), "http://x/RHEL8/a.xml.bz2");
    }

    #[test]
    fn redhat_order() {
        let registry = Registry::redhat();
        assert_eq!(registry.len(), 2);
        assert!(registry.entries()[0].skip_download);
        assert!(!registry.entries()[1].skip_download);
        assert_eq!(
            registry.entries()[1].oval_paths.last().map(String::as_str),
            Some("RHEL9/rhel-9.oval.xml.bz2")
        );
    }

    #[test]
    fn from_json() {
        let registry = Registry::from_reader(
            br#"[
  { "baseUrl": "http://x", "manifestPath": "PULP_MANIFEST", "ovalPaths": ["a.xml.bz2"] },
  { "baseUrl": "http://y", "manifestPath": "PULP_MANIFEST", "ovalPaths": ["a.xml.bz2"], "skipDownload": true }
]"# as &[u8],
        )
        .expect("must parse");

        assert_eq!(
            registry,
            Registry::new([
                FeedManifestEntry::new("http://x", "PULP_MANIFEST", ["a.xml.bz2"]),
                FeedManifestEntry::new("http://y", "PULP_MANIFEST", ["a.xml.bz2"]).skip_download(true),
            ])
        );
    }

    #[test]
    fn invalid_json() {
        assert!(matches!(
            Registry::from_reader(&b"{}"[..]),
            Err(RegistryError::Parse(_))
        ));
    }
}
