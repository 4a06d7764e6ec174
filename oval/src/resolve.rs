//! Mapping feed paths to the workspace

use feed_common::compression::Compression;
use std::path::{Component, Path, PathBuf};

/// Resolves feed relative paths of compressed documents to their decompressed location in
/// the workspace.
#[derive(Clone, Debug)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The input root of the workspace.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The compression of a document, detected by its name.
    pub fn compression(&self, oval_path: &str) -> Compression {
        Compression::detect(oval_path)
    }

    /// The location of the decompressed document.
    ///
    /// The compression suffix is stripped, subdirectories are kept. Components which would
    /// escape the workspace (like `..` or a leading `/`) are dropped. A path without any
    /// remaining component resolves to the root itself, see [`Self::target`].
    pub fn resolve(&self, oval_path: &str) -> PathBuf {
        self.components(oval_path)
            .fold(self.root.clone(), |path, c| path.join(c))
    }

    /// The location of the decompressed document, if that is a file inside the workspace.
    ///
    /// Returns [`None`] for paths like `""`, `".."`, or a bare `".bz2"`.
    pub fn target(&self, oval_path: &str) -> Option<PathBuf> {
        self.components(oval_path)
            .next()
            .map(|_| self.resolve(oval_path))
    }

    /// Check if the decompressed document is present in the workspace.
    pub fn available(&self, oval_path: &str) -> bool {
        self.target(oval_path).is_some_and(|path| path.is_file())
    }

    fn components<'a>(&self, oval_path: &'a str) -> impl Iterator<Item = &'a std::ffi::OsStr> {
        let name = self.compression(oval_path).strip_suffix(oval_path);

        Path::new(name).components().filter_map(|c| match c {
            Component::Normal(c) => Some(c),
            _ => None,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strip_suffix_keep_dirs() {
        let resolver = PathResolver::new("/var/lib/oval/input");
        assert_eq!(
            resolver.resolve("RHEL8/rhel-8.oval.xml.bz2"),
            Path::new("/var/lib/oval/input/RHEL8/rhel-8.oval.xml")
        );
    }

    #[test]
    fn pure() {
        let resolver = PathResolver::new("input");
        let first = resolver.resolve("RHEL9/rhel-9.oval.xml.bz2");
        let second = resolver.resolve("RHEL9/rhel-9.oval.xml.bz2");
        assert_eq!(first, second);
        assert!(!first.exists());
    }

    #[test]
    fn uncompressed_kept() {
        let resolver = PathResolver::new("input");
        assert_eq!(
            resolver.resolve("plain.oval.xml"),
            Path::new("input/plain.oval.xml")
        );
    }

    #[test]
    fn stays_in_workspace() {
        let resolver = PathResolver::new("input");
        assert_eq!(
            resolver.resolve("../../etc/a.xml.bz2"),
            Path::new("input/etc/a.xml")
        );
        assert_eq!(resolver.resolve("/abs/a.xml.bz2"), Path::new("input/abs/a.xml"));
    }

    #[test]
    fn base_url_is_not_part_of_the_path() {
        // entries of different origins, sharing a relative path, share the location
        let resolver = PathResolver::new("input");
        assert_eq!(resolver.resolve("a.xml.bz2"), Path::new("input/a.xml"));
    }

    #[test]
    fn no_target_outside_workspace() {
        let resolver = PathResolver::new("input");
        assert_eq!(resolver.target(""), None);
        assert_eq!(resolver.target(".."), None);
        assert_eq!(resolver.target("/"), None);
        assert_eq!(
            resolver.target("RHEL8/rhel-8.oval.xml.bz2"),
            Some(PathBuf::from("input/RHEL8/rhel-8.oval.xml"))
        );
    }

    #[cfg(feature = "bzip2")]
    #[test]
    fn bare_suffix_has_no_target() {
        let resolver = PathResolver::new("input");
        assert_eq!(resolver.target(".bz2"), None);
        assert!(!resolver.available(".bz2"));
    }

    #[test]
    fn available() {
        let dir = tempfile::tempdir().expect("must create temp dir");
        let resolver = PathResolver::new(dir.path());
        assert!(!resolver.available("RHEL5/rhel-5.xml.bz2"));

        std::fs::create_dir_all(dir.path().join("RHEL5")).expect("must create dir");
        std::fs::write(dir.path().join("RHEL5/rhel-5.xml"), "<oval_definitions/>")
            .expect("must write");
        assert!(resolver.available("RHEL5/rhel-5.xml.bz2"));
    }
}
