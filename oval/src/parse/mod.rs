//! Parsing OVAL documents into a catalog
//!
//! The structure of an OVAL document is handled by an [`OvalWalker`]. This module only runs the
//! walker over a list of documents, and merges the results.

pub mod definitions;

use std::collections::BTreeMap;
use std::path::Path;

/// Vulnerability records, by their identifier.
pub type Catalog<R> = BTreeMap<String, R>;

/// Turns a single OVAL document into vulnerability records.
pub trait OvalWalker {
    type Config;
    type Record;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Parse the document at `path`.
    ///
    /// `existing` holds everything parsed from previous documents, and may be used to resolve
    /// references between documents. The result must only contain the records of the parsed
    /// document. It is merged into the existing records by the caller.
    fn parse(
        &self,
        path: &Path,
        config: &Self::Config,
        existing: &Catalog<Self::Record>,
    ) -> Result<Catalog<Self::Record>, Self::Error>;
}

/// Runs an [`OvalWalker`] over documents, merging the results.
///
/// When more than one document defines a record with the same identifier, the one from the
/// document parsed last wins.
pub struct ParserAdapter<W: OvalWalker> {
    walker: W,
    config: W::Config,
}

impl<W> ParserAdapter<W>
where
    W: OvalWalker,
{
    pub fn new(walker: W, config: W::Config) -> Self {
        Self { walker, config }
    }

    /// Parse all documents, in order, into a new catalog.
    ///
    /// The first error aborts the process and is returned as is.
    pub fn parse_all<P>(
        &self,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<Catalog<W::Record>, W::Error>
    where
        P: AsRef<Path>,
    {
        let mut catalog = Catalog::new();
        for path in paths {
            self.parse_into(path.as_ref(), &mut catalog)?;
        }
        Ok(catalog)
    }

    /// Parse a single document, merging its records into `catalog`.
    pub fn parse_into(
        &self,
        path: &Path,
        catalog: &mut Catalog<W::Record>,
    ) -> Result<(), W::Error> {
        log::info!("Parsing {}", path.display());

        let partial = self.walker.parse(path, &self.config, catalog)?;
        let records = partial.len();
        catalog.extend(partial);

        log::info!(
            "Parsed {}: {records} records, {} total",
            path.display(),
            catalog.len()
        );

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::convert::Infallible;

    /// Emits a record for every configured identifier, holding the file name.
    struct NameWalker;

    impl OvalWalker for NameWalker {
        type Config = Vec<&'static str>;
        type Record = String;
        type Error = Infallible;

        fn parse(
            &self,
            path: &Path,
            config: &Self::Config,
            _existing: &Catalog<Self::Record>,
        ) -> Result<Catalog<Self::Record>, Self::Error> {
            let name = path.display().to_string();
            Ok(config
                .iter()
                .map(|id| (id.to_string(), name.clone()))
                .collect())
        }
    }

    #[test]
    fn empty() {
        let adapter = ParserAdapter::new(NameWalker, vec!["RHSA-2020:0001"]);
        let catalog = adapter
            .parse_all(Vec::<&Path>::new())
            .expect("must not fail");
        assert!(catalog.is_empty());
    }

    #[test]
    fn last_write_wins() {
        let adapter = ParserAdapter::new(NameWalker, vec!["RHSA-2020:0001", "RHSA-2020:0002"]);
        let catalog = adapter
            .parse_all(["first.xml", "second.xml"])
            .expect("must not fail");

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog["RHSA-2020:0001"], "second.xml");
        assert_eq!(catalog["RHSA-2020:0002"], "second.xml");
    }

    #[derive(Debug, thiserror::Error)]
    #[error("broken: {0}")]
    struct Broken(String);

    struct FailingWalker;

    impl OvalWalker for FailingWalker {
        type Config = ();
        type Record = ();
        type Error = Broken;

        fn parse(
            &self,
            path: &Path,
            _config: &Self::Config,
            existing: &Catalog<Self::Record>,
        ) -> Result<Catalog<Self::Record>, Self::Error> {
            if existing.is_empty() {
                Ok(Catalog::from([(path.display().to_string(), ())]))
            } else {
                Err(Broken(path.display().to_string()))
            }
        }
    }

    #[test]
    fn error_is_returned_unchanged() {
        let adapter = ParserAdapter::new(FailingWalker, ());
        let err = adapter
            .parse_all(["a.xml", "b.xml", "c.xml"])
            .expect_err("must fail");
        assert_eq!(err.0, "b.xml");
    }
}
