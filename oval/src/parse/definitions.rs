//! A walker over the definitions of an OVAL document
//!
//! Only the `<definitions>` section is read, tests, objects, and states are skipped. Each
//! definition becomes one [`Definition`], keyed by the advisory it belongs to.

use super::{Catalog, OvalWalker};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed OVAL document {}: {source}", path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },
    #[error("definition without an id in {}", path.display())]
    MissingId { path: PathBuf },
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Reference {
    pub source: Option<String>,
    pub ref_id: Option<String>,
    pub ref_url: Option<String>,
}

/// The metadata of an OVAL definition.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Definition {
    /// The OVAL id, like `oval:com.redhat.rhsa:def:20200001`.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cves: Vec<String>,
}

impl Definition {
    /// The identifier to use in the catalog.
    ///
    /// This is the `ref_id` of the first reference from `key_source`, or the OVAL id if there is
    /// none.
    pub fn key(&self, key_source: &str) -> &str {
        self.references
            .iter()
            .find(|r| r.source.as_deref() == Some(key_source))
            .and_then(|r| r.ref_id.as_deref())
            .unwrap_or(&self.id)
    }

    fn push_text(&mut self, field: Field, text: String) {
        match field {
            Field::Title => self.title = Some(text),
            Field::Description => self.description = Some(text),
            Field::Severity => self.severity = Some(text),
            Field::Platform => self.platforms.push(text),
            Field::Cve => self.cves.push(text),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefinitionConfig {
    /// The reference source providing the catalog identifier.
    pub key_source: String,
    /// Definition classes to accept. Empty means, all.
    pub classes: Vec<String>,
}

impl Default for DefinitionConfig {
    fn default() -> Self {
        Self {
            key_source: "RHSA".to_string(),
            classes: vec!["patch".to_string()],
        }
    }
}

impl DefinitionConfig {
    fn accepts(&self, definition: &Definition) -> bool {
        self.classes.is_empty()
            || definition
                .class
                .as_ref()
                .is_some_and(|class| self.classes.contains(class))
    }
}

/// Elements carrying text content we are interested in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Field {
    Title,
    Description,
    Severity,
    Platform,
    Cve,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DefinitionWalker;

impl OvalWalker for DefinitionWalker {
    type Config = DefinitionConfig;
    type Record = Definition;
    type Error = Error;

    fn parse(
        &self,
        path: &Path,
        config: &Self::Config,
        existing: &Catalog<Self::Record>,
    ) -> Result<Catalog<Self::Record>, Self::Error> {
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let xml = |source: quick_xml::Error| Error::Xml {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = Reader::from_reader(BufReader::new(file));
        reader.config_mut().trim_text(true);

        let mut result = Catalog::new();
        let mut accept = |definition: Definition| {
            if !config.accepts(&definition) {
                return;
            }
            let key = definition.key(&config.key_source).to_string();
            if existing.contains_key(&key) {
                log::debug!("{key} superseded by {}", path.display());
            }
            result.insert(key, definition);
        };

        let mut buf = Vec::new();
        let mut current: Option<Definition> = None;
        let mut field: Option<Field> = None;

        loop {
            match reader.read_event_into(&mut buf).map_err(xml)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"definition" => current = Some(new_definition(&e, path)?),
                    _ => {
                        if let Some(definition) = &mut current {
                            field = start_element(&e, definition).map_err(xml)?;
                        }
                    }
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"definition" => accept(new_definition(&e, path)?),
                    _ => {
                        if let Some(definition) = &mut current {
                            start_element(&e, definition).map_err(xml)?;
                        }
                    }
                },
                Event::Text(text) => {
                    if let (Some(definition), Some(field)) = (&mut current, field) {
                        let text = text.unescape().map_err(xml)?;
                        definition.push_text(field, text.into_owned());
                    }
                }
                Event::End(e) => {
                    field = None;
                    match e.local_name().as_ref() {
                        b"definition" => {
                            if let Some(definition) = current.take() {
                                accept(definition);
                            }
                        }
                        // nothing of interest follows
                        b"definitions" => break,
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(result)
    }
}

fn attribute(e: &BytesStart, name: &[u8]) -> Result<Option<String>, quick_xml::Error> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn new_definition(e: &BytesStart, path: &Path) -> Result<Definition, Error> {
    let xml = |source: quick_xml::Error| Error::Xml {
        path: path.to_path_buf(),
        source,
    };

    let id = attribute(e, b"id")
        .map_err(xml)?
        .ok_or_else(|| Error::MissingId {
            path: path.to_path_buf(),
        })?;

    Ok(Definition {
        id,
        class: attribute(e, b"class").map_err(xml)?,
        version: attribute(e, b"version").map_err(xml)?,
        ..Default::default()
    })
}

/// Handle an element inside a definition, returning the field its text belongs to.
fn start_element(
    e: &BytesStart,
    definition: &mut Definition,
) -> Result<Option<Field>, quick_xml::Error> {
    Ok(match e.local_name().as_ref() {
        b"title" => Some(Field::Title),
        b"description" => Some(Field::Description),
        b"severity" => Some(Field::Severity),
        b"platform" => Some(Field::Platform),
        b"cve" => Some(Field::Cve),
        b"reference" => {
            definition.references.push(Reference {
                source: attribute(e, b"source")?,
                ref_id: attribute(e, b"ref_id")?,
                ref_url: attribute(e, b"ref_url")?,
            });
            None
        }
        b"issued" => {
            definition.issued = attribute(e, b"date")?;
            None
        }
        b"updated" => {
            definition.updated = attribute(e, b"date")?;
            None
        }
        _ => None,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    const DOCUMENT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<oval_definitions xmlns="http://oval.mitre.org/XMLSchema/oval-definitions-5">
  <definitions>
    <definition class="patch" id="oval:com.redhat.rhsa:def:20200001" version="635">
      <metadata>
        <title>RHSA-2020:0001: kernel security update (Important)</title>
        <affected family="unix">
          <platform>Red Hat Enterprise Linux 8</platform>
        </affected>
        <reference ref_id="RHSA-2020:0001" ref_url="https://access.redhat.com/errata/RHSA-2020:0001" source="RHSA"/>
        <reference ref_id="CVE-2019-0001" ref_url="https://access.redhat.com/security/cve/CVE-2019-0001" source="CVE"/>
        <description>The kernel packages contain the Linux kernel &amp; modules.</description>
        <advisory from="secalert@redhat.com">
          <severity>Important</severity>
          <issued date="2020-01-02"/>
          <updated date="2020-01-03"/>
          <cve cvss3="7.8/CVSS:3.0" href="https://access.redhat.com/security/cve/CVE-2019-0001">CVE-2019-0001</cve>
        </advisory>
      </metadata>
      <criteria operator="OR"/>
    </definition>
    <definition class="inventory" id="oval:com.redhat.rhsa:def:20200002" version="1">
      <metadata>
        <title>Red Hat Enterprise Linux 8 is installed</title>
      </metadata>
    </definition>
    <definition class="patch" id="oval:com.redhat.rhba:def:20200003" version="1">
      <metadata>
        <title>unreferenced</title>
      </metadata>
    </definition>
  </definitions>
  <tests>
    <this_is_not_parsed>
  </tests>
</oval_definitions>
"#;

    fn write(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("must create temp file");
        file.write_all(content.as_bytes()).expect("must write");
        file
    }

    #[test]
    fn parse_definitions() {
        let file = write(DOCUMENT);
        let catalog = DefinitionWalker
            .parse(file.path(), &Default::default(), &Catalog::new())
            .expect("must parse");

        assert_eq!(catalog.len(), 2);

        let rhsa = &catalog["RHSA-2020:0001"];
        assert_eq!(rhsa.id, "oval:com.redhat.rhsa:def:20200001");
        assert_eq!(rhsa.class.as_deref(), Some("patch"));
        assert_eq!(rhsa.severity.as_deref(), Some("Important"));
        assert_eq!(rhsa.issued.as_deref(), Some("2020-01-02"));
        assert_eq!(rhsa.updated.as_deref(), Some("2020-01-03"));
        assert_eq!(rhsa.platforms, vec!["Red Hat Enterprise Linux 8"]);
        assert_eq!(rhsa.cves, vec!["CVE-2019-0001"]);
        assert_eq!(rhsa.references.len(), 2);
        assert_eq!(
            rhsa.description.as_deref(),
            Some("The kernel packages contain the Linux kernel & modules.")
        );

        // falls back to the OVAL id
        assert!(catalog.contains_key("oval:com.redhat.rhba:def:20200003"));
    }

    #[test]
    fn all_classes() {
        let file = write(DOCUMENT);
        let config = DefinitionConfig {
            classes: vec![],
            ..Default::default()
        };
        let catalog = DefinitionWalker
            .parse(file.path(), &config, &Catalog::new())
            .expect("must parse");

        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn malformed() {
        let file = write("<oval_definitions><definitions><definition id=\"x\"></oops>");
        let err = DefinitionWalker
            .parse(file.path(), &Default::default(), &Catalog::new())
            .expect_err("must fail");
        assert!(matches!(err, Error::Xml { .. }));
    }

    #[test]
    fn missing_id() {
        let file = write("<oval_definitions><definitions><definition class=\"patch\"/></definitions></oval_definitions>");
        let err = DefinitionWalker
            .parse(file.path(), &Default::default(), &Catalog::new())
            .expect_err("must fail");
        assert!(matches!(err, Error::MissingId { .. }));
    }

    #[test]
    fn missing_file() {
        let err = DefinitionWalker
            .parse(
                Path::new("/does/not/exist.xml"),
                &Default::default(),
                &Catalog::new(),
            )
            .expect_err("must fail");
        assert!(matches!(err, Error::Io { .. }));
    }
}
