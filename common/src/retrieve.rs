//! Metadata of retrieved content

use anyhow::Context;
use reqwest::{Response, header};
use std::path::Path;
use std::time::SystemTime;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc2822;

/// Metadata of the retrieval process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RetrievalMetadata {
    /// Last known modification time
    pub last_modification: Option<OffsetDateTime>,
}

impl RetrievalMetadata {
    /// Extract the metadata from the headers of a response.
    pub fn from_response(response: &Response) -> Self {
        let last_modification = response
            .headers()
            .get(header::LAST_MODIFIED)
            .and_then(|s| s.to_str().ok())
            .and_then(parse_http_date);

        Self { last_modification }
    }

    /// Apply the last modification timestamp to a file, if known.
    pub fn apply_mtime(&self, file: &Path) -> anyhow::Result<()> {
        if let Some(last_modification) = self.last_modification {
            let mtime = SystemTime::from(last_modification).into();
            filetime::set_file_mtime(file, mtime).with_context(|| {
                format!(
                    "Failed to set last modification timestamp: {}",
                    file.display()
                )
            })?;
        }

        Ok(())
    }
}

fn parse_http_date(value: &str) -> Option<OffsetDateTime> {
    // RFC 2822 doesn't know "GMT" as a zone, HTTP dates always use it
    let value = value
        .strip_suffix(" GMT")
        .map(|s| format!("{s} +0000"))
        .unwrap_or_else(|| value.to_string());
    OffsetDateTime::parse(&value, &Rfc2822).ok()
}
