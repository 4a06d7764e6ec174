use super::{DecompressingWriter, LimitWriter};
use std::io::Write;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Compression {
    None,
    #[cfg(feature = "bzip2")]
    Bzip2,
    #[cfg(feature = "liblzma")]
    Xz,
    #[cfg(feature = "flate2")]
    Gzip,
}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DecompressionOptions {
    /// The maximum decompressed payload size.
    ///
    /// If the size of the uncompressed payload exceeds this limit, and error would be returned
    /// instead. Zero means, unlimited.
    pub limit: usize,
}

impl DecompressionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limit of the maximum uncompressed payload size.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl Compression {
    /// Detect the compression by the extension of the file name.
    ///
    /// An unknown extension, or one whose codec isn't enabled, is treated as uncompressed.
    pub fn detect(file_name: &str) -> Self {
        #[cfg(feature = "bzip2")]
        if file_name.ends_with(".bz2") {
            return Self::Bzip2;
        }
        #[cfg(feature = "liblzma")]
        if file_name.ends_with(".xz") {
            return Self::Xz;
        }
        #[cfg(feature = "flate2")]
        if file_name.ends_with(".gz") {
            return Self::Gzip;
        }

        Self::None
    }

    /// The file name extension (including the dot) this compression is detected by.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            #[cfg(feature = "bzip2")]
            Self::Bzip2 => Some(".bz2"),
            #[cfg(feature = "liblzma")]
            Self::Xz => Some(".xz"),
            #[cfg(feature = "flate2")]
            Self::Gzip => Some(".gz"),
        }
    }

    /// Strip the compression extension from a file name.
    ///
    /// Returns the name unchanged for [`Compression::None`], or if the name doesn't carry the
    /// extension.
    pub fn strip_suffix<'a>(&self, name: &'a str) -> &'a str {
        self.extension()
            .and_then(|ext| name.strip_suffix(ext))
            .unwrap_or(name)
    }

    /// Wrap a writer, decompressing everything written to it.
    pub fn writer<W: Write>(&self, writer: W) -> DecompressingWriter<W> {
        match self {
            Self::None => DecompressingWriter::None(writer),
            #[cfg(feature = "bzip2")]
            Self::Bzip2 => DecompressingWriter::Bzip2(bzip2::write::BzDecoder::new(writer)),
            #[cfg(feature = "liblzma")]
            Self::Xz => DecompressingWriter::Xz(liblzma::write::XzDecoder::new(writer)),
            #[cfg(feature = "flate2")]
            Self::Gzip => DecompressingWriter::Gzip(flate2::write::GzDecoder::new(writer)),
        }
    }

    /// Wrap a writer, decompressing everything written to it, applying the options.
    pub fn writer_with<W: Write>(
        &self,
        writer: W,
        opts: &DecompressionOptions,
    ) -> DecompressingWriter<LimitWriter<W>> {
        let limit = match opts.limit {
            0 => usize::MAX,
            n => n,
        };
        self.writer(LimitWriter::new(writer, limit))
    }
}
