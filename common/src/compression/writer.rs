use std::io::{Result, Write};

/// A writer, decompressing data before handing it to the inner writer.
///
/// The writer must be closed using [`DecompressingWriter::finish`], otherwise trailing data may
/// be lost and a truncated stream goes unnoticed.
pub enum DecompressingWriter<W: Write> {
    None(W),
    #[cfg(feature = "bzip2")]
    Bzip2(bzip2::write::BzDecoder<W>),
    #[cfg(feature = "liblzma")]
    Xz(liblzma::write::XzDecoder<W>),
    #[cfg(feature = "flate2")]
    Gzip(flate2::write::GzDecoder<W>),
}

impl<W: Write> DecompressingWriter<W> {
    /// Finish the decompression stream, returning the inner writer.
    #[allow(unused_mut)]
    pub fn finish(self) -> Result<W> {
        match self {
            Self::None(w) => Ok(w),
            #[cfg(feature = "bzip2")]
            Self::Bzip2(mut w) => w.finish(),
            #[cfg(feature = "liblzma")]
            Self::Xz(mut w) => w.finish(),
            #[cfg(feature = "flate2")]
            Self::Gzip(mut w) => w.finish(),
        }
    }
}

impl<W: Write> Write for DecompressingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        match self {
            Self::None(w) => w.write(buf),
            #[cfg(feature = "bzip2")]
            Self::Bzip2(w) => w.write(buf),
            #[cfg(feature = "liblzma")]
            Self::Xz(w) => w.write(buf),
            #[cfg(feature = "flate2")]
            Self::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> Result<()> {
        match self {
            Self::None(w) => w.flush(),
            #[cfg(feature = "bzip2")]
            Self::Bzip2(w) => w.flush(),
            #[cfg(feature = "liblzma")]
            Self::Xz(w) => w.flush(),
            #[cfg(feature = "flate2")]
            Self::Gzip(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::compression::{Compression, DecompressionOptions};
    use std::io::Write;

    #[test]
    fn passthrough() {
        let mut w = Compression::None.writer(vec![]);
        w.write_all(b"<oval_definitions/>").expect("must write");
        assert_eq!(w.finish().expect("must finish"), b"<oval_definitions/>");
    }

    #[cfg(feature = "bzip2")]
    #[test]
    fn bzip2_in_chunks() {
        let data = "<definition/>".repeat(1000);
        let mut encoder = bzip2::write::BzEncoder::new(vec![], bzip2::Compression::best());
        encoder.write_all(data.as_bytes()).expect("must encode");
        let compressed = encoder.finish().expect("must finish encoding");

        let mut w = Compression::Bzip2.writer(vec![]);
        for chunk in compressed.chunks(7) {
            w.write_all(chunk).expect("must write");
        }
        assert_eq!(w.finish().expect("must finish"), data.as_bytes());
    }

    #[cfg(feature = "bzip2")]
    #[test]
    fn bzip2_over_limit() {
        let data = [b'x'; 4096];
        let mut encoder = bzip2::write::BzEncoder::new(vec![], bzip2::Compression::best());
        encoder.write_all(&data).expect("must encode");
        let compressed = encoder.finish().expect("must finish encoding");

        let mut w =
            Compression::Bzip2.writer_with(vec![], &DecompressionOptions::new().limit(1024));
        let result = w.write_all(&compressed).and_then(|()| w.finish().map(|_| ()));
        assert!(result.is_err());
    }
}
