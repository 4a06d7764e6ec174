use feed_common::compression::{Compression, DecompressionOptions};
use std::io::Write;

/// Decompress `data`, storing at most `limit` bytes.
#[allow(dead_code)]
fn decompress(compression: Compression, data: &[u8], limit: usize) -> std::io::Result<Vec<u8>> {
    let mut writer =
        compression.writer_with(vec![], &DecompressionOptions::new().limit(limit));
    writer.write_all(data)?;
    Ok(writer.finish()?.into_inner())
}

/// Test the case of having an unreasonably large decompressed size.
///
/// The idea is to have a compressed file which, by itself, has an acceptable size. However, which
/// decompresses into an unreasonable large payload. This should be prevented by applying a limit
/// to the decompression.
#[test]
#[cfg(feature = "bzip2")]
fn bzip2_bomb() {
    let mut encoder = bzip2::write::BzEncoder::new(vec![], bzip2::Compression::best());
    encoder
        .write_all(&vec![0u8; 16 * 1024 * 1024])
        .expect("must encode");
    let data = encoder.finish().expect("must finish");
    assert!(data.len() < 1024);

    let result = decompress(Compression::Bzip2, &data, 1024 * 1024);

    assert!(result.is_err())
}

/// Same as [`bzip2_bomb`], for gzip.
#[test]
#[cfg(feature = "flate2")]
fn gzip_bomb() {
    let mut encoder = flate2::write::GzEncoder::new(vec![], flate2::Compression::best());
    encoder
        .write_all(&vec![0u8; 16 * 1024 * 1024])
        .expect("must encode");
    let data = encoder.finish().expect("must finish");

    let result = decompress(Compression::Gzip, &data, 1024 * 1024);

    assert!(result.is_err())
}

#[test]
#[cfg(feature = "bzip2")]
fn within_limit() {
    let mut encoder = bzip2::write::BzEncoder::new(vec![], bzip2::Compression::fast());
    encoder.write_all(b"<oval_definitions/>").expect("must encode");
    let data = encoder.finish().expect("must finish");

    let result = decompress(Compression::Bzip2, &data, 1024).expect("must decompress");

    assert_eq!(result, b"<oval_definitions/>");
}
