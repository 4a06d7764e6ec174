use std::io::{Error, ErrorKind, Write};

/// A writer, failing once more than `limit` bytes have been written through it.
pub struct LimitWriter<W>
where
    W: Write,
{
    writer: W,
    limit: usize,
    written: usize,
}

impl<W> LimitWriter<W>
where
    W: Write,
{
    pub fn new(writer: W, limit: usize) -> Self {
        Self {
            writer,
            limit,
            written: 0,
        }
    }

    /// Return the inner writer, without flushing it.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> Write for LimitWriter<W>
where
    W: Write,
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let remaining = self.limit.saturating_sub(self.written);
        if remaining == 0 && !buf.is_empty() {
            return Err(Error::new(
                ErrorKind::WriteZero,
                format!("decompressed size exceeds limit of {} bytes", self.limit),
            ));
        }

        let n = self.writer.write(&buf[..remaining.min(buf.len())])?;
        self.written += n;

        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
