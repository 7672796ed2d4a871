use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::encode_op;
use crate::error::{Result, WireError};
use crate::op::Op;

/// Writes complete operations to any `Write` stream.
pub struct OpWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> OpWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::new(),
        }
    }

    /// Encode and send one operation (blocking).
    pub fn write_op(&mut self, op: &Op) -> Result<()> {
        self.buf.clear();
        encode_op(op, &mut self.buf)?;

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(WireError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(WireError::Io(err)),
            }
        }

        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(WireError::Io(err)),
            }
        }
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::reader::OpReader;

    #[test]
    fn roundtrip_over_pipe() {
        let (left, right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut writer = OpWriter::new(left);
        let mut reader = OpReader::new(right);

        writer.write_op(&Op::Open { instance: 9 }).unwrap();
        writer
            .write_op(&Op::Write {
                payload: Bytes::from_static(b"ping"),
            })
            .unwrap();

        assert_eq!(reader.read_op().unwrap(), Op::Open { instance: 9 });
        assert_eq!(
            reader.read_op().unwrap(),
            Op::Write {
                payload: Bytes::from_static(b"ping")
            }
        );
    }

    struct ShortWriter {
        out: Vec<u8>,
    }

    impl Write for ShortWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            // At most two bytes at a time.
            let n = buf.len().min(2);
            self.out.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn short_writes_are_completed() {
        let mut writer = OpWriter::new(ShortWriter { out: Vec::new() });
        writer.write_op(&Op::Select { channel: 77 }).unwrap();

        let mut buf = BytesMut::from(&writer.into_inner().out[..]);
        assert_eq!(
            crate::codec::decode_op(&mut buf).unwrap().unwrap(),
            Op::Select { channel: 77 }
        );
    }

    #[test]
    fn closed_sink_is_reported() {
        struct ClosedSink;
        impl Write for ClosedSink {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = OpWriter::new(ClosedSink);
        assert!(matches!(
            writer.write_op(&Op::ok()),
            Err(WireError::ConnectionClosed)
        ));
    }
}
