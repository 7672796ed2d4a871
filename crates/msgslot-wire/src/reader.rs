use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::codec::decode_op;
use crate::error::{Result, WireError};
use crate::op::Op;

const READ_CHUNK_SIZE: usize = 1024;

/// Reads complete operations from any `Read` stream.
///
/// Handles partial reads internally — callers always get whole frames.
pub struct OpReader<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Read> OpReader<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(READ_CHUNK_SIZE),
        }
    }

    /// Read the next complete operation (blocking).
    ///
    /// Returns `Err(WireError::ConnectionClosed)` when EOF is reached.
    pub fn read_op(&mut self) -> Result<Op> {
        loop {
            if let Some(op) = decode_op(&mut self.buf)? {
                return Ok(op);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(WireError::Io(err)),
            };

            if read == 0 {
                return Err(WireError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
