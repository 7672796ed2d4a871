use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use tracing::{debug, info};

use msgslot_core::{MessageSlot, Session, SlotDevice};
use msgslot_wire::{Op, OpReader, OpWriter, WireError};

use crate::error::{HostError, Result};
use crate::socket;

/// Serves one shared message slot under a Unix domain socket path.
///
/// Every accepted connection becomes one slot session: the peer must send
/// `Open` first, then any interleaving of `Select`/`Write`/`Read`.
/// Disconnecting closes the session; channel data persists in the shared
/// registry for the listener's lifetime.
pub struct SlotListener {
    listener: UnixListener,
    path: PathBuf,
    slot: MessageSlot,
    next_session_id: AtomicU64,
}

impl SlotListener {
    /// Bind a fresh slot to a socket path.
    pub fn bind(path: impl AsRef<Path>) -> Result<Self> {
        Self::bind_with_slot(path, MessageSlot::new())
    }

    /// Bind an existing slot (and its registry) to a socket path.
    pub fn bind_with_slot(path: impl AsRef<Path>, slot: MessageSlot) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let listener = socket::bind(&path)?;
        info!(?path, "serving message slot");
        Ok(Self {
            listener,
            path,
            slot,
            next_session_id: AtomicU64::new(1),
        })
    }

    /// Accept the next connection (blocking) and return its driver.
    pub fn accept(&self) -> Result<SessionDriver> {
        let (stream, _addr) = self.listener.accept().map_err(HostError::Accept)?;
        let id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        debug!(session = id, "accepted connection");
        SessionDriver::new(id, stream, self.slot.clone())
    }

    /// The bound socket path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The served slot.
    pub fn slot(&self) -> &MessageSlot {
        &self.slot
    }
}

impl Drop for SlotListener {
    fn drop(&mut self) {
        socket::cleanup(&self.path);
    }
}

/// Drives one accepted connection: the open exchange, then a
/// request/reply loop until the peer disconnects.
///
/// Slot errors are answered as `Err` frames and the session continues;
/// wire or protocol errors tear the connection down.
pub struct SessionDriver {
    id: u64,
    reader: OpReader<UnixStream>,
    writer: OpWriter<UnixStream>,
    slot: MessageSlot,
}

impl SessionDriver {
    fn new(id: u64, stream: UnixStream, slot: MessageSlot) -> Result<Self> {
        let reader_stream = stream.try_clone()?;
        Ok(Self {
            id,
            reader: OpReader::new(reader_stream),
            writer: OpWriter::new(stream),
            slot,
        })
    }

    /// Run the session to completion.
    pub fn run(mut self) -> Result<()> {
        let mut session = match self.open_exchange()? {
            Some(session) => session,
            // Peer connected and left without opening.
            None => return Ok(()),
        };

        loop {
            let op = match self.reader.read_op() {
                Ok(op) => op,
                Err(WireError::ConnectionClosed) => {
                    debug!(session = self.id, "peer disconnected");
                    return Ok(());
                }
                Err(err) => return Err(err.into()),
            };

            let reply = match op {
                Op::Select { channel } => {
                    session.select_channel(channel).map(|()| Op::ok())
                }
                Op::Write { payload } => session.write(&payload).map(|written| Op::Ok {
                    payload: Bytes::copy_from_slice(&(written as u32).to_le_bytes()),
                }),
                Op::Read { capacity } => session
                    .read(capacity as usize)
                    .map(|message| Op::Ok {
                        payload: Bytes::from(message),
                    }),
                Op::Open { .. } | Op::Ok { .. } | Op::Err { .. } => {
                    return Err(HostError::Protocol("unexpected frame in open session"));
                }
            };

            match reply {
                Ok(ok) => self.writer.write_op(&ok)?,
                Err(slot_err) => {
                    debug!(session = self.id, error = %slot_err, "operation rejected");
                    self.writer.write_op(&Op::err(&slot_err))?;
                }
            }
        }
    }

    // The first frame must be `Open`; it binds the session's instance for
    // the connection's lifetime.
    fn open_exchange(&mut self) -> Result<Option<Session>> {
        let op = match self.reader.read_op() {
            Ok(op) => op,
            Err(WireError::ConnectionClosed) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let instance = match op {
            Op::Open { instance } => instance,
            _ => return Err(HostError::Protocol("expected open frame")),
        };

        match self.slot.open(instance) {
            Ok(session) => {
                debug!(session = self.id, instance, "session opened");
                self.writer.write_op(&Op::ok())?;
                Ok(Some(session))
            }
            Err(err) => {
                self.writer.write_op(&Op::err(&err))?;
                Ok(None)
            }
        }
    }
}
