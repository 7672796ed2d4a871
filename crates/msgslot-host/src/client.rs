use std::os::unix::net::UnixStream;
use std::path::Path;

use bytes::Bytes;

use msgslot_wire::{Op, OpReader, OpWriter};

use crate::error::{HostError, Result};
use crate::socket;

/// One open session against a served slot.
///
/// `connect` performs the open exchange; the handle then mirrors the
/// session protocol: select a channel, then write and read whole
/// messages. Dropping the client closes the session; channel data
/// persists on the host.
pub struct SlotClient {
    reader: OpReader<UnixStream>,
    writer: OpWriter<UnixStream>,
    instance: u8,
}

impl SlotClient {
    /// Connect to a served slot and open a session on `instance`.
    pub fn connect(path: impl AsRef<Path>, instance: u8) -> Result<Self> {
        let stream = socket::connect(path.as_ref())?;
        let reader_stream = stream.try_clone()?;

        let mut client = Self {
            reader: OpReader::new(reader_stream),
            writer: OpWriter::new(stream),
            instance,
        };
        client.request(&Op::Open { instance })?;
        Ok(client)
    }

    /// The instance this session addresses.
    pub fn instance(&self) -> u8 {
        self.instance
    }

    /// Select the channel for subsequent writes and reads. Id 0 is
    /// rejected by the host.
    pub fn select_channel(&mut self, channel: u32) -> Result<()> {
        self.request(&Op::Select { channel }).map(|_| ())
    }

    /// Write one whole message; returns the byte count acknowledged by
    /// the host.
    pub fn write(&mut self, payload: &[u8]) -> Result<usize> {
        let ack = self.request(&Op::Write {
            payload: Bytes::copy_from_slice(payload),
        })?;
        match ack.as_ref() {
            [a, b, c, d] => Ok(u32::from_le_bytes([*a, *b, *c, *d]) as usize),
            _ => Err(HostError::Protocol("malformed write acknowledgment")),
        }
    }

    /// Read the pending message, given the caller's capacity in bytes.
    pub fn read(&mut self, capacity: u32) -> Result<Bytes> {
        self.request(&Op::Read { capacity })
    }

    // One request/reply exchange; `Err` frames are rehydrated into
    // `HostError::Remote` with the store's stable code.
    fn request(&mut self, op: &Op) -> Result<Bytes> {
        self.writer.write_op(op)?;
        match self.reader.read_op()? {
            Op::Ok { payload } => Ok(payload),
            Op::Err { code, detail } => Err(HostError::Remote { code, detail }),
            _ => Err(HostError::Protocol("unexpected reply frame")),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::thread;

    use msgslot_wire::ErrorCode;

    use super::*;
    use crate::server::SlotListener;

    struct Harness {
        dir: PathBuf,
        sock: PathBuf,
        server: Option<thread::JoinHandle<()>>,
    }

    impl Harness {
        // Serve `sessions` connections on a fresh socket, each on its own
        // thread, then stop accepting.
        fn serve(tag: &str, sessions: usize) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "msgslot-client-{tag}-{}",
                std::process::id()
            ));
            std::fs::create_dir_all(&dir).unwrap();
            let sock = dir.join("slot.sock");

            let listener = SlotListener::bind(&sock).unwrap();
            let server = thread::spawn(move || {
                let mut drivers = Vec::new();
                for _ in 0..sessions {
                    let driver = listener.accept().unwrap();
                    drivers.push(thread::spawn(move || {
                        let _ = driver.run();
                    }));
                }
                for driver in drivers {
                    driver.join().unwrap();
                }
            });

            Self {
                dir,
                sock,
                server: Some(server),
            }
        }
    }

    impl Drop for Harness {
        fn drop(&mut self) {
            if let Some(server) = self.server.take() {
                server.join().unwrap();
            }
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }

    #[test]
    fn write_then_read_roundtrip() {
        let harness = Harness::serve("roundtrip", 1);

        let mut client = SlotClient::connect(&harness.sock, 5).unwrap();
        assert_eq!(client.instance(), 5);

        client.select_channel(7).unwrap();
        assert_eq!(client.write(b"hello").unwrap(), 5);
        assert_eq!(client.read(128).unwrap().as_ref(), b"hello");

        // Overwrite, not append.
        assert_eq!(client.write(b"hi").unwrap(), 2);
        assert_eq!(client.read(128).unwrap().as_ref(), b"hi");
    }

    #[test]
    fn remote_errors_carry_stable_codes() {
        let harness = Harness::serve("errors", 1);

        let mut client = SlotClient::connect(&harness.sock, 0).unwrap();

        // Write before select.
        match client.write(b"x") {
            Err(HostError::Remote { code, .. }) => {
                assert_eq!(code, ErrorCode::InvalidArgument)
            }
            other => panic!("expected remote invalid-argument, got {other:?}"),
        }

        // Channel id 0.
        match client.select_channel(0) {
            Err(HostError::Remote { code, .. }) => {
                assert_eq!(code, ErrorCode::InvalidArgument)
            }
            other => panic!("expected remote invalid-argument, got {other:?}"),
        }

        client.select_channel(9).unwrap();

        // Never-written channel.
        match client.read(128) {
            Err(HostError::Remote { code, .. }) => assert_eq!(code, ErrorCode::NoMessage),
            other => panic!("expected remote no-message, got {other:?}"),
        }

        // Oversized write still reaches the store's taxonomy.
        match client.write(&[0u8; 129]) {
            Err(HostError::Remote { code, .. }) => {
                assert_eq!(code, ErrorCode::MessageTooLarge)
            }
            other => panic!("expected remote message-too-large, got {other:?}"),
        }

        // Short capacity.
        client.write(b"hello").unwrap();
        match client.read(4) {
            Err(HostError::Remote { code, .. }) => {
                assert_eq!(code, ErrorCode::InsufficientSpace)
            }
            other => panic!("expected remote insufficient-space, got {other:?}"),
        }

        // The failed read left the message intact.
        assert_eq!(client.read(128).unwrap().as_ref(), b"hello");
    }

    #[test]
    fn sessions_share_the_registry() {
        let harness = Harness::serve("shared", 2);

        let mut writer = SlotClient::connect(&harness.sock, 5).unwrap();
        writer.select_channel(7).unwrap();
        writer.write(b"between-sessions").unwrap();
        drop(writer);

        // A later session on the same instance sees the message.
        let mut reader = SlotClient::connect(&harness.sock, 5).unwrap();
        reader.select_channel(7).unwrap();
        assert_eq!(reader.read(128).unwrap().as_ref(), b"between-sessions");
    }

    #[test]
    fn instances_are_isolated_across_connections() {
        let harness = Harness::serve("isolated", 2);

        let mut on_five = SlotClient::connect(&harness.sock, 5).unwrap();
        on_five.select_channel(1).unwrap();
        on_five.write(b"five").unwrap();
        drop(on_five);

        let mut on_six = SlotClient::connect(&harness.sock, 6).unwrap();
        on_six.select_channel(1).unwrap();
        match on_six.read(128) {
            Err(HostError::Remote { code, .. }) => assert_eq!(code, ErrorCode::NoMessage),
            other => panic!("expected remote no-message, got {other:?}"),
        }
    }
}
