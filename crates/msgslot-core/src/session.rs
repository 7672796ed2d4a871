//! Sessions and the dispatch surface.
//!
//! A [`MessageSlot`] is the protocol surface over one shared registry:
//! `open` mints a [`Session`], which then runs the
//! select-channel / write / read protocol for one handle. Closing a
//! session never touches the channels it wrote.

use std::io::{Read, Write};
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::channel::ChannelId;
use crate::error::{Result, SlotError};
use crate::registry::{InstanceId, SlotRegistry};
use crate::MAX_MESSAGE_LEN;

/// Mints sessions against an addressable slot.
///
/// This is the seam a host registers behind whatever mechanism exposes the
/// instance-addressed entity externally (a socket path, an RPC endpoint).
pub trait SlotDevice {
    /// Open a session bound to one device instance.
    fn open(&self, instance: InstanceId) -> Result<Session>;
}

/// The dispatcher: owns the shared channel registry and mints sessions.
///
/// Cloning is cheap and shares the registry, so sessions opened from any
/// clone, on any thread, address the same store.
#[derive(Clone, Debug, Default)]
pub struct MessageSlot {
    registry: Arc<SlotRegistry>,
}

impl MessageSlot {
    /// Create a slot with a fresh, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot over an existing shared registry.
    pub fn with_registry(registry: Arc<SlotRegistry>) -> Self {
        Self { registry }
    }

    /// The shared registry behind this slot.
    pub fn registry(&self) -> &Arc<SlotRegistry> {
        &self.registry
    }
}

impl SlotDevice for MessageSlot {
    fn open(&self, instance: InstanceId) -> Result<Session> {
        debug!(instance, "session opened");
        Ok(Session {
            registry: Arc::clone(&self.registry),
            instance,
            selected: None,
        })
    }
}

/// Per-handle state: the instance fixed at open, and the mutable channel
/// selector.
///
/// Write and read are rejected with `InvalidArgument` until
/// [`select_channel`](Session::select_channel) has bound a channel.
pub struct Session {
    registry: Arc<SlotRegistry>,
    instance: InstanceId,
    selected: Option<ChannelId>,
}

impl Session {
    /// The instance this session addresses.
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// The currently selected channel, if any.
    pub fn selected_channel(&self) -> Option<ChannelId> {
        self.selected
    }

    /// Bind the session to a channel.
    ///
    /// Id 0 is reserved and rejected. Reselecting is allowed any number of
    /// times; the last call wins. No channel entity is created or touched
    /// here.
    pub fn select_channel(&mut self, raw: u32) -> Result<()> {
        let id = ChannelId::new(raw)
            .ok_or(SlotError::InvalidArgument("channel id 0 is reserved"))?;
        trace!(instance = self.instance, channel = raw, "channel selected");
        self.selected = Some(id);
        Ok(())
    }

    fn configured(&self) -> Result<ChannelId> {
        self.selected
            .ok_or(SlotError::InvalidArgument("channel not configured"))
    }

    /// Write one whole message of `len` bytes taken from `source`.
    ///
    /// The payload is staged into a call-local buffer before the channel is
    /// resolved; a transfer fault from `source` leaves the previous message
    /// completely untouched. On success the channel's content is replaced
    /// whole (never appended) and `len` is returned.
    pub fn write_from<R: Read>(&mut self, source: &mut R, len: usize) -> Result<usize> {
        let channel_id = self.configured()?;
        if len == 0 {
            return Err(SlotError::InvalidArgument("zero-length write"));
        }
        if len > MAX_MESSAGE_LEN {
            return Err(SlotError::MessageTooLarge {
                len,
                max: MAX_MESSAGE_LEN,
            });
        }

        let staged = stage(source, len)?;

        let channel = self.registry.find_or_create(self.instance, channel_id)?;
        channel.commit(staged);
        trace!(
            instance = self.instance,
            channel = %channel_id,
            len,
            "message committed"
        );
        Ok(len)
    }

    /// Write one whole message from a byte slice.
    pub fn write(&mut self, payload: &[u8]) -> Result<usize> {
        let mut source = payload;
        self.write_from(&mut source, payload.len())
    }

    /// Transfer the stored message into `sink`, given the caller's
    /// `capacity`.
    ///
    /// The message is not consumed: repeated reads return identical bytes
    /// until the next write. A transfer fault on the sink side leaves the
    /// stored message unaffected; how many bytes the sink observed before
    /// the fault is deliberately unspecified.
    pub fn read_into<W: Write>(&mut self, sink: &mut W, capacity: usize) -> Result<usize> {
        let channel_id = self.configured()?;

        let message = self
            .registry
            .find(self.instance, channel_id)
            .and_then(|channel| channel.snapshot())
            .ok_or(SlotError::NoMessage)?;

        if capacity < message.len() {
            return Err(SlotError::InsufficientSpace {
                capacity,
                len: message.len(),
            });
        }

        sink.write_all(&message)?;
        Ok(message.len())
    }

    /// Read the stored message into a fresh buffer.
    pub fn read(&mut self, capacity: usize) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.read_into(&mut out, capacity)?;
        Ok(out)
    }

    /// Release the handle. Channels written through it persist.
    pub fn close(self) {}
}

impl Drop for Session {
    fn drop(&mut self) {
        trace!(instance = self.instance, "session closed");
    }
}

// Stage the whole payload before the channel is resolved, so a short or
// failing source never clobbers the stored message.
fn stage<R: Read>(source: &mut R, len: usize) -> Result<Bytes> {
    let mut staged = Vec::new();
    staged
        .try_reserve_exact(len)
        .map_err(|_| SlotError::OutOfMemory)?;
    staged.resize(len, 0);
    source.read_exact(&mut staged)?;
    Ok(Bytes::from(staged))
}
