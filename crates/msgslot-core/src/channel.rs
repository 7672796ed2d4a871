use std::fmt;
use std::num::NonZeroU32;
use std::sync::{PoisonError, RwLock};

use bytes::Bytes;

/// Identifier of one channel within a device instance.
///
/// Backed by `NonZeroU32`: id 0 is reserved on the caller side to mean
/// "no channel selected" and can never name a real channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelId(NonZeroU32);

impl ChannelId {
    /// Wrap a raw id. Returns `None` for the reserved value 0.
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    /// The raw numeric id.
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One addressable slot holding at most one pending message.
///
/// The cell is `None` until the first write commits. Readers take a whole
/// `Bytes` snapshot; a concurrent commit swaps the cell but never mutates
/// a snapshot already handed out.
#[derive(Debug)]
pub struct Channel {
    id: ChannelId,
    cell: RwLock<Option<Bytes>>,
}

impl Channel {
    pub(crate) fn new(id: ChannelId) -> Self {
        Self {
            id,
            cell: RwLock::new(None),
        }
    }

    /// This channel's id.
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Snapshot of the current message, if one has been committed.
    pub fn snapshot(&self) -> Option<Bytes> {
        self.cell
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Length of the stored message, if any.
    pub fn message_len(&self) -> Option<usize> {
        self.cell
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(Bytes::len)
    }

    /// Replace the stored message with a fully staged payload.
    ///
    /// Overwrite semantics: the previous message, if any, is discarded
    /// whole. Never appends.
    pub(crate) fn commit(&self, message: Bytes) {
        *self.cell.write().unwrap_or_else(PoisonError::into_inner) = Some(message);
    }
}
