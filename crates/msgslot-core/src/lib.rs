//! Multiplexed, addressable message-slot store.
//!
//! A slot exposes up to 256 independent device instances. Each instance
//! owns any number of channels, and each channel holds at most one pending
//! message of 1-128 bytes, replaced whole on every write. Sessions open an
//! instance, select a channel, then exchange messages one at a time:
//!
//! - Writes stage the full payload before the channel is touched, so a
//!   failed transfer never corrupts the stored message.
//! - Reads are non-destructive: the same message is returned until the
//!   next write overwrites it.
//!
//! This crate is the store itself: no sockets, no CLI. See `msgslot-host`
//! for exposing a slot under a filesystem path.

pub mod channel;
pub mod error;
pub mod registry;
pub mod session;

pub use channel::{Channel, ChannelId};
pub use error::{Result, SlotError};
pub use registry::{InstanceId, SlotRegistry};
pub use session::{MessageSlot, Session, SlotDevice};

/// Maximum stored message length in bytes.
pub const MAX_MESSAGE_LEN: usize = 128;

/// Number of addressable device instances (ids 0-255).
pub const MAX_INSTANCES: usize = 256;
