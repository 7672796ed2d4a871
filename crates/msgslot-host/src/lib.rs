//! Unix-domain-socket host for message slots.
//!
//! This crate is the collaborator that makes a slot reachable from other
//! processes: [`SlotListener`] registers a shared [`MessageSlot`] under a
//! filesystem path and drives one session per connection, and
//! [`SlotClient`] is the matching typed client. The store itself lives in
//! `msgslot-core`; this layer only moves framed operations across the
//! socket.
//!
//! [`MessageSlot`]: msgslot_core::MessageSlot

#![cfg(unix)]

pub mod client;
pub mod error;
pub mod server;
mod socket;

pub use client::SlotClient;
pub use error::{HostError, Result};
pub use server::{SessionDriver, SlotListener};
