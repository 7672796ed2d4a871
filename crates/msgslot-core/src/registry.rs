use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::debug;

use crate::channel::{Channel, ChannelId};
use crate::error::{Result, SlotError};
use crate::MAX_INSTANCES;

/// Identifier of one device instance. The `u8` domain is exactly the
/// 256-entry instance table.
pub type InstanceId = u8;

/// One lazily-created device instance: an insertion-ordered list of
/// channels, unique by id.
///
/// Insertion order only affects lookup traversal, not semantics.
#[derive(Debug, Default)]
struct Instance {
    channels: RwLock<Vec<Arc<Channel>>>,
}

impl Instance {
    fn find(&self, id: ChannelId) -> Option<Arc<Channel>> {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|channel| channel.id() == id)
            .cloned()
    }

    fn find_or_create(&self, id: ChannelId) -> Result<Arc<Channel>> {
        if let Some(channel) = self.find(id) {
            return Ok(channel);
        }

        let mut channels = self.channels.write().unwrap_or_else(PoisonError::into_inner);
        // Re-check under the write lock so racing writers never append a
        // duplicate id.
        if let Some(channel) = channels.iter().find(|channel| channel.id() == id) {
            return Ok(Arc::clone(channel));
        }

        channels
            .try_reserve(1)
            .map_err(|_| SlotError::OutOfMemory)?;
        let channel = Arc::new(Channel::new(id));
        channels.push(Arc::clone(&channel));
        Ok(channel)
    }

    fn channel_count(&self) -> usize {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Fixed-size table of 256 lazily-created device instances.
///
/// An instance entry is created on first write reference to its id and
/// lives for the registry's whole lifetime; channels are never deleted
/// individually. Teardown frees everything at once when the registry is
/// dropped.
pub struct SlotRegistry {
    instances: Box<[OnceLock<Instance>; MAX_INSTANCES]>,
}

impl std::fmt::Debug for SlotRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotRegistry").finish_non_exhaustive()
    }
}

impl SlotRegistry {
    /// Create an empty registry. No instance entries exist yet.
    pub fn new() -> Self {
        Self {
            instances: Box::new([const { OnceLock::new() }; MAX_INSTANCES]),
        }
    }

    /// Look up an existing channel. Never creates anything.
    pub fn find(&self, instance: InstanceId, channel: ChannelId) -> Option<Arc<Channel>> {
        self.instances[instance as usize].get()?.find(channel)
    }

    /// Return the channel for `(instance, channel)`, creating the instance
    /// entry and an empty channel if either has never been referenced.
    ///
    /// Allocation failure is fatal only for this call, not for the
    /// registry.
    pub fn find_or_create(
        &self,
        instance: InstanceId,
        channel: ChannelId,
    ) -> Result<Arc<Channel>> {
        let entry = self.instances[instance as usize].get_or_init(|| {
            debug!(instance, "creating device instance");
            Instance::default()
        });
        entry.find_or_create(channel)
    }

    /// Number of channels created so far on an instance. Zero if the
    /// instance has never been referenced.
    pub fn channel_count(&self, instance: InstanceId) -> usize {
        self.instances[instance as usize]
            .get()
            .map(Instance::channel_count)
            .unwrap_or(0)
    }
}

impl Default for SlotRegistry {
    fn default() -> Self {
        Self::new()
    }
}
