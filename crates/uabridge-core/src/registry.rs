//! Device registry - one record per observed device.
//!
//! The registry maps device signatures to the address-space handles
//! provisioned for them so far. Records are created on first sighting and
//! never evicted; unbounded growth across process lifetime is accepted.

use std::collections::HashMap;

use dashmap::mapref::entry::Entry;
use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use tracing::debug;

use crate::dynamb::DeviceSignature;
use crate::provider::{AddressSpace, NodeHandle, ProviderError};

/// The node handle(s) provisioned for one property of one device.
///
/// The variant plus the axis count is the property's shape fingerprint:
/// provisioning compares it against the incoming record before reusing the
/// stored handles.
#[derive(Debug, Clone)]
pub enum NodeSlot {
    /// Scalar and single-node properties.
    Single(NodeHandle),
    /// One node per axis, in positional order.
    PerAxis(Vec<NodeHandle>),
}

impl NodeSlot {
    /// Number of axes this slot was provisioned with, if per-axis.
    pub fn axis_count(&self) -> Option<usize> {
        match self {
            Self::Single(_) => None,
            Self::PerAxis(nodes) => Some(nodes.len()),
        }
    }
}

/// Everything the engine holds for one observed device.
#[derive(Debug)]
pub struct DeviceRecord {
    /// The container node representing the device, created exactly once.
    container: NodeHandle,
    /// Property name to provisioned node(s). Grows as properties are first
    /// observed; slots are replaced wholesale on shape change (old handles
    /// are discarded, not released).
    nodes: HashMap<&'static str, NodeSlot>,
}

impl DeviceRecord {
    fn new(container: NodeHandle) -> Self {
        Self {
            container,
            nodes: HashMap::new(),
        }
    }

    pub fn container(&self) -> NodeHandle {
        self.container
    }

    pub fn slot(&self, property: &str) -> Option<&NodeSlot> {
        self.nodes.get(property)
    }

    pub fn set_slot(&mut self, property: &'static str, slot: NodeSlot) {
        self.nodes.insert(property, slot);
    }

    /// Number of properties provisioned so far.
    pub fn provisioned_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Registry of every device seen since process start.
///
/// Built on a sharded map so that the entry guard returned by
/// [`resolve_or_create`](Self::resolve_or_create) doubles as the
/// per-signature critical section: provisioning and writes for one event run
/// to completion under it, so two concurrent first sightings of the same
/// device cannot race to create two container nodes.
#[derive(Default)]
pub struct DeviceRegistry {
    devices: DashMap<DeviceSignature, DeviceRecord>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the record for `signature`, creating it (and its container
    /// node, via the provider) on first sighting.
    ///
    /// The returned guard holds the shard lock; drop it to release the
    /// critical section.
    pub fn resolve_or_create<'a>(
        &'a self,
        signature: &DeviceSignature,
        provider: &dyn AddressSpace,
    ) -> Result<RefMut<'a, DeviceSignature, DeviceRecord>, ProviderError> {
        match self.devices.entry(signature.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_ref()),
            Entry::Vacant(entry) => {
                let container = provider.create_container_node(signature.as_str())?;
                debug!(%signature, "new device registered");
                Ok(entry.insert(DeviceRecord::new(container)))
            }
        }
    }

    /// Whether a record exists for the signature, without creating one.
    pub fn contains(&self, signature: &DeviceSignature) -> bool {
        self.devices.contains_key(signature)
    }

    /// Number of devices observed so far.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::memory::MemoryAddressSpace;

    #[test]
    fn test_container_created_exactly_once() {
        let space = MemoryAddressSpace::new();
        let registry = DeviceRegistry::new();
        let signature = DeviceSignature::new("AA:BB", 2);

        let first = registry
            .resolve_or_create(&signature, &space)
            .unwrap()
            .container();
        let second = registry
            .resolve_or_create(&signature, &space)
            .unwrap()
            .container();

        assert_eq!(first, second);
        assert_eq!(space.node_count(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_signatures_get_distinct_containers() {
        let space = MemoryAddressSpace::new();
        let registry = DeviceRegistry::new();

        let a = registry
            .resolve_or_create(&DeviceSignature::new("AA:BB", 2), &space)
            .unwrap()
            .container();
        let b = registry
            .resolve_or_create(&DeviceSignature::new("AA:BB", 3), &space)
            .unwrap()
            .container();

        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_slots() {
        let space = MemoryAddressSpace::new();
        let registry = DeviceRegistry::new();
        let signature = DeviceSignature::new("AA:BB", 2);

        let mut record = registry.resolve_or_create(&signature, &space).unwrap();
        assert!(record.slot("temperature").is_none());

        let node = space.create_container_node("dummy").unwrap();
        record.set_slot("temperature", NodeSlot::Single(node));
        assert!(matches!(
            record.slot("temperature"),
            Some(NodeSlot::Single(_))
        ));
        assert_eq!(record.provisioned_count(), 1);
    }
}
