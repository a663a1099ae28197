//! In-memory address-space provider.
//!
//! Records every node creation and value write so that tests and the replay
//! CLI can inspect exactly which address-space mutations the mapping engine
//! produced. Handles are minted from a monotonic counter.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::debug;

use super::{
    AddressSpace, EngineeringUnit, NodeHandle, ProviderError, Quality, Range, ValueType, Variant,
};

/// What kind of node a [`CreatedNode`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Container,
    Scalar,
    Array,
}

/// A node created through the provider, with the metadata it was given.
#[derive(Debug, Clone)]
pub struct CreatedNode {
    pub handle: NodeHandle,
    pub parent: Option<NodeHandle>,
    pub browse_name: String,
    pub kind: NodeKind,
    pub unit: Option<EngineeringUnit>,
    pub range: Option<Range>,
    pub sampling_interval_ms: Option<f64>,
    pub axis_unit: Option<EngineeringUnit>,
    pub axis_range: Option<Range>,
}

/// A value written through the provider.
#[derive(Debug, Clone)]
pub struct WrittenValue {
    pub node: NodeHandle,
    pub value: Variant,
    pub quality: Quality,
    pub timestamp: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    nodes: Vec<CreatedNode>,
    by_handle: HashMap<NodeHandle, usize>,
    writes: Vec<WrittenValue>,
}

/// Recording in-memory implementation of [`AddressSpace`].
#[derive(Default)]
pub struct MemoryAddressSpace {
    next_handle: AtomicU64,
    state: Mutex<State>,
}

impl MemoryAddressSpace {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, node: CreatedNode) -> NodeHandle {
        let handle = node.handle;
        let mut state = self.state.lock();
        let index = state.nodes.len();
        state.nodes.push(node);
        state.by_handle.insert(handle, index);
        handle
    }

    fn mint(&self) -> NodeHandle {
        NodeHandle::from_raw(self.next_handle.fetch_add(1, Ordering::Relaxed))
    }

    /// Every node created so far, in creation order.
    pub fn nodes(&self) -> Vec<CreatedNode> {
        self.state.lock().nodes.clone()
    }

    /// Every value written so far, in write order.
    pub fn writes(&self) -> Vec<WrittenValue> {
        self.state.lock().writes.clone()
    }

    pub fn node_count(&self) -> usize {
        self.state.lock().nodes.len()
    }

    pub fn write_count(&self) -> usize {
        self.state.lock().writes.len()
    }

    /// Total provider calls observed (creations plus writes).
    pub fn call_count(&self) -> usize {
        let state = self.state.lock();
        state.nodes.len() + state.writes.len()
    }

    /// Find a created node by its browse name.
    pub fn find_node(&self, browse_name: &str) -> Option<CreatedNode> {
        self.state
            .lock()
            .nodes
            .iter()
            .find(|n| n.browse_name == browse_name)
            .cloned()
    }

    /// All writes addressed to the given node, in write order.
    pub fn writes_to(&self, node: NodeHandle) -> Vec<WrittenValue> {
        self.state
            .lock()
            .writes
            .iter()
            .filter(|w| w.node == node)
            .cloned()
            .collect()
    }
}

impl AddressSpace for MemoryAddressSpace {
    fn create_container_node(&self, name: &str) -> Result<NodeHandle, ProviderError> {
        let handle = self.mint();
        debug!(name, handle = handle.raw(), "container node created");
        Ok(self.insert(CreatedNode {
            handle,
            parent: None,
            browse_name: name.to_string(),
            kind: NodeKind::Container,
            unit: None,
            range: None,
            sampling_interval_ms: None,
            axis_unit: None,
            axis_range: None,
        }))
    }

    fn create_scalar_variable(
        &self,
        parent: NodeHandle,
        name: &str,
        unit: EngineeringUnit,
        range: Range,
        sampling_interval_ms: f64,
        _value_type: ValueType,
    ) -> Result<NodeHandle, ProviderError> {
        if !self.state.lock().by_handle.contains_key(&parent) {
            return Err(ProviderError::UnknownNode(parent));
        }
        let handle = self.mint();
        debug!(name, unit = unit.symbol, handle = handle.raw(), "scalar variable created");
        Ok(self.insert(CreatedNode {
            handle,
            parent: Some(parent),
            browse_name: name.to_string(),
            kind: NodeKind::Scalar,
            unit: Some(unit),
            range: Some(range),
            sampling_interval_ms: Some(sampling_interval_ms),
            axis_unit: None,
            axis_range: None,
        }))
    }

    fn create_array_variable(
        &self,
        parent: NodeHandle,
        name: &str,
        unit: EngineeringUnit,
        value_range: Range,
        axis_unit: EngineeringUnit,
        axis_range: Range,
        _value_type: ValueType,
    ) -> Result<NodeHandle, ProviderError> {
        if !self.state.lock().by_handle.contains_key(&parent) {
            return Err(ProviderError::UnknownNode(parent));
        }
        let handle = self.mint();
        debug!(
            name,
            unit = unit.symbol,
            axis_high = axis_range.high,
            handle = handle.raw(),
            "array variable created"
        );
        Ok(self.insert(CreatedNode {
            handle,
            parent: Some(parent),
            browse_name: name.to_string(),
            kind: NodeKind::Array,
            unit: Some(unit),
            range: Some(value_range),
            sampling_interval_ms: None,
            axis_unit: Some(axis_unit),
            axis_range: Some(axis_range),
        }))
    }

    fn write_value(
        &self,
        node: NodeHandle,
        value: Variant,
        quality: Quality,
        timestamp: DateTime<Utc>,
    ) -> Result<(), ProviderError> {
        let mut state = self.state.lock();
        if !state.by_handle.contains_key(&node) {
            return Err(ProviderError::UnknownNode(node));
        }
        debug!(handle = node.raw(), ?value, "value written");
        state.writes.push(WrittenValue {
            node,
            value,
            quality,
            timestamp,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::units;

    #[test]
    fn test_handles_are_unique() {
        let space = MemoryAddressSpace::new();
        let a = space.create_container_node("a").unwrap();
        let b = space.create_container_node("b").unwrap();
        assert_ne!(a, b);
        assert_eq!(space.node_count(), 2);
    }

    #[test]
    fn test_write_to_unknown_node_fails() {
        let space = MemoryAddressSpace::new();
        let result = space.write_value(
            NodeHandle::from_raw(99),
            Variant::Scalar(1.0),
            Quality::Good,
            Utc::now(),
        );
        assert!(matches!(result, Err(ProviderError::UnknownNode(_))));
    }

    #[test]
    fn test_scalar_variable_records_metadata() {
        let space = MemoryAddressSpace::new();
        let parent = space.create_container_node("device").unwrap();
        space
            .create_scalar_variable(
                parent,
                "Temperature",
                units::DEGREE_CELSIUS,
                Range::new(-40.0, 125.0),
                1000.0,
                ValueType::Double,
            )
            .unwrap();

        let node = space.find_node("Temperature").unwrap();
        assert_eq!(node.kind, NodeKind::Scalar);
        assert_eq!(node.parent, Some(parent));
        assert_eq!(node.unit, Some(units::DEGREE_CELSIUS));
        assert_eq!(node.range, Some(Range::new(-40.0, 125.0)));
    }
}
