//! Address-space provider boundary.
//!
//! The protocol server owns the address space; the mapping engine only asks
//! it to create nodes and write values through the [`AddressSpace`] trait.
//! Handles returned by the provider are capabilities: the engine stores them
//! and hands them back, never interpreting their internals.

use chrono::{DateTime, Utc};

pub mod memory;

/// Opaque reference to a node in the external address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(u64);

impl NodeHandle {
    /// Mint a handle. Only providers should call this.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Physical engineering unit attached to a variable node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineeringUnit {
    /// Display symbol, e.g. "°C"
    pub symbol: &'static str,
    /// Human-readable description, e.g. "degree Celsius"
    pub description: &'static str,
}

/// Declared valid bounds for a variable. Metadata only, not enforced on write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub low: f64,
    pub high: f64,
}

impl Range {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

/// Quality status attached to a written value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Good,
    Uncertain,
    Bad,
}

/// Wire value type of a variable node. Telemetry readings are all doubles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Double,
}

/// A value written to a node; shape must match the node's declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Scalar(f64),
    Array(Vec<f64>),
}

/// Errors raised by the external provider. The engine performs no retry and
/// no rollback; a failure aborts the current event and is surfaced as-is.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("node creation failed: {0}")]
    NodeCreation(String),

    #[error("value write failed: {0}")]
    Write(String),

    #[error("unknown node handle: {0:?}")]
    UnknownNode(NodeHandle),
}

/// Operations the mapping engine needs from the external address space.
///
/// All calls are synchronous: they complete or fail before returning, and the
/// engine never suspends mid-event.
pub trait AddressSpace: Send + Sync {
    /// Create the container object representing one physical device.
    fn create_container_node(&self, name: &str) -> Result<NodeHandle, ProviderError>;

    /// Create an analog scalar variable under `parent`.
    fn create_scalar_variable(
        &self,
        parent: NodeHandle,
        name: &str,
        unit: EngineeringUnit,
        range: Range,
        sampling_interval_ms: f64,
        value_type: ValueType,
    ) -> Result<NodeHandle, ProviderError>;

    /// Create an array variable under `parent` with a derived axis scale.
    #[allow(clippy::too_many_arguments)]
    fn create_array_variable(
        &self,
        parent: NodeHandle,
        name: &str,
        unit: EngineeringUnit,
        value_range: Range,
        axis_unit: EngineeringUnit,
        axis_range: Range,
        value_type: ValueType,
    ) -> Result<NodeHandle, ProviderError>;

    /// Write a value to a previously created variable node.
    fn write_value(
        &self,
        node: NodeHandle,
        value: Variant,
        quality: Quality,
        timestamp: DateTime<Utc>,
    ) -> Result<(), ProviderError>;
}
