//! Telemetry-to-Address-Space Mapping Engine
//!
//! This crate bridges a stream of dynamb telemetry events into the
//! addressable variable model of an OPC-UA style protocol server.
//!
//! ## Architecture
//!
//! - **Dynamb**: the inbound telemetry record (device identity, timestamp,
//!   sparse named readings)
//! - **PropertyCatalog**: static descriptors for every supported reading
//!   (unit, range, cardinality)
//! - **DeviceRegistry**: one record per observed device, holding the opaque
//!   address-space handles provisioned for it so far
//! - **NodeProvisioner**: lazily creates protocol variables with the right
//!   metadata and array shape, re-provisioning when the shape changes
//! - **UaBridge**: the update pipeline tying the above together
//!
//! The address-space itself is external: the engine only talks to it through
//! the [`AddressSpace`] trait and never interprets the handles it gets back.
//! A recording in-memory implementation is provided for tests and replay
//! tooling.

pub mod catalog;
pub mod config;
pub mod dynamb;
pub mod error;
pub mod pipeline;
pub mod provider;
pub mod provision;
pub mod registry;

// Re-exports for convenience
pub use catalog::{Cardinality, PropertyDescriptor};
pub use config::BridgeOptions;
pub use dynamb::{DeviceSignature, Dynamb};
pub use error::BridgeError;
pub use pipeline::{UaBridge, DYNAMB_EVENT};
pub use provider::{
    AddressSpace, EngineeringUnit, NodeHandle, ProviderError, Quality, Range, ValueType, Variant,
};
pub use provider::memory::MemoryAddressSpace;
pub use registry::{DeviceRecord, DeviceRegistry, NodeSlot};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
