//! Update pipeline - the bridge facade.
//!
//! Receives named events, filters for dynamb, resolves the device record and
//! applies every supported property in the record. Unknown properties are
//! silently ignored; a provider failure aborts the event with no rollback
//! (partial provisioning is an accepted transient, healed on the next
//! successful attempt).

use std::sync::Arc;

use tracing::trace;

use crate::catalog;
use crate::config::BridgeOptions;
use crate::dynamb::Dynamb;
use crate::error::BridgeError;
use crate::provider::AddressSpace;
use crate::provision;
use crate::registry::DeviceRegistry;

/// The only event name the bridge reacts to.
pub const DYNAMB_EVENT: &str = "dynamb";

/// Telemetry-to-address-space mapping engine.
///
/// One instance owns one device registry and talks to one address-space
/// provider. `handle_event` is `&self` and the registry is internally
/// synchronized, so a concurrent host may feed events from multiple threads;
/// each event still runs to completion under its device's critical section.
pub struct UaBridge {
    provider: Arc<dyn AddressSpace>,
    registry: DeviceRegistry,
    options: BridgeOptions,
}

impl UaBridge {
    pub fn new(provider: Arc<dyn AddressSpace>, options: BridgeOptions) -> Self {
        Self {
            provider,
            registry: DeviceRegistry::new(),
            options,
        }
    }

    /// The options this bridge was constructed with. The engine itself does
    /// not consume them; they are forwarded configuration for the provider.
    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Handle one inbound event. Event names other than
    /// [`DYNAMB_EVENT`] are no-ops.
    pub fn handle_event(&self, name: &str, dynamb: &Dynamb) -> Result<(), BridgeError> {
        if name != DYNAMB_EVENT {
            return Ok(());
        }
        self.handle_dynamb(dynamb)
    }

    fn handle_dynamb(&self, dynamb: &Dynamb) -> Result<(), BridgeError> {
        // Efficiency short-circuit: a record with no supported property must
        // not touch the registry or the provider at all.
        if !has_supported_property(dynamb) {
            trace!(device = %dynamb.signature(), "no supported property, record ignored");
            return Ok(());
        }

        let signature = dynamb.signature();
        let mut device = self
            .registry
            .resolve_or_create(&signature, self.provider.as_ref())?;

        for (name, _) in dynamb.properties() {
            if let Some(descriptor) = catalog::lookup(name) {
                provision::apply_property(
                    self.provider.as_ref(),
                    descriptor,
                    &mut device,
                    dynamb,
                )?;
            }
        }
        Ok(())
    }
}

/// Whether the record carries at least one property the catalog knows.
fn has_supported_property(dynamb: &Dynamb) -> bool {
    dynamb.properties().any(|(name, _)| catalog::lookup(name).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dynamb(value: serde_json::Value) -> Dynamb {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_supported_property_detection() {
        let with = dynamb(json!({
            "deviceId": "AA:BB", "deviceIdType": 2, "timestamp": 1000i64,
            "txCount": 7, "temperature": 21.5
        }));
        let without = dynamb(json!({
            "deviceId": "AA:BB", "deviceIdType": 2, "timestamp": 1000i64,
            "txCount": 7, "rssi": -70
        }));
        assert!(has_supported_property(&with));
        assert!(!has_supported_property(&without));
    }
}
