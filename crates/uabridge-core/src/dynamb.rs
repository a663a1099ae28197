//! Dynamb telemetry records - the inbound event format.
//!
//! A dynamb carries a device identity, a timestamp and a sparse set of named
//! physical-quantity readings. Which readings are present, and their shapes,
//! vary record to record, so everything beyond the identity fields is kept as
//! raw JSON and coerced on access.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique key for a physical device, formed from its identifier and
/// identifier-type. Two records with the same pair are always the same device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceSignature(String);

impl DeviceSignature {
    pub fn new(device_id: &str, device_id_type: u32) -> Self {
        Self(format!("{device_id}/{device_id_type}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeviceSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single dynamb telemetry record.
///
/// The identity fields are typed; every other property stays as raw JSON in
/// `properties` (via serde flatten) and is read through the shape-coercing
/// accessors below. The record is read-only from the engine's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dynamb {
    /// Device identifier, e.g. a MAC address or EUI
    pub device_id: String,
    /// Identifier type discriminant (numeric, per the dynamb convention)
    pub device_id_type: u32,
    /// Milliseconds since the UNIX epoch
    pub timestamp: i64,
    /// All remaining named readings, untyped
    #[serde(flatten)]
    pub properties: serde_json::Map<String, Value>,
}

impl Dynamb {
    /// The registry key for the device that produced this record.
    pub fn signature(&self) -> DeviceSignature {
        DeviceSignature::new(&self.device_id, self.device_id_type)
    }

    /// The record timestamp in the protocol's time representation.
    pub fn timestamp_utc(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.timestamp)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Iterate over the named readings in the order the record exposes them.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Read a property as a finite scalar, or `None` if absent or malformed.
    pub fn scalar(&self, name: &str) -> Option<f64> {
        finite_number(self.properties.get(name)?)
    }

    /// Read a property as a flat numeric vector, or `None` if absent or any
    /// element is non-numeric.
    pub fn vector(&self, name: &str) -> Option<Vec<f64>> {
        self.properties
            .get(name)?
            .as_array()?
            .iter()
            .map(finite_number)
            .collect()
    }

    /// Read a property as a per-axis series (vector of numeric vectors), or
    /// `None` if absent or any axis is malformed.
    pub fn series(&self, name: &str) -> Option<Vec<Vec<f64>>> {
        self.properties
            .get(name)?
            .as_array()?
            .iter()
            .map(|axis| {
                axis.as_array()?
                    .iter()
                    .map(finite_number)
                    .collect::<Option<Vec<f64>>>()
            })
            .collect()
    }
}

fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Dynamb {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_signature() {
        let dynamb = parse(json!({
            "deviceId": "AA:BB", "deviceIdType": 2, "timestamp": 1000i64
        }));
        assert_eq!(dynamb.signature().as_str(), "AA:BB/2");
    }

    #[test]
    fn test_flattened_properties() {
        let dynamb = parse(json!({
            "deviceId": "AA:BB", "deviceIdType": 2, "timestamp": 1000i64,
            "temperature": 21.5, "relativeHumidity": 40.0
        }));
        assert_eq!(dynamb.properties.len(), 2);
        assert_eq!(dynamb.scalar("temperature"), Some(21.5));
        assert_eq!(dynamb.scalar("relativeHumidity"), Some(40.0));
    }

    #[test]
    fn test_scalar_rejects_non_numbers() {
        let dynamb = parse(json!({
            "deviceId": "AA:BB", "deviceIdType": 2, "timestamp": 1000i64,
            "temperature": "warm"
        }));
        assert_eq!(dynamb.scalar("temperature"), None);
        assert_eq!(dynamb.scalar("absent"), None);
    }

    #[test]
    fn test_vector_and_series() {
        let dynamb = parse(json!({
            "deviceId": "AA:BB", "deviceIdType": 2, "timestamp": 1000i64,
            "velocityOverall": [0.01, 0.02, 0.03],
            "accelerationTimeSeries": [[0.0, 1.0], [0.5, 1.5]]
        }));
        assert_eq!(dynamb.vector("velocityOverall"), Some(vec![0.01, 0.02, 0.03]));
        assert_eq!(
            dynamb.series("accelerationTimeSeries"),
            Some(vec![vec![0.0, 1.0], vec![0.5, 1.5]])
        );
        // A flat vector is not a series
        assert_eq!(dynamb.series("velocityOverall"), None);
    }

    #[test]
    fn test_timestamp_conversion() {
        let dynamb = parse(json!({
            "deviceId": "AA:BB", "deviceIdType": 2, "timestamp": 1500000000000i64
        }));
        assert_eq!(dynamb.timestamp_utc().timestamp_millis(), 1500000000000);
    }
}
