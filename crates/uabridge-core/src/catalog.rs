//! Property descriptor catalog.
//!
//! Static metadata for every telemetry reading the bridge maps to protocol
//! variables: engineering unit, declared range, sampling hint and cardinality
//! class. Initialized once at startup and never mutated; lookups drive both
//! relevance filtering and node provisioning.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::provider::{EngineeringUnit, Range};

/// Standard engineering units used by the catalog.
pub mod units {
    use crate::provider::EngineeringUnit;

    pub const DEGREE_CELSIUS: EngineeringUnit = EngineeringUnit {
        symbol: "°C",
        description: "degree Celsius",
    };
    pub const PERCENT: EngineeringUnit = EngineeringUnit {
        symbol: "%",
        description: "percent",
    };
    pub const VOLT: EngineeringUnit = EngineeringUnit {
        symbol: "V",
        description: "volt",
    };
    pub const PART_PER_MILLION: EngineeringUnit = EngineeringUnit {
        symbol: "ppm",
        description: "part per million",
    };
    pub const PART_PER_BILLION: EngineeringUnit = EngineeringUnit {
        symbol: "ppb",
        description: "part per billion",
    };
    pub const LUX: EngineeringUnit = EngineeringUnit {
        symbol: "lx",
        description: "lux",
    };
    pub const LUMEN: EngineeringUnit = EngineeringUnit {
        symbol: "lm",
        description: "lumen",
    };
    pub const MICROGRAM_PER_CUBIC_METRE: EngineeringUnit = EngineeringUnit {
        symbol: "µg/m³",
        description: "microgram per cubic metre",
    };
    pub const PASCAL: EngineeringUnit = EngineeringUnit {
        symbol: "Pa",
        description: "pascal",
    };
    pub const DECIBEL: EngineeringUnit = EngineeringUnit {
        symbol: "dB",
        description: "decibel",
    };
    pub const METRE_PER_SECOND: EngineeringUnit = EngineeringUnit {
        symbol: "m/s",
        description: "metre per second",
    };
    pub const METRE_PER_SECOND_SQUARED: EngineeringUnit = EngineeringUnit {
        symbol: "m/s²",
        description: "metre per second squared",
    };
    pub const MICROSECOND: EngineeringUnit = EngineeringUnit {
        symbol: "µs",
        description: "microsecond",
    };
}

/// Axis labels for tri-axial properties, in positional order.
pub const TRIAXIAL_LABELS: &[&str] = &["X", "Y", "Z"];

/// Cardinality class of a property: how many nodes it maps to and how their
/// shape is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// One analog variable holding a single number.
    Scalar,
    /// A constant, known number of axes, one analog variable per axis.
    FixedVector {
        /// Positional axis labels; the axis count is `labels.len()`.
        labels: &'static [&'static str],
    },
    /// Per-axis numeric sequences of data-dependent length and sample rate.
    /// Provisioning derives the time-axis scale from the record itself.
    VariableSeries {
        /// Upper bound on the number of axes mapped.
        max_axes: usize,
        /// Positional axis labels.
        labels: &'static [&'static str],
        /// Record property carrying the sampling rate in Hz.
        sampling_rate_key: &'static str,
    },
}

/// Immutable metadata describing how one named reading maps to protocol
/// variable(s).
#[derive(Debug, Clone, Copy)]
pub struct PropertyDescriptor {
    /// Property name as it appears in dynamb records.
    pub name: &'static str,
    /// Base browse name for the resulting node(s); axis labels are appended
    /// for multi-axis properties.
    pub browse_name: &'static str,
    pub unit: EngineeringUnit,
    /// Declared valid bounds. Metadata only, never enforced on write.
    pub range: Range,
    /// Advisory minimum sampling interval for the node, in milliseconds.
    pub sampling_interval_ms: f64,
    pub cardinality: Cardinality,
}

const fn scalar(
    name: &'static str,
    browse_name: &'static str,
    unit: EngineeringUnit,
    low: f64,
    high: f64,
) -> PropertyDescriptor {
    PropertyDescriptor {
        name,
        browse_name,
        unit,
        range: Range::new(low, high),
        sampling_interval_ms: 1000.0,
        cardinality: Cardinality::Scalar,
    }
}

/// The fixed set of supported properties. Filtering is exact-match on name.
static DESCRIPTORS: &[PropertyDescriptor] = &[
    scalar("temperature", "Temperature", units::DEGREE_CELSIUS, -40.0, 125.0),
    scalar("batteryPercentage", "BatteryPercentage", units::PERCENT, 0.0, 100.0),
    scalar("batteryVoltage", "BatteryVoltage", units::VOLT, 0.0, 6.0),
    scalar(
        "carbonDioxideConcentration",
        "CarbonDioxideConcentration",
        units::PART_PER_MILLION,
        0.0,
        10000.0,
    ),
    scalar("illuminance", "Illuminance", units::LUX, 0.0, 100000.0),
    scalar("levelPercentage", "LevelPercentage", units::PERCENT, 0.0, 100.0),
    scalar("luminousFlux", "LuminousFlux", units::LUMEN, 0.0, 25000.0),
    scalar("pm1.0", "PM1.0", units::MICROGRAM_PER_CUBIC_METRE, 0.0, 1000.0),
    scalar("pm2.5", "PM2.5", units::MICROGRAM_PER_CUBIC_METRE, 0.0, 1000.0),
    scalar("pm10", "PM10", units::MICROGRAM_PER_CUBIC_METRE, 0.0, 1000.0),
    scalar("pressure", "Pressure", units::PASCAL, 30000.0, 110000.0),
    scalar("relativeHumidity", "RelativeHumidity", units::PERCENT, 0.0, 100.0),
    scalar("soundPressure", "SoundPressure", units::DECIBEL, 0.0, 140.0),
    scalar(
        "volatileOrganicCompoundsConcentration",
        "VolatileOrganicCompoundsConcentration",
        units::PART_PER_BILLION,
        0.0,
        60000.0,
    ),
    PropertyDescriptor {
        name: "accelerationTimeSeries",
        browse_name: "AccelerationTimeSeries",
        unit: units::METRE_PER_SECOND_SQUARED,
        range: Range::new(-64.0, 64.0),
        sampling_interval_ms: 1000.0,
        cardinality: Cardinality::VariableSeries {
            max_axes: 3,
            labels: TRIAXIAL_LABELS,
            sampling_rate_key: "accelerationSamplingRate",
        },
    },
    PropertyDescriptor {
        name: "velocityOverall",
        browse_name: "VelocityOverall",
        unit: units::METRE_PER_SECOND,
        range: Range::new(0.0, 1.0),
        sampling_interval_ms: 1000.0,
        cardinality: Cardinality::FixedVector {
            labels: TRIAXIAL_LABELS,
        },
    },
];

static CATALOG: Lazy<HashMap<&'static str, &'static PropertyDescriptor>> =
    Lazy::new(|| DESCRIPTORS.iter().map(|d| (d.name, d)).collect());

/// Look up the descriptor for a property name, if it is supported.
pub fn lookup(name: &str) -> Option<&'static PropertyDescriptor> {
    CATALOG.get(name).copied()
}

/// All supported descriptors, in catalog order.
pub fn descriptors() -> &'static [PropertyDescriptor] {
    DESCRIPTORS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_and_unknown() {
        assert!(lookup("temperature").is_some());
        assert!(lookup("velocityOverall").is_some());
        assert!(lookup("txCount").is_none());
        // Exact match only
        assert!(lookup("Temperature").is_none());
    }

    #[test]
    fn test_temperature_descriptor() {
        let desc = lookup("temperature").unwrap();
        assert_eq!(desc.browse_name, "Temperature");
        assert_eq!(desc.range, Range::new(-40.0, 125.0));
        assert_eq!(desc.unit, units::DEGREE_CELSIUS);
        assert_eq!(desc.cardinality, Cardinality::Scalar);
    }

    #[test]
    fn test_acceleration_descriptor() {
        let desc = lookup("accelerationTimeSeries").unwrap();
        match desc.cardinality {
            Cardinality::VariableSeries {
                max_axes,
                labels,
                sampling_rate_key,
            } => {
                assert_eq!(max_axes, 3);
                assert_eq!(labels, TRIAXIAL_LABELS);
                assert_eq!(sampling_rate_key, "accelerationSamplingRate");
            }
            _ => panic!("expected variable-series cardinality"),
        }
    }

    #[test]
    fn test_catalog_names_are_unique() {
        assert_eq!(CATALOG.len(), DESCRIPTORS.len());
    }
}
