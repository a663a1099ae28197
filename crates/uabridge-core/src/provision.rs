//! Node provisioner and per-property update logic.
//!
//! Shape (axis count, series length) is not fixed in the protocol schema; it
//! is discovered from the data. Node creation is therefore deferred until the
//! first record with a usable shape arrives, and re-triggered whenever the
//! observed shape changes. Each update ensures the node(s) exist, then writes
//! the record's value(s) with Good quality at the record timestamp.

use tracing::debug;

use crate::catalog::{units, Cardinality, PropertyDescriptor};
use crate::dynamb::Dynamb;
use crate::provider::{AddressSpace, ProviderError, Quality, Range, ValueType, Variant};
use crate::registry::{DeviceRecord, NodeSlot};

/// What a single property update amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Node(s) ensured and value(s) written.
    Written,
    /// Precondition unmet (malformed value, missing/invalid sampling rate);
    /// nothing created, nothing written. Healed by a later well-formed record.
    Skipped,
}

/// Ensure the node(s) for `descriptor` exist on `device` and write the
/// record's value(s) to them.
pub fn apply_property(
    provider: &dyn AddressSpace,
    descriptor: &PropertyDescriptor,
    device: &mut DeviceRecord,
    dynamb: &Dynamb,
) -> Result<Applied, ProviderError> {
    match descriptor.cardinality {
        Cardinality::Scalar => apply_scalar(provider, descriptor, device, dynamb),
        Cardinality::FixedVector { labels } => {
            apply_fixed_vector(provider, descriptor, device, dynamb, labels)
        }
        Cardinality::VariableSeries {
            max_axes,
            labels,
            sampling_rate_key,
        } => apply_series(
            provider,
            descriptor,
            device,
            dynamb,
            max_axes,
            labels,
            sampling_rate_key,
        ),
    }
}

fn apply_scalar(
    provider: &dyn AddressSpace,
    descriptor: &PropertyDescriptor,
    device: &mut DeviceRecord,
    dynamb: &Dynamb,
) -> Result<Applied, ProviderError> {
    let Some(value) = dynamb.scalar(descriptor.name) else {
        debug!(property = descriptor.name, "non-scalar value, update skipped");
        return Ok(Applied::Skipped);
    };

    let node = match device.slot(descriptor.name) {
        Some(NodeSlot::Single(node)) => *node,
        _ => {
            let node = provider.create_scalar_variable(
                device.container(),
                descriptor.browse_name,
                descriptor.unit,
                descriptor.range,
                descriptor.sampling_interval_ms,
                ValueType::Double,
            )?;
            device.set_slot(descriptor.name, NodeSlot::Single(node));
            node
        }
    };

    provider.write_value(node, Variant::Scalar(value), Quality::Good, dynamb.timestamp_utc())?;
    Ok(Applied::Written)
}

fn apply_fixed_vector(
    provider: &dyn AddressSpace,
    descriptor: &PropertyDescriptor,
    device: &mut DeviceRecord,
    dynamb: &Dynamb,
    labels: &'static [&'static str],
) -> Result<Applied, ProviderError> {
    let Some(values) = dynamb.vector(descriptor.name) else {
        debug!(property = descriptor.name, "non-vector value, update skipped");
        return Ok(Applied::Skipped);
    };

    // The axis count is pinned to the descriptor, not the record: always
    // exactly one node per declared axis.
    let expected = labels.len();
    let needs_provisioning = device.slot(descriptor.name).map(NodeSlot::axis_count)
        != Some(Some(expected));
    if needs_provisioning {
        let mut nodes = Vec::with_capacity(expected);
        for label in labels {
            let name = format!("{}{label}", descriptor.browse_name);
            nodes.push(provider.create_scalar_variable(
                device.container(),
                &name,
                descriptor.unit,
                descriptor.range,
                descriptor.sampling_interval_ms,
                ValueType::Double,
            )?);
        }
        device.set_slot(descriptor.name, NodeSlot::PerAxis(nodes));
    }

    let Some(NodeSlot::PerAxis(nodes)) = device.slot(descriptor.name) else {
        unreachable!("fixed-vector slot just provisioned");
    };
    let nodes = nodes.clone();
    for (node, value) in nodes.iter().zip(values) {
        provider.write_value(*node, Variant::Scalar(value), Quality::Good, dynamb.timestamp_utc())?;
    }
    Ok(Applied::Written)
}

#[allow(clippy::too_many_arguments)]
fn apply_series(
    provider: &dyn AddressSpace,
    descriptor: &PropertyDescriptor,
    device: &mut DeviceRecord,
    dynamb: &Dynamb,
    max_axes: usize,
    labels: &'static [&'static str],
    sampling_rate_key: &str,
) -> Result<Applied, ProviderError> {
    let Some(series) = dynamb.series(descriptor.name) else {
        debug!(property = descriptor.name, "non-series value, update skipped");
        return Ok(Applied::Skipped);
    };
    if series.is_empty() {
        debug!(property = descriptor.name, "empty series, update skipped");
        return Ok(Applied::Skipped);
    }

    // The time axis cannot be derived without a usable sampling rate; skip
    // the whole update and wait for a later record to supply one.
    let rate = dynamb.scalar(sampling_rate_key);
    let Some(rate) = rate.filter(|r| r.is_finite() && *r > 0.0) else {
        debug!(
            property = descriptor.name,
            ?rate,
            "missing or invalid sampling rate, update skipped"
        );
        return Ok(Applied::Skipped);
    };

    let axes = series.len().min(max_axes);

    // Re-provision when the observed axis count differs from what was last
    // provisioned; the replaced handles are discarded, not released.
    let needs_provisioning =
        device.slot(descriptor.name).map(NodeSlot::axis_count) != Some(Some(axes));
    if needs_provisioning {
        let mut nodes = Vec::with_capacity(axes);
        for (axis, samples) in series.iter().take(axes).enumerate() {
            let name = format!("{}{}", descriptor.browse_name, labels[axis]);
            let axis_high = axis_span_us(samples.len(), rate);
            nodes.push(provider.create_array_variable(
                device.container(),
                &name,
                descriptor.unit,
                descriptor.range,
                units::MICROSECOND,
                Range::new(0.0, axis_high),
                ValueType::Double,
            )?);
        }
        device.set_slot(descriptor.name, NodeSlot::PerAxis(nodes));
    }

    let Some(NodeSlot::PerAxis(nodes)) = device.slot(descriptor.name) else {
        unreachable!("series slot just provisioned");
    };
    let nodes = nodes.clone();
    for (node, samples) in nodes.iter().zip(series) {
        provider.write_value(
            *node,
            Variant::Array(samples),
            Quality::Good,
            dynamb.timestamp_utc(),
        )?;
    }
    Ok(Applied::Written)
}

/// Span of the time axis in microseconds for `samples` taken at `rate` Hz.
fn axis_span_us(samples: usize, rate: f64) -> f64 {
    if samples < 2 {
        return 0.0;
    }
    1e6 * (samples - 1) as f64 / rate
}
