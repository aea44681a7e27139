/*!

Checks that the custom resource and the Firehose API agree with each other and with what the test
asked for. Each check returns an error instead of panicking so that a test can still tear down its
delivery stream before reporting the failure.

!*/

use crate::error::{self, Result};
use firehose_e2e_model::constants::{
    CONDITION_TYPE_RESOURCE_SYNCED, DELIVERY_STREAM_TYPE_DIRECT_PUT, ENCRYPTION_STATUS_DISABLED,
    ENCRYPTION_STATUS_ENABLED, STREAM_STATUS_ACTIVE,
};
use firehose_e2e_model::{
    delta_without_system_tags, CrdExt, DeliveryStream, ObservedDeliveryStream, Tag,
};
use snafu::ensure;

const NONE: &str = "<none>";

/// Fails with a `Mismatch` unless `actual` is `expected`.
pub fn expect_value(what: &str, expected: &str, actual: Option<&str>) -> Result<()> {
    ensure!(
        actual == Some(expected),
        error::MismatchSnafu {
            what,
            expected,
            actual: actual.unwrap_or(NONE),
        }
    );
    Ok(())
}

fn expect_count(what: &str, expected: usize, actual: usize) -> Result<()> {
    ensure!(
        actual == expected,
        error::MismatchSnafu {
            what,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    );
    Ok(())
}

/// The controller reports `ACK.ResourceSynced` as `True`.
pub fn assert_synced(stream: &DeliveryStream) -> Result<()> {
    ensure!(
        stream.is_synced(),
        error::MismatchSnafu {
            what: format!("synced condition of '{}'", stream.object_name()),
            expected: "True",
            actual: stream
                .condition_status(CONDITION_TYPE_RESOURCE_SYNCED)
                .unwrap_or(NONE),
        }
    );
    Ok(())
}

/// Both the custom resource's status and the Firehose API report the stream as `ACTIVE`.
pub fn assert_active(stream: &DeliveryStream, observed: &ObservedDeliveryStream) -> Result<()> {
    expect_value(
        "custom resource stream status",
        STREAM_STATUS_ACTIVE,
        stream.stream_status(),
    )?;
    expect_value(
        "Firehose stream status",
        STREAM_STATUS_ACTIVE,
        observed.status.as_deref(),
    )
}

/// The spec asks for no encryption and both sides report encryption as `DISABLED`.
pub fn assert_encryption_disabled(
    stream: &DeliveryStream,
    observed: &ObservedDeliveryStream,
) -> Result<()> {
    ensure!(
        stream.encryption_disabled(),
        error::MismatchSnafu {
            what: "spec encryption configuration",
            expected: "no key type or key ARN",
            actual: format!(
                "{:?}",
                stream.spec.delivery_stream_encryption_configuration
            ),
        }
    );
    expect_value(
        "custom resource encryption status",
        ENCRYPTION_STATUS_DISABLED,
        stream.encryption_status(),
    )?;
    expect_value(
        "Firehose encryption status",
        ENCRYPTION_STATUS_DISABLED,
        observed.encryption_status.as_deref(),
    )
}

/// Both sides report encryption as `ENABLED` and Firehose uses a key of `key_type`.
pub fn assert_encryption_enabled(
    stream: &DeliveryStream,
    observed: &ObservedDeliveryStream,
    key_type: &str,
) -> Result<()> {
    expect_value(
        "custom resource encryption status",
        ENCRYPTION_STATUS_ENABLED,
        stream.encryption_status(),
    )?;
    expect_value(
        "Firehose encryption status",
        ENCRYPTION_STATUS_ENABLED,
        observed.encryption_status.as_deref(),
    )?;
    expect_value(
        "Firehose encryption key type",
        key_type,
        observed.encryption_key_type.as_deref(),
    )
}

/// The stream is a `DirectPut` stream with exactly one destination, an HTTP endpoint named
/// `endpoint_name` in both the spec and the Firehose API.
pub fn assert_http_destination(
    stream: &DeliveryStream,
    observed: &ObservedDeliveryStream,
    endpoint_name: &str,
) -> Result<()> {
    expect_value(
        "spec HTTP endpoint name",
        endpoint_name,
        stream.http_endpoint_name(),
    )?;
    expect_value(
        "Firehose stream type",
        DELIVERY_STREAM_TYPE_DIRECT_PUT,
        observed.stream_type.as_deref(),
    )?;
    expect_count(
        "number of Firehose destinations",
        1,
        observed.destinations.len(),
    )?;
    expect_value(
        "Firehose HTTP endpoint name",
        endpoint_name,
        observed.single_http_endpoint_name(),
    )
}

/// The spec declares exactly `expected`, in order.
pub fn assert_spec_tags(stream: &DeliveryStream, expected: &[Tag]) -> Result<()> {
    let actual = stream.spec_tags();
    expect_count("number of spec tags", expected.len(), actual.len())?;
    for (index, (expected, actual)) in expected.iter().zip(actual).enumerate() {
        ensure!(
            expected == actual,
            error::MismatchSnafu {
                what: format!("spec tag {}", index),
                expected: expected.to_string(),
                actual: actual.to_string(),
            }
        );
    }
    Ok(())
}

/// `actual` holds the same tags as `expected`, in any order, once the controller's own tags are
/// removed.
pub fn assert_equal_without_ack_tags(name: &str, expected: &[Tag], actual: &[Tag]) -> Result<()> {
    let delta = delta_without_system_tags(expected, actual);
    ensure!(
        delta.is_empty(),
        error::TagMismatchSnafu {
            name,
            delta: delta.to_string(),
        }
    );
    Ok(())
}
