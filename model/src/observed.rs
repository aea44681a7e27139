use serde::{Deserialize, Serialize};

/// A snapshot of a delivery stream as reported by `DescribeDeliveryStream`. This is what the
/// custom resource's spec and status are compared against once the controller reports that it is
/// synced.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedDeliveryStream {
    pub name: String,
    pub status: Option<String>,
    pub stream_type: Option<String>,
    pub encryption_status: Option<String>,
    pub encryption_key_type: Option<String>,
    pub encryption_key_arn: Option<String>,
    pub destinations: Vec<ObservedDestination>,
}

/// One entry of the stream's destination list. Only HTTP endpoint destinations are described.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedDestination {
    pub destination_id: Option<String>,
    pub http_endpoint_name: Option<String>,
    pub http_endpoint_url: Option<String>,
}

impl ObservedDeliveryStream {
    /// The HTTP endpoint name of the only destination. `None` if there is not exactly one.
    pub fn single_http_endpoint_name(&self) -> Option<&str> {
        match self.destinations.as_slice() {
            [destination] => destination.http_endpoint_name.as_deref(),
            _ => None,
        }
    }
}
