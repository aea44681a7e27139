/*!

Reads delivery stream state straight from the Firehose API so tests can compare it with what the
controller reports in the custom resource's status.

!*/

use crate::error::{self, Result};
use aws_sdk_firehose::error::DescribeDeliveryStreamErrorKind;
use aws_sdk_firehose::model::{DeliveryStreamDescription, DestinationDescription};
use aws_sdk_firehose::types::SdkError;
use aws_types::SdkConfig;
use firehose_e2e_model::{ObservedDeliveryStream, ObservedDestination, Tag};
use log::trace;
use snafu::{OptionExt, ResultExt};

/// A delivery stream can carry at most 50 tags, so one page of this size returns all of them.
const MAX_TAGS: i32 = 50;

#[derive(Clone, Debug)]
pub struct FirehoseClient {
    client: aws_sdk_firehose::Client,
}

impl FirehoseClient {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_firehose::Client::new(config),
        }
    }

    /// Describes the stream named `name`. Returns `None` if Firehose does not know the stream.
    pub async fn describe_opt(&self, name: &str) -> Result<Option<ObservedDeliveryStream>> {
        let result = self
            .client
            .describe_delivery_stream()
            .delivery_stream_name(name)
            .send()
            .await;
        if let Err(SdkError::ServiceError(service_error)) = &result {
            if matches!(
                &service_error.err().kind,
                DescribeDeliveryStreamErrorKind::ResourceNotFoundException(_)
            ) {
                trace!("delivery stream '{}' does not exist", name);
                return Ok(None);
            }
        }
        let output = result.context(error::DescribeDeliveryStreamSnafu { name })?;
        let description =
            output
                .delivery_stream_description()
                .context(error::MissingSnafu {
                    what: "delivery stream description",
                    from: "describe delivery stream output",
                })?;
        Ok(Some(observe(description)))
    }

    pub async fn describe(&self, name: &str) -> Result<ObservedDeliveryStream> {
        self.describe_opt(name).await?.context(error::MissingSnafu {
            what: format!("delivery stream '{}'", name),
            from: "the Firehose API",
        })
    }

    /// Every tag on the stream, including the controller's own bookkeeping tags.
    pub async fn list_tags(&self, name: &str) -> Result<Vec<Tag>> {
        let output = self
            .client
            .list_tags_for_delivery_stream()
            .delivery_stream_name(name)
            .limit(MAX_TAGS)
            .send()
            .await
            .context(error::ListTagsSnafu { name })?;
        Ok(output
            .tags()
            .unwrap_or_default()
            .iter()
            .map(|tag| Tag {
                key: tag.key().map(str::to_string),
                value: tag.value().map(str::to_string),
            })
            .collect())
    }
}

fn observe(description: &DeliveryStreamDescription) -> ObservedDeliveryStream {
    let encryption = description.delivery_stream_encryption_configuration();
    ObservedDeliveryStream {
        name: description
            .delivery_stream_name()
            .unwrap_or_default()
            .to_string(),
        status: description
            .delivery_stream_status()
            .map(|status| status.as_str().to_string()),
        stream_type: description
            .delivery_stream_type()
            .map(|stream_type| stream_type.as_str().to_string()),
        encryption_status: encryption
            .and_then(|encryption| encryption.status())
            .map(|status| status.as_str().to_string()),
        encryption_key_type: encryption
            .and_then(|encryption| encryption.key_type())
            .map(|key_type| key_type.as_str().to_string()),
        encryption_key_arn: encryption
            .and_then(|encryption| encryption.key_arn())
            .map(str::to_string),
        destinations: description
            .destinations()
            .unwrap_or_default()
            .iter()
            .map(observe_destination)
            .collect(),
    }
}

fn observe_destination(destination: &DestinationDescription) -> ObservedDestination {
    let endpoint = destination
        .http_endpoint_destination_description()
        .and_then(|http| http.endpoint_configuration());
    ObservedDestination {
        destination_id: destination.destination_id().map(str::to_string),
        http_endpoint_name: endpoint
            .and_then(|endpoint| endpoint.name())
            .map(str::to_string),
        http_endpoint_url: endpoint
            .and_then(|endpoint| endpoint.url())
            .map(str::to_string),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use aws_sdk_firehose::model::{
        DeliveryStreamEncryptionConfiguration, DeliveryStreamEncryptionStatus,
        DeliveryStreamStatus, DeliveryStreamType, HttpEndpointDescription,
        HttpEndpointDestinationDescription, KeyType,
    };

    fn http_destination(id: &str, name: &str) -> DestinationDescription {
        DestinationDescription::builder()
            .destination_id(id)
            .http_endpoint_destination_description(
                HttpEndpointDestinationDescription::builder()
                    .endpoint_configuration(
                        HttpEndpointDescription::builder()
                            .name(name)
                            .url("https://example.com")
                            .build(),
                    )
                    .build(),
            )
            .build()
    }

    #[test]
    fn observes_an_encrypted_http_stream() {
        let description = DeliveryStreamDescription::builder()
            .delivery_stream_name("http-dest-delivery-stream-abc")
            .delivery_stream_status(DeliveryStreamStatus::Active)
            .delivery_stream_type(DeliveryStreamType::DirectPut)
            .delivery_stream_encryption_configuration(
                DeliveryStreamEncryptionConfiguration::builder()
                    .status(DeliveryStreamEncryptionStatus::Enabled)
                    .key_type(KeyType::AwsOwnedCmk)
                    .build(),
            )
            .destinations(http_destination("destinationId-000000000001", "dest-1"))
            .build();

        let observed = observe(&description);
        assert_eq!(observed.name, "http-dest-delivery-stream-abc");
        assert_eq!(observed.status.as_deref(), Some("ACTIVE"));
        assert_eq!(observed.stream_type.as_deref(), Some("DirectPut"));
        assert_eq!(observed.encryption_status.as_deref(), Some("ENABLED"));
        assert_eq!(observed.encryption_key_type.as_deref(), Some("AWS_OWNED_CMK"));
        assert_eq!(observed.encryption_key_arn, None);
        assert_eq!(observed.single_http_endpoint_name(), Some("dest-1"));
        assert_eq!(
            observed.destinations[0].http_endpoint_url.as_deref(),
            Some("https://example.com")
        );
    }

    #[test]
    fn missing_fields_stay_empty() {
        let observed = observe(&DeliveryStreamDescription::builder().build());
        assert_eq!(observed.name, "");
        assert!(observed.status.is_none());
        assert!(observed.encryption_status.is_none());
        assert!(observed.destinations.is_empty());
        assert_eq!(observed.single_http_endpoint_name(), None);
    }

    #[test]
    fn several_destinations_have_no_single_name() {
        let description = DeliveryStreamDescription::builder()
            .destinations(http_destination("destinationId-000000000001", "a"))
            .destinations(http_destination("destinationId-000000000002", "b"))
            .build();
        let observed = observe(&description);
        assert_eq!(observed.destinations.len(), 2);
        assert_eq!(observed.single_http_endpoint_name(), None);
    }
}
