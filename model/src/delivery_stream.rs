use crate::constants::{CONDITION_STATUS_TRUE, CONDITION_TYPE_RESOURCE_SYNCED};
use crate::{CrdExt, Tag};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The client-side view of the Firehose controller's `DeliveryStream` custom resource. Only the
/// fields that the tests create, patch or inspect are modeled; unknown fields returned by the API
/// server are ignored. The `CustomResource` derive also produces a struct named `DeliveryStream`
/// which represents the object in the k8s API.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    derive = "Default",
    derive = "PartialEq",
    group = "firehose.services.k8s.aws",
    kind = "DeliveryStream",
    namespaced,
    plural = "deliverystreams",
    singular = "deliverystream",
    status = "DeliveryStreamStatus",
    version = "v1alpha1",
    printcolumn = r#"{"name":"Status", "type":"string", "jsonPath":".status.deliveryStreamStatus"}"#,
    printcolumn = r#"{"name":"Synced", "type":"string", "jsonPath":".status.conditions[?(@.type==\"ACK.ResourceSynced\")].status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStreamSpec {
    pub delivery_stream_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_stream_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_stream_encryption_configuration: Option<EncryptionConfigurationInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_endpoint_destination_configuration: Option<HttpEndpointDestinationConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionConfigurationInput {
    #[serde(rename = "keyARN", skip_serializing_if = "Option::is_none")]
    pub key_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
}

impl EncryptionConfigurationInput {
    /// Server-side encryption is requested only when at least one of the key fields is set.
    pub fn is_empty(&self) -> bool {
        self.key_arn.is_none() && self.key_type.is_none()
    }
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEndpointDestinationConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffering_hints: Option<BufferingHints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_watch_logging_options: Option<CloudWatchLoggingOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_configuration: Option<HttpEndpointConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_configuration: Option<ProcessingConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_configuration: Option<HttpEndpointRequestConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_options: Option<RetryOptions>,
    #[serde(rename = "roleARN", skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_backup_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_configuration: Option<S3DestinationConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets_manager_configuration: Option<SecretsManagerConfiguration>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEndpointConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferingHints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_in_seconds: Option<i64>,
    #[serde(rename = "sizeInMBs", skip_serializing_if = "Option::is_none")]
    pub size_in_mbs: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudWatchLoggingOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_group_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_stream_name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processors: Option<Vec<Processor>>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Processor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ProcessorParameter>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub processor_type: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorParameter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_value: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEndpointRequestConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_attributes: Option<Vec<HttpEndpointCommonAttribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEndpointCommonAttribute {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_value: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_in_seconds: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct S3DestinationConfiguration {
    #[serde(rename = "bucketARN", skip_serializing_if = "Option::is_none")]
    pub bucket_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffering_hints: Option<BufferingHints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_watch_logging_options: Option<CloudWatchLoggingOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_configuration: Option<S3EncryptionConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_output_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(rename = "roleARN", skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct S3EncryptionConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kms_encryption_config: Option<KmsEncryptionConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_encryption_config: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
pub struct KmsEncryptionConfig {
    #[serde(rename = "awsKMSKeyARN", skip_serializing_if = "Option::is_none")]
    pub aws_kms_key_arn: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretsManagerConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(rename = "roleARN", skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    #[serde(rename = "secretARN", skip_serializing_if = "Option::is_none")]
    pub secret_arn: Option<String>,
}

/// The status the controller mirrors from the Firehose API onto the custom resource.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStreamStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ack_resource_metadata: Option<AckResourceMetadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_stream_encryption_configuration_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_stream_status: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AckResourceMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(rename = "ownerAccountID", skip_serializing_if = "Option::is_none")]
    pub owner_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// A condition set by the controller, e.g. `ACK.ResourceSynced`.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DeliveryStream {
    /// Gets the delivery stream status reported by the controller (e.g. `ACTIVE`).
    pub fn stream_status(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|s| s.delivery_stream_status.as_deref())
    }

    /// Gets the server-side encryption status reported by the controller (e.g. `ENABLED`).
    pub fn encryption_status(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|s| s.delivery_stream_encryption_configuration_status.as_deref())
    }

    /// Gets the name of the HTTP endpoint destination declared in the spec.
    pub fn http_endpoint_name(&self) -> Option<&str> {
        self.spec
            .http_endpoint_destination_configuration
            .as_ref()
            .and_then(|dest| dest.endpoint_configuration.as_ref())
            .and_then(|endpoint| endpoint.name.as_deref())
    }

    /// The tags declared in the spec, in declaration order.
    pub fn spec_tags(&self) -> &[Tag] {
        self.spec.tags.as_deref().unwrap_or_default()
    }

    /// Whether the spec leaves server-side encryption disabled, either by omitting the
    /// configuration or by leaving both `keyType` and `keyARN` unset.
    pub fn encryption_disabled(&self) -> bool {
        self.spec
            .delivery_stream_encryption_configuration
            .as_ref()
            .map(EncryptionConfigurationInput::is_empty)
            .unwrap_or(true)
    }

    /// Whether the controller has reported `ACK.ResourceSynced` as `True`.
    pub fn is_synced(&self) -> bool {
        self.condition_status(CONDITION_TYPE_RESOURCE_SYNCED) == Some(CONDITION_STATUS_TRUE)
    }
}

impl CrdExt for DeliveryStream {
    fn object_meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|status| status.conditions.as_slice())
            .unwrap_or_default()
    }

    fn has_status(&self) -> bool {
        self.status.is_some()
    }

    fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn synced_stream() -> DeliveryStream {
        serde_json::from_value(json!({
            "apiVersion": "firehose.services.k8s.aws/v1alpha1",
            "kind": "DeliveryStream",
            "metadata": { "name": "http-dest-delivery-stream-abc", "namespace": "default" },
            "spec": {
                "deliveryStreamName": "http-dest-delivery-stream-abc",
                "deliveryStreamType": "DirectPut",
                "httpEndpointDestinationConfiguration": {
                    "endpointConfiguration": { "name": "http-dest-xyz", "url": "https://example.com" },
                    "s3Configuration": {
                        "bucketARN": "arn:aws:s3:::bucket",
                        "roleARN": "arn:aws:iam::123456789012:role/firehose"
                    }
                },
                "tags": [
                    { "key": "environment", "value": "dev" },
                    { "key": "team", "value": "finops" }
                ]
            },
            "status": {
                "ackResourceMetadata": {
                    "arn": "arn:aws:firehose:us-west-2:123456789012:deliverystream/x",
                    "ownerAccountID": "123456789012",
                    "region": "us-west-2"
                },
                "conditions": [
                    { "type": "ACK.ResourceSynced", "status": "True", "lastTransitionTime": "2024-01-01T00:00:00Z" }
                ],
                "deliveryStreamStatus": "ACTIVE",
                "deliveryStreamEncryptionConfigurationStatus": "DISABLED",
                "unmodeledField": 12
            }
        }))
        .unwrap()
    }

    #[test]
    fn status_accessors() {
        let stream = synced_stream();
        assert!(stream.is_synced());
        assert!(stream.has_status());
        assert_eq!(stream.stream_status(), Some("ACTIVE"));
        assert_eq!(stream.encryption_status(), Some("DISABLED"));
        assert_eq!(stream.http_endpoint_name(), Some("http-dest-xyz"));
        assert_eq!(stream.spec_tags().len(), 2);
        assert_eq!(stream.object_name(), "http-dest-delivery-stream-abc");
        assert_eq!(
            stream
                .condition(CONDITION_TYPE_RESOURCE_SYNCED)
                .and_then(|c| c.last_transition_time.as_deref()),
            Some("2024-01-01T00:00:00Z")
        );
    }

    #[test]
    fn resource_identity() {
        use crate::constants::{
            API_VERSION, CRD_GROUP, DELIVERY_STREAM_KIND, DELIVERY_STREAM_PLURAL,
        };
        use kube::Resource;
        assert_eq!(DeliveryStream::group(&()), CRD_GROUP);
        assert_eq!(DeliveryStream::kind(&()), DELIVERY_STREAM_KIND);
        assert_eq!(DeliveryStream::plural(&()), DELIVERY_STREAM_PLURAL);
        assert_eq!(DeliveryStream::api_version(&()), API_VERSION);
    }

    #[test]
    fn missing_status_is_not_synced() {
        let mut stream = synced_stream();
        stream.status = None;
        assert!(!stream.is_synced());
        assert!(!stream.has_status());
        assert!(stream.stream_status().is_none());
        assert!(stream.conditions().is_empty());
    }

    #[test]
    fn encryption_disabled_when_absent_or_empty() {
        let mut stream = synced_stream();
        assert!(stream.encryption_disabled());

        stream.spec.delivery_stream_encryption_configuration =
            Some(EncryptionConfigurationInput::default());
        assert!(stream.encryption_disabled());

        stream.spec.delivery_stream_encryption_configuration = Some(EncryptionConfigurationInput {
            key_arn: None,
            key_type: Some("AWS_OWNED_CMK".to_string()),
        });
        assert!(!stream.encryption_disabled());
    }

    #[test]
    fn spec_serialization_omits_unset_fields() {
        let stream = synced_stream();
        let value = serde_json::to_value(&stream.spec).unwrap();
        assert!(value.get("deliveryStreamEncryptionConfiguration").is_none());
        assert_eq!(
            value["httpEndpointDestinationConfiguration"]["s3Configuration"]["bucketARN"],
            "arn:aws:s3:::bucket"
        );
        assert!(value["httpEndpointDestinationConfiguration"]
            .get("roleARN")
            .is_none());
    }
}
