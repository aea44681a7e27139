use crate::clients::crd_client::CrdClient;
use crate::clients::error::Result;
use crate::{DeliveryStream, Tag};
use kube::Api;
use serde_json::json;

/// An API client for the ACK `DeliveryStream` custom resource.
///
/// # Example
///
/// ```
///# use firehose_e2e_model::clients::{CrdClient, DeliveryStreamClient};
///# async fn no_run() -> Result<(), Box<dyn std::error::Error>> {
/// let client = DeliveryStreamClient::new("default").await?;
/// let stream = client.get("my-stream").await?;
/// println!("{:?}", stream.stream_status());
///# Ok(())
///# }
/// ```
#[derive(Clone)]
pub struct DeliveryStreamClient {
    api: Api<DeliveryStream>,
}

impl CrdClient for DeliveryStreamClient {
    type Crd = DeliveryStream;

    fn new_from_api(api: Api<Self::Crd>) -> Self {
        Self { api }
    }

    fn kind(&self) -> &'static str {
        "delivery stream"
    }

    fn api(&self) -> &Api<Self::Crd> {
        &self.api
    }
}

impl DeliveryStreamClient {
    /// Sets `spec.deliveryStreamEncryptionConfiguration`. Passing `None` for both fields writes
    /// explicit nulls, which disables server-side encryption.
    pub async fn patch_encryption<S>(
        &self,
        name: S,
        key_type: Option<&str>,
        key_arn: Option<&str>,
    ) -> Result<DeliveryStream>
    where
        S: AsRef<str> + Send,
    {
        self.merge_patch(
            name,
            encryption_patch(key_type, key_arn),
            "patch encryption configuration",
        )
        .await
    }

    /// Renames the HTTP endpoint destination and replaces the whole tag list.
    pub async fn patch_endpoint_name_and_tags<S>(
        &self,
        name: S,
        endpoint_name: &str,
        tags: &[Tag],
    ) -> Result<DeliveryStream>
    where
        S: AsRef<str> + Send,
    {
        self.merge_patch(
            name,
            endpoint_name_and_tags_patch(endpoint_name, tags),
            "patch destination name and tags",
        )
        .await
    }
}

fn encryption_patch(key_type: Option<&str>, key_arn: Option<&str>) -> serde_json::Value {
    json!({
        "spec": {
            "deliveryStreamEncryptionConfiguration": {
                "keyType": key_type,
                "keyARN": key_arn,
            }
        }
    })
}

fn endpoint_name_and_tags_patch(endpoint_name: &str, tags: &[Tag]) -> serde_json::Value {
    json!({
        "spec": {
            "httpEndpointDestinationConfiguration": {
                "endpointConfiguration": {
                    "name": endpoint_name,
                }
            },
            "tags": tags,
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn disabling_encryption_writes_nulls() {
        let patch = encryption_patch(None, None);
        let config = &patch["spec"]["deliveryStreamEncryptionConfiguration"];
        assert!(config["keyType"].is_null());
        assert!(config["keyARN"].is_null());
        assert!(config.as_object().unwrap().contains_key("keyARN"));
    }

    #[test]
    fn enabling_encryption_sets_key_type() {
        let patch = encryption_patch(Some("AWS_OWNED_CMK"), None);
        assert_eq!(
            patch["spec"]["deliveryStreamEncryptionConfiguration"]["keyType"],
            "AWS_OWNED_CMK"
        );
    }

    #[test]
    fn tags_replace_the_whole_list() {
        let tags = vec![Tag::new("environment", "prod"), Tag::new("owner", "qa")];
        let patch = endpoint_name_and_tags_patch("renamed", &tags);
        assert_eq!(
            patch["spec"]["httpEndpointDestinationConfiguration"]["endpointConfiguration"]["name"],
            "renamed"
        );
        assert_eq!(patch["spec"]["tags"][1]["key"], "owner");
        assert_eq!(patch["spec"]["tags"].as_array().unwrap().len(), 2);
    }
}
