/*!

Setup and teardown shared by the delivery stream tests.

!*/

use crate::error::{self, Result};
use crate::settings::TestSettings;
use crate::UPDATE_WAIT;
use aws_utils::aws::aws_config;
use aws_utils::firehose::FirehoseClient;
use aws_utils::json_display;
use firehose_e2e_model::clients::{self, CrdClient, DeliveryStreamClient, WaitPeriods};
use firehose_e2e_model::constants::{
    CONDITION_STATUS_TRUE, CONDITION_TYPE_RESOURCE_SYNCED, DELIVERY_STREAM_TYPE_DIRECT_PUT,
    KEY_DELIVERY_STREAM_NAME, KEY_DELIVERY_STREAM_TYPE, KEY_HTTP_DEST_NAME, KEY_HTTP_DEST_URL,
    KEY_S3_BUCKET_ARN, KEY_S3_ROLE_ARN,
};
use firehose_e2e_model::{
    load_delivery_stream, random_suffix_name, BootstrapResources, DeliveryStream,
    ObservedDeliveryStream, Replacements, Tag,
};
use log::{debug, info, warn};
use snafu::ensure;

const TEMPLATE: &str = "delivery_stream_httpdest";
const STREAM_NAME_PREFIX: &str = "http-dest-delivery-stream";
const STREAM_NAME_LEN: usize = 48;
const HTTP_DEST_PREFIX: &str = "http-dest";
const HTTP_DEST_LEN: usize = 20;
const HTTP_DEST_URL: &str = "https://example.com";

/// The clients and bootstrapped resources every test needs.
pub struct TestContext {
    pub streams: DeliveryStreamClient,
    pub firehose: FirehoseClient,
    pub resources: BootstrapResources,
}

impl TestContext {
    /// Reads the bootstrap record and connects to the cluster and to AWS. The region is taken from
    /// `FIREHOSE_E2E_REGION` if set, otherwise from the bootstrap record.
    pub async fn new() -> Result<Self> {
        let resources = BootstrapResources::read_from(TestSettings::bootstrap_dir()?)?;
        debug!("Using bootstrapped resources: {}", json_display(&resources));
        let region = TestSettings::region()?
            .map(str::to_string)
            .or_else(|| resources.region.clone());
        let config = aws_config(TestSettings::assume_role()?, &region).await;
        let streams = DeliveryStreamClient::new(TestSettings::namespace()?).await?;
        Ok(Self {
            streams,
            firehose: FirehoseClient::new(&config),
            resources,
        })
    }

    /// Waits for the controller to report the stream as synced.
    pub async fn wait_synced(&self, name: &str) -> Result<DeliveryStream> {
        Ok(self
            .streams
            .wait_on_condition(
                name,
                CONDITION_TYPE_RESOURCE_SYNCED,
                CONDITION_STATUS_TRUE,
                WaitPeriods::CONDITION,
            )
            .await?)
    }

    /// Gives the controller time to notice a change before waiting for it to sync. Without the
    /// pause the synced condition from before the change can still be observed.
    pub async fn settle_and_wait_synced(&self, name: &str) -> Result<DeliveryStream> {
        debug!("Waiting {:?} for the controller to pick up changes", UPDATE_WAIT);
        tokio::time::sleep(UPDATE_WAIT).await;
        self.wait_synced(name).await
    }

    /// Gets the custom resource and describes the stream it names.
    pub async fn observe(&self, name: &str) -> Result<(DeliveryStream, ObservedDeliveryStream)> {
        let stream = self.streams.get(name).await?;
        let observed = self
            .firehose
            .describe(&stream.spec.delivery_stream_name)
            .await?;
        Ok((stream, observed))
    }

    /// The tags Firehose reports for the stream, including the controller's own tags.
    pub async fn api_tags(&self, stream: &DeliveryStream) -> Result<Vec<Tag>> {
        Ok(self
            .firehose
            .list_tags(&stream.spec.delivery_stream_name)
            .await?)
    }
}

/// A delivery stream with an HTTP endpoint destination, created from the
/// `delivery_stream_httpdest` template with random names.
#[derive(Clone, Debug)]
pub struct HttpDestStream {
    name: String,
    endpoint_name: String,
}

impl HttpDestStream {
    /// Creates the custom resource and waits until the controller has consumed it. Returns the
    /// consumed object along with the fixture.
    pub async fn create(ctx: &TestContext) -> Result<(Self, DeliveryStream)> {
        let fixture = Self {
            name: random_suffix_name(STREAM_NAME_PREFIX, STREAM_NAME_LEN)?,
            endpoint_name: random_suffix_name(HTTP_DEST_PREFIX, HTTP_DEST_LEN)?,
        };
        let manifest = load_delivery_stream(
            TestSettings::resource_dir()?,
            TEMPLATE,
            &fixture.replacements(&ctx.resources),
        )?;

        debug!("Rendered delivery stream: {}", json_display(manifest.document()));
        info!("Creating delivery stream '{}'", fixture.name);
        ctx.streams.create(&manifest).await?;
        match fixture.wait_created(ctx).await {
            Ok(consumed) => Ok((fixture, consumed)),
            Err(e) => {
                fixture.teardown(ctx).await;
                Err(e)
            }
        }
    }

    async fn wait_created(&self, ctx: &TestContext) -> Result<DeliveryStream> {
        let consumed = ctx
            .streams
            .wait_consumed(&self.name, WaitPeriods::CONSUMED)
            .await?;
        ensure!(
            ctx.streams.exists(&self.name).await?,
            error::MismatchSnafu {
                what: format!("existence of delivery stream '{}'", self.name),
                expected: "true",
                actual: "false",
            }
        );
        Ok(consumed)
    }

    fn replacements(&self, resources: &BootstrapResources) -> Replacements {
        let mut replacements = Replacements::new();
        replacements
            .insert(KEY_DELIVERY_STREAM_NAME, &self.name)
            .insert(KEY_DELIVERY_STREAM_TYPE, DELIVERY_STREAM_TYPE_DIRECT_PUT)
            .insert(KEY_HTTP_DEST_NAME, &self.endpoint_name)
            .insert(KEY_HTTP_DEST_URL, HTTP_DEST_URL)
            .insert(KEY_S3_BUCKET_ARN, resources.http_dest_bucket.arn())
            .insert(KEY_S3_ROLE_ARN, &resources.http_dest_bucket_role.arn);
        replacements
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The HTTP endpoint destination name the stream was created with.
    pub fn endpoint_name(&self) -> &str {
        &self.endpoint_name
    }

    /// Deletes the custom resource and waits for it to disappear.
    pub async fn delete(&self, ctx: &TestContext) -> clients::Result<()> {
        info!("Deleting delivery stream '{}'", self.name);
        ctx.streams
            .delete_and_wait(&self.name, WaitPeriods::DELETE)
            .await
    }

    /// Deletes the stream, logging instead of failing if the cluster cannot be reached or the
    /// stream does not disappear in time. Safe to call after `delete`.
    pub async fn teardown(&self, ctx: &TestContext) {
        if let Err(e) = self.delete(ctx).await {
            warn!(
                "Unable to tear down delivery stream '{}': {}",
                self.name, e
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use firehose_e2e_model::{BucketRecord, RoleRecord};

    #[test]
    fn replacements_fill_the_template() {
        let resources = BootstrapResources {
            region: Some("us-west-2".to_string()),
            http_dest_bucket: BucketRecord {
                name: "firehose-http-dest-abc".to_string(),
            },
            http_dest_bucket_role: RoleRecord {
                name: "firehose-http-dest-role-abc".to_string(),
                arn: "arn:aws:iam::123456789012:role/firehose-http-dest-role-abc".to_string(),
                managed_policies: Vec::new(),
            },
        };
        let fixture = HttpDestStream {
            name: random_suffix_name(STREAM_NAME_PREFIX, STREAM_NAME_LEN).unwrap(),
            endpoint_name: random_suffix_name(HTTP_DEST_PREFIX, HTTP_DEST_LEN).unwrap(),
        };
        assert_eq!(fixture.name().len(), 48);
        assert_eq!(fixture.endpoint_name().len(), 20);

        let manifest = load_delivery_stream(
            concat!(env!("CARGO_MANIFEST_DIR"), "/resources"),
            TEMPLATE,
            &fixture.replacements(&resources),
        )
        .unwrap();
        assert_eq!(manifest.document()["spec"]["deliveryStreamName"], fixture.name());
        let stream = manifest.object();
        assert_eq!(stream.metadata.name.as_deref(), Some(fixture.name()));
        assert_eq!(stream.spec.delivery_stream_name, fixture.name());
        assert_eq!(stream.spec.delivery_stream_type.as_deref(), Some("DirectPut"));
        assert_eq!(stream.http_endpoint_name(), Some(fixture.endpoint_name()));
        assert!(stream.encryption_disabled());
        assert_eq!(
            stream.spec_tags(),
            &[Tag::new("environment", "dev"), Tag::new("team", "finops")]
        );
        let s3 = stream
            .spec
            .http_endpoint_destination_configuration
            .as_ref()
            .and_then(|http| http.s3_configuration.as_ref())
            .unwrap();
        assert_eq!(s3.bucket_arn.as_deref(), Some("arn:aws:s3:::firehose-http-dest-abc"));
        assert_eq!(
            s3.role_arn.as_deref(),
            Some("arn:aws:iam::123456789012:role/firehose-http-dest-role-abc")
        );
    }
}
