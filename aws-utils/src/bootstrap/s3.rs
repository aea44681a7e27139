use super::{has_error_code, AwsClients, Bootstrappable};
use crate::constants::{ERROR_CODE_NO_SUCH_BUCKET, MAX_BUCKET_NAME_LEN, S3_DEFAULT_LOCATION};
use crate::error::{self, Error, Result};
use aws_sdk_s3::model::{BucketLocationConstraint, CreateBucketConfiguration};
use firehose_e2e_model::{random_suffix_name, BucketRecord};
use log::{debug, info};
use snafu::ResultExt;

/// An S3 bucket with a randomized name.
#[derive(Clone, Debug)]
pub struct Bucket {
    name_prefix: String,
    name: Option<String>,
}

impl Bucket {
    pub fn new<S: Into<String>>(name_prefix: S) -> Self {
        Self {
            name_prefix: name_prefix.into(),
            name: None,
        }
    }

    /// A bucket that was bootstrapped by an earlier run.
    pub fn from_record(record: &BucketRecord) -> Self {
        Self {
            name_prefix: String::new(),
            name: Some(record.name.clone()),
        }
    }

    /// The record of the created bucket, if it has been created.
    pub fn record(&self) -> Option<BucketRecord> {
        self.name.as_ref().map(|name| BucketRecord { name: name.clone() })
    }

    async fn empty(&self, clients: &AwsClients, bucket: &str) -> Result<()> {
        let mut continuation_token = None;
        loop {
            let output = clients
                .s3
                .list_objects_v2()
                .bucket(bucket)
                .set_continuation_token(continuation_token)
                .send()
                .await
                .context(error::ListObjectsSnafu { bucket })?;
            for key in output
                .contents()
                .unwrap_or_default()
                .iter()
                .filter_map(|object| object.key())
            {
                debug!("Deleting '{}' from bucket '{}'", key, bucket);
                clients
                    .s3
                    .delete_object()
                    .bucket(bucket)
                    .key(key)
                    .send()
                    .await
                    .context(error::DeleteObjectSnafu { bucket, key })?;
            }
            continuation_token = output.next_continuation_token().map(str::to_string);
            if continuation_token.is_none() {
                return Ok(());
            }
        }
    }
}

#[async_trait::async_trait]
impl Bootstrappable<AwsClients> for Bucket {
    fn description(&self) -> String {
        match &self.name {
            Some(name) => format!("bucket '{}'", name),
            None => format!("bucket with prefix '{}'", self.name_prefix),
        }
    }

    async fn bootstrap(&mut self, clients: &AwsClients) -> Result<()> {
        let name = random_suffix_name(&self.name_prefix, MAX_BUCKET_NAME_LEN)
            .context(error::NameSnafu { what: "bucket" })?;
        let mut request = clients.s3.create_bucket().bucket(&name);
        if clients.region != S3_DEFAULT_LOCATION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(clients.region.as_str()))
                    .build(),
            );
        }
        request
            .send()
            .await
            .context(error::CreateBucketSnafu { bucket: &name })?;
        info!("Created bucket '{}' in '{}'", name, clients.region);
        self.name = Some(name);
        Ok(())
    }

    async fn cleanup(&self, clients: &AwsClients) -> Result<()> {
        let name = match &self.name {
            Some(name) => name,
            None => return Ok(()),
        };
        // A bucket that is already gone was cleaned up by an earlier, partially failed run.
        match self.empty(clients, name).await {
            Err(Error::ListObjects { source, .. })
                if has_error_code(&source, ERROR_CODE_NO_SUCH_BUCKET) =>
            {
                info!("Bucket '{}' was already deleted", name);
                return Ok(());
            }
            result => result?,
        }
        let result = clients.s3.delete_bucket().bucket(name).send().await;
        if matches!(&result, Err(e) if has_error_code(e, ERROR_CODE_NO_SUCH_BUCKET)) {
            info!("Bucket '{}' was already deleted", name);
            return Ok(());
        }
        result.context(error::DeleteBucketSnafu { bucket: name })?;
        info!("Deleted bucket '{}'", name);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn record_is_only_available_after_creation() {
        let bucket = Bucket::new("firehose-http-dest");
        assert!(bucket.record().is_none());
        assert_eq!(
            bucket.description(),
            "bucket with prefix 'firehose-http-dest'"
        );

        let record = BucketRecord {
            name: "firehose-http-dest-abc".to_string(),
        };
        let bucket = Bucket::from_record(&record);
        assert_eq!(bucket.record(), Some(record));
        assert_eq!(bucket.description(), "bucket 'firehose-http-dest-abc'");
    }
}
