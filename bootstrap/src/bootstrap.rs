use crate::error::{self, Result};
use aws_utils::bootstrap::{bootstrap_all, cleanup_all, AwsClients, Bucket, Role};
use firehose_e2e_model::BootstrapResources;
use log::{error, info};
use snafu::{IntoError, ResultExt};
use std::path::Path;

pub(crate) const HTTP_DEST_BUCKET_PREFIX: &str = "firehose-http-dest";
pub(crate) const HTTP_DEST_ROLE_PREFIX: &str = "firehose-http-dest-role";
pub(crate) const FIREHOSE_SERVICE_PRINCIPAL: &str = "firehose.amazonaws.com";
pub(crate) const S3_ACCESS_POLICY_ARN: &str = "arn:aws:iam::aws:policy/AmazonS3FullAccess";

fn http_dest_role() -> Role {
    Role::new(
        HTTP_DEST_ROLE_PREFIX,
        FIREHOSE_SERVICE_PRINCIPAL,
        vec![S3_ACCESS_POLICY_ARN.to_string()],
    )
}

/// Creates the bucket and the role, then writes their record to `dir`. If the record cannot be
/// written the resources are cleaned up again since nothing would know about them, and any
/// resource that could not be removed is named in the returned error.
pub(crate) async fn run(clients: &AwsClients, dir: &Path) -> Result<()> {
    let mut bucket = Bucket::new(HTTP_DEST_BUCKET_PREFIX);
    let mut role = http_dest_role();
    bootstrap_all(clients, &mut [&mut bucket, &mut role])
        .await
        .context(error::BootstrapSnafu)?;

    let resources = match record(&clients.region, &bucket, &role) {
        Ok(resources) => resources,
        Err(what) => {
            error!("{} was not recorded after bootstrapping", what);
            let cleanup_errors = cleanup_all(clients, &[&mut bucket, &mut role]).await;
            return error::UnrecordedSnafu {
                what,
                cleanup_errors,
            }
            .fail();
        }
    };
    match resources.serialize_to(dir) {
        Ok(path) => {
            info!("Wrote bootstrap record to '{}'", path.display());
            Ok(())
        }
        Err(source) => {
            error!("Unable to write the bootstrap record: {}", source);
            let cleanup_errors = cleanup_all(clients, &[&mut bucket, &mut role]).await;
            Err(error::WriteRecordSnafu {
                dir,
                cleanup_errors,
            }
            .into_error(source))
        }
    }
}

/// Collects the records of the bootstrapped resources. Fails with the name of the first resource
/// that has no record.
fn record(
    region: &str,
    bucket: &Bucket,
    role: &Role,
) -> std::result::Result<BootstrapResources, &'static str> {
    Ok(BootstrapResources {
        region: Some(region.to_string()),
        http_dest_bucket: bucket.record().ok_or("bucket")?,
        http_dest_bucket_role: role.record().ok_or("role")?,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use aws_utils::bootstrap::Bootstrappable;

    #[test]
    fn role_trusts_firehose() {
        let role = http_dest_role();
        assert_eq!(
            role.description(),
            "role with prefix 'firehose-http-dest-role'"
        );
        assert!(role.record().is_none());
    }

    #[test]
    fn record_requires_created_resources() {
        let missing = record("us-west-2", &Bucket::new("b"), &http_dest_role()).unwrap_err();
        assert_eq!(missing, "bucket");
    }
}
