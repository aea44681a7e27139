use crate::error::{self, Result};
use aws_utils::bootstrap::{cleanup_all, AwsClients, Bucket, Role};
use firehose_e2e_model::BootstrapResources;
use log::{info, warn};
use snafu::{ensure, ResultExt};
use std::fs;
use std::path::Path;

/// Deletes the resources recorded in `dir` and then the record itself.
pub(crate) async fn run(clients: &AwsClients, dir: &Path) -> Result<()> {
    let resources = BootstrapResources::read_from(dir).context(error::ReadRecordSnafu { dir })?;
    let mut bucket = Bucket::from_record(&resources.http_dest_bucket);
    let mut role = Role::from_record(&resources.http_dest_bucket_role);
    let failures = cleanup_all(clients, &[&mut bucket, &mut role]).await;
    ensure!(failures.is_empty(), error::CleanupSnafu { failures });

    let path = BootstrapResources::path(dir);
    if let Err(e) = fs::remove_file(&path) {
        warn!("Unable to remove '{}': {}", path.display(), e);
    } else {
        info!("Removed '{}'", path.display());
    }
    Ok(())
}
