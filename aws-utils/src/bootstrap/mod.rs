/*!

Provisioning of the long-lived AWS resources the end-to-end tests rely on.

Each resource implements [`Bootstrappable`]. [`bootstrap_all`] provisions a list of them in order
and, if one fails, cleans up everything that was already provisioned (including whatever part of
the failing resource was created) before reporting a [`BootstrapFailure`].

!*/

use crate::aws::config_region;
use crate::Error;
use aws_sdk_s3::types::SdkError;
use aws_smithy_types::retry::ProvideErrorKind;
use aws_types::SdkConfig;
use log::{error, info, warn};
use snafu::{IntoError, Snafu};

mod iam;
mod s3;

pub use iam::Role;
pub use s3::Bucket;

/// The SDK clients needed to bootstrap and clean up resources.
#[derive(Clone, Debug)]
pub struct AwsClients {
    pub region: String,
    pub s3: aws_sdk_s3::Client,
    pub iam: aws_sdk_iam::Client,
}

impl AwsClients {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            region: config_region(config),
            s3: aws_sdk_s3::Client::new(config),
            iam: aws_sdk_iam::Client::new(config),
        }
    }
}

/// A resource that can be created before a test run and removed afterwards.
#[async_trait::async_trait]
pub trait Bootstrappable<C>: Send + Sync
where
    C: Sync,
{
    /// A short human readable description, e.g. `bucket 'my-bucket'`.
    fn description(&self) -> String;

    /// Creates the resource. Implementations remember what they created so that `cleanup` can
    /// undo a partial bootstrap.
    async fn bootstrap(&mut self, clients: &C) -> crate::Result<()>;

    /// Removes whatever `bootstrap` created. Does nothing if nothing was created.
    async fn cleanup(&self, clients: &C) -> crate::Result<()>;
}

/// The error returned when a resource could not be bootstrapped.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BootstrapFailure {
    #[snafu(display(
        "Unable to bootstrap {}: {}{}",
        resource,
        source,
        rollback_summary(rollback_errors)
    ))]
    Provision {
        resource: String,
        source: Error,
        /// Cleanup errors for resources that could not be rolled back. These resources may have
        /// leaked.
        rollback_errors: Vec<String>,
    },
}

fn rollback_summary(rollback_errors: &[String]) -> String {
    if rollback_errors.is_empty() {
        String::new()
    } else {
        format!(
            " (rollback also failed, resources may have leaked: {})",
            rollback_errors.join("; ")
        )
    }
}

/// Bootstraps `resources` in order. On the first failure, cleans up that resource and every
/// resource before it in reverse order, then returns the failure.
pub async fn bootstrap_all<C>(
    clients: &C,
    resources: &mut [&mut dyn Bootstrappable<C>],
) -> Result<(), BootstrapFailure>
where
    C: Sync,
{
    for index in 0..resources.len() {
        info!("Bootstrapping {}", resources[index].description());
        if let Err(source) = resources[index].bootstrap(clients).await {
            let resource = resources[index].description();
            error!("Unable to bootstrap {}: {}", resource, source);
            let rollback_errors = rollback(clients, &resources[..=index]).await;
            return Err(ProvisionSnafu {
                resource,
                rollback_errors,
            }
            .into_error(source));
        }
        info!("Bootstrapped {}", resources[index].description());
    }
    Ok(())
}

/// Cleans up `resources` in reverse order, continuing past failures. Returns a description of
/// each failure.
pub async fn cleanup_all<C>(
    clients: &C,
    resources: &[&mut dyn Bootstrappable<C>],
) -> Vec<String>
where
    C: Sync,
{
    let mut errors = Vec::new();
    for resource in resources.iter().rev() {
        info!("Cleaning up {}", resource.description());
        if let Err(e) = resource.cleanup(clients).await {
            warn!("Unable to clean up {}: {}", resource.description(), e);
            errors.push(format!("{}: {}", resource.description(), e));
        }
    }
    errors
}

/// Whether `err` is a service error with the given error code, e.g. `NoSuchBucket`. Cleanup uses
/// this to treat resources that are already gone as cleaned up.
pub(crate) fn has_error_code<E, R>(err: &SdkError<E, R>, code: &str) -> bool
where
    E: ProvideErrorKind,
{
    match err {
        SdkError::ServiceError(service_error) => service_error.err().code() == Some(code),
        _ => false,
    }
}

async fn rollback<C>(clients: &C, resources: &[&mut dyn Bootstrappable<C>]) -> Vec<String>
where
    C: Sync,
{
    info!("Rolling back {} resource(s)", resources.len());
    cleanup_all(clients, resources).await
}
