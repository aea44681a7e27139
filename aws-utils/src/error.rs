use aws_sdk_firehose::error::{DescribeDeliveryStreamError, ListTagsForDeliveryStreamError};
use aws_sdk_iam::error::{
    AttachRolePolicyError, CreateRoleError, DeleteRoleError, DetachRolePolicyError,
};
use aws_sdk_iam::types::SdkError;
use aws_sdk_s3::error::{
    CreateBucketError, DeleteBucketError, DeleteObjectError, ListObjectsV2Error,
};
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[allow(clippy::large_enum_variant)]
pub enum Error {
    #[snafu(display(
        "Failed to attach policy '{}' to role '{}': {}",
        policy_arn,
        role_name,
        source
    ))]
    AttachRolePolicy {
        role_name: String,
        policy_arn: String,
        source: SdkError<AttachRolePolicyError>,
    },

    #[snafu(display("Unable to create bucket '{}': {}", bucket, source))]
    CreateBucket {
        bucket: String,
        source: SdkError<CreateBucketError>,
    },

    #[snafu(display(
        "Unable to create role '{}' with policy '{}': {}",
        role_name,
        role_policy,
        source
    ))]
    CreateRole {
        role_name: String,
        role_policy: String,
        source: SdkError<CreateRoleError>,
    },

    #[snafu(display("Unable to delete bucket '{}': {}", bucket, source))]
    DeleteBucket {
        bucket: String,
        source: SdkError<DeleteBucketError>,
    },

    #[snafu(display("Unable to delete '{}' from bucket '{}': {}", key, bucket, source))]
    DeleteObject {
        bucket: String,
        key: String,
        source: SdkError<DeleteObjectError>,
    },

    #[snafu(display("Unable to delete role '{}': {}", role_name, source))]
    DeleteRole {
        role_name: String,
        source: SdkError<DeleteRoleError>,
    },

    #[snafu(display("Unable to describe delivery stream '{}': {}", name, source))]
    DescribeDeliveryStream {
        name: String,
        source: SdkError<DescribeDeliveryStreamError>,
    },

    #[snafu(display(
        "Failed to detach policy '{}' from role '{}': {}",
        policy_arn,
        role_name,
        source
    ))]
    DetachRolePolicy {
        role_name: String,
        policy_arn: String,
        source: SdkError<DetachRolePolicyError>,
    },

    #[snafu(display("Unable to list objects in bucket '{}': {}", bucket, source))]
    ListObjects {
        bucket: String,
        source: SdkError<ListObjectsV2Error>,
    },

    #[snafu(display("Unable to list tags of delivery stream '{}': {}", name, source))]
    ListTags {
        name: String,
        source: SdkError<ListTagsForDeliveryStreamError>,
    },

    #[snafu(display("{} was missing from {}", what, from))]
    Missing { what: String, from: String },

    #[snafu(display("Unable to create a name for {}: {}", what, source))]
    Name {
        what: String,
        source: firehose_e2e_model::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
