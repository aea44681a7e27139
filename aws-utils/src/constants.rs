use log::LevelFilter;

pub const DEFAULT_REGION: &str = "us-west-2";
pub const DEFAULT_LEVEL_FILTER: LevelFilter = LevelFilter::Info;
pub const DEFAULT_ASSUME_ROLE_SESSION_DURATION: u64 = 3600;
pub const ASSUME_ROLE_SESSION_NAME: &str = "firehose-e2e";

/// S3 bucket names are limited to 63 characters.
pub const MAX_BUCKET_NAME_LEN: usize = 63;
/// IAM role names are limited to 64 characters.
pub const MAX_ROLE_NAME_LEN: usize = 64;

/// The error code S3 returns for operations on a bucket that does not exist.
pub const ERROR_CODE_NO_SUCH_BUCKET: &str = "NoSuchBucket";
/// The error code IAM returns for roles that do not exist or policies that are not attached.
pub const ERROR_CODE_NO_SUCH_ENTITY: &str = "NoSuchEntity";

/// Buckets created outside of this region need an explicit location constraint.
pub const S3_DEFAULT_LOCATION: &str = "us-east-1";
