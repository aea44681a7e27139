/*!

This library provides the ACK Firehose `DeliveryStream` custom resource, a client for it, and the
shared data types used by the bootstrap program and the end-to-end tests: tags, observed stream
state, the bootstrap record and resource templates.

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

pub use bootstrap::{BootstrapResources, BucketRecord, RoleRecord};
pub use crd_ext::CrdExt;
pub use delivery_stream::{
    AckResourceMetadata, BufferingHints, CloudWatchLoggingOptions, Condition, DeliveryStream,
    DeliveryStreamSpec, DeliveryStreamStatus, EncryptionConfigurationInput,
    HttpEndpointConfiguration, HttpEndpointDestinationConfiguration, S3DestinationConfiguration,
};
pub use error::{Error, Result};
pub use names::random_suffix_name;
pub use observed::{ObservedDeliveryStream, ObservedDestination};
pub use tags::{
    compute_tags_delta, delta_without_system_tags, equal_tags, without_system_tags, Tag, TagDelta,
};
pub use template::{load_delivery_stream, Manifest, Replacements};

mod bootstrap;
pub mod clients;
pub mod constants;
mod crd_ext;
mod delivery_stream;
mod error;
mod names;
mod observed;
mod tags;
mod template;
