/// Helper macro to avoid retyping the API group of the Firehose controller when creating further
/// string constants from it. When given no parameters, this returns the group. When given a string
/// literal parameter it adds `/parameter` to the end.
macro_rules! firehose {
    () => {
        "firehose.services.k8s.aws"
    };
    ($s:literal) => {
        concat!(firehose!(), "/", $s)
    };
}

/// Same as `firehose!` but for the group shared by every ACK controller.
macro_rules! ack {
    () => {
        "services.k8s.aws"
    };
    ($s:literal) => {
        concat!(ack!(), "/", $s)
    };
}

// Custom resource identifiers
pub const CRD_GROUP: &str = firehose!();
pub const CRD_VERSION: &str = "v1alpha1";
pub const API_VERSION: &str = firehose!("v1alpha1");
pub const DELIVERY_STREAM_KIND: &str = "DeliveryStream";
pub const DELIVERY_STREAM_PLURAL: &str = "deliverystreams";
pub const DEFAULT_NAMESPACE: &str = "default";

// Condition types set by ACK controllers
pub const CONDITION_TYPE_ADOPTED: &str = "ACK.Adopted";
pub const CONDITION_TYPE_RESOURCE_SYNCED: &str = "ACK.ResourceSynced";
pub const CONDITION_TYPE_TERMINAL: &str = "ACK.Terminal";
pub const CONDITION_TYPE_RECOVERABLE: &str = "ACK.Recoverable";
pub const CONDITION_TYPE_ADVISORY: &str = "ACK.Advisory";
pub const CONDITION_TYPE_LATE_INITIALIZED: &str = "ACK.LateInitialized";
pub const CONDITION_TYPE_REFERENCES_RESOLVED: &str = "ACK.ReferencesResolved";

pub const CONDITION_STATUS_TRUE: &str = "True";
pub const CONDITION_STATUS_FALSE: &str = "False";

// Tags the controller adds to every AWS resource it manages
pub const ACK_SYSTEM_TAG_PREFIX: &str = ack!("");
pub const ACK_TAG_CONTROLLER_VERSION: &str = ack!("controller-version");
pub const ACK_TAG_NAMESPACE: &str = ack!("namespace");

// Firehose delivery stream status values
pub const STREAM_STATUS_ACTIVE: &str = "ACTIVE";
pub const STREAM_STATUS_CREATING: &str = "CREATING";
pub const STREAM_STATUS_CREATING_FAILED: &str = "CREATING_FAILED";
pub const STREAM_STATUS_DELETING: &str = "DELETING";
pub const STREAM_STATUS_DELETING_FAILED: &str = "DELETING_FAILED";

// Firehose server-side encryption status values
pub const ENCRYPTION_STATUS_ENABLED: &str = "ENABLED";
pub const ENCRYPTION_STATUS_ENABLING: &str = "ENABLING";
pub const ENCRYPTION_STATUS_ENABLING_FAILED: &str = "ENABLING_FAILED";
pub const ENCRYPTION_STATUS_DISABLED: &str = "DISABLED";
pub const ENCRYPTION_STATUS_DISABLING: &str = "DISABLING";
pub const ENCRYPTION_STATUS_DISABLING_FAILED: &str = "DISABLING_FAILED";

pub const KEY_TYPE_AWS_OWNED_CMK: &str = "AWS_OWNED_CMK";
pub const KEY_TYPE_CUSTOMER_MANAGED_CMK: &str = "CUSTOMER_MANAGED_CMK";

pub const DELIVERY_STREAM_TYPE_DIRECT_PUT: &str = "DirectPut";

// Template substitution keys
pub const KEY_DELIVERY_STREAM_NAME: &str = "DELIVERY_STREAM_NAME";
pub const KEY_DELIVERY_STREAM_TYPE: &str = "DELIVERY_STREAM_TYPE";
pub const KEY_HTTP_DEST_NAME: &str = "HTTP_DEST_NAME";
pub const KEY_HTTP_DEST_URL: &str = "HTTP_DEST_URL";
pub const KEY_S3_BUCKET_ARN: &str = "S3_BUCKET_ARN";
pub const KEY_S3_ROLE_ARN: &str = "S3_ROLE_ARN";

/// The file name of the bootstrap record inside the bootstrap directory.
pub const BOOTSTRAP_FILE_NAME: &str = "bootstrap.yaml";

#[test]
fn constants_macro_test() {
    assert_eq!("firehose.services.k8s.aws", firehose!());
    assert_eq!("firehose.services.k8s.aws/v1alpha1", API_VERSION);
    assert_eq!("services.k8s.aws/namespace", ACK_TAG_NAMESPACE);
}
