use crate::Condition;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Provides some conveniences for querying a `kube-rs` object that is managed by an ACK
/// controller.
pub trait CrdExt {
    /// Returns this objects `ObjectMeta` information (i.e. the `metadata` field). You implement
    /// this be returning `&self.metadata`. This allows the rest of this trait's functions to be
    /// implemented for you.
    fn object_meta(&self) -> &ObjectMeta;

    /// Returns the conditions in `status.conditions`, or an empty slice if there are none.
    fn conditions(&self) -> &[Condition];

    /// Whether a `status` has been written to the object. The controller writes `status` the
    /// first time it processes the object.
    fn has_status(&self) -> bool;

    /// Returns this object's YAML representation as a String.
    fn to_yaml(&self) -> Result<String, serde_yaml::Error>;

    /// Returns the object.metadata.name field, unwrapping a potential `None` with `""`. In
    /// practice, an object's name cannot be missing since this is how we `GET` an object in the
    /// first place, so we do away with the `Option` for convenience. This is named `object_name`
    /// to avoid confusion with `ResourceExt`.
    fn object_name(&self) -> &str {
        self.object_meta().name.as_deref().unwrap_or("")
    }

    /// Finds the condition of the given type.
    fn condition(&self, condition_type: &str) -> Option<&Condition> {
        self.conditions()
            .iter()
            .find(|condition| condition.condition_type == condition_type)
    }

    /// The `status` string of the condition of the given type, e.g. `"True"`.
    fn condition_status(&self, condition_type: &str) -> Option<&str> {
        self.condition(condition_type)
            .map(|condition| condition.status.as_str())
    }
}
