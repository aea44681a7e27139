/*!

Tags as declared on a `DeliveryStream` spec and as returned by `ListTagsForDeliveryStream`.

The controller adds its own bookkeeping tags (keys prefixed with `services.k8s.aws/`) to every
stream it manages, so comparisons between declared and observed tags strip those first.

!*/

use crate::constants::ACK_SYSTEM_TAG_PREFIX;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, JsonSchema, PartialEq, Serialize)]
pub struct Tag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Tag {
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
        }
    }

    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or_default()
    }

    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }

    /// Whether this tag was added by the controller rather than the user.
    pub fn is_system_tag(&self) -> bool {
        self.key().starts_with(ACK_SYSTEM_TAG_PREFIX)
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key(), self.value())
    }
}

/// The changes needed to turn one tag set into another.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TagDelta {
    /// Tags in the desired set that are missing from, or have a different value in, the latest
    /// set.
    pub added_or_updated: Vec<Tag>,
    /// Keys in the latest set that are absent from the desired set.
    pub removed: Vec<String>,
}

impl TagDelta {
    pub fn is_empty(&self) -> bool {
        self.added_or_updated.is_empty() && self.removed.is_empty()
    }
}

impl Display for TagDelta {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let added: Vec<String> = self.added_or_updated.iter().map(Tag::to_string).collect();
        write!(
            f,
            "added or updated [{}], removed [{}]",
            added.join(", "),
            self.removed.join(", ")
        )
    }
}

/// Compares the `desired` tags with the `latest` tags. Keys are matched exactly and the first
/// occurrence of a key in `latest` wins.
pub fn compute_tags_delta(desired: &[Tag], latest: &[Tag]) -> TagDelta {
    let added_or_updated = desired
        .iter()
        .filter(|desired_tag| {
            latest
                .iter()
                .find(|latest_tag| latest_tag.key() == desired_tag.key())
                .map(|latest_tag| latest_tag.value() != desired_tag.value())
                .unwrap_or(true)
        })
        .cloned()
        .collect();

    let removed = latest
        .iter()
        .filter(|latest_tag| {
            !desired
                .iter()
                .any(|desired_tag| desired_tag.key() == latest_tag.key())
        })
        .map(|latest_tag| latest_tag.key().to_string())
        .collect();

    TagDelta {
        added_or_updated,
        removed,
    }
}

/// Returns true if the two tag sets are equal regardless of the order of their elements.
pub fn equal_tags(a: &[Tag], b: &[Tag]) -> bool {
    compute_tags_delta(a, b).is_empty()
}

/// Returns the tags with the controller's bookkeeping tags removed.
pub fn without_system_tags(tags: &[Tag]) -> Vec<Tag> {
    tags.iter().filter(|tag| !tag.is_system_tag()).cloned().collect()
}

/// Compares `expected` with `actual` after removing controller bookkeeping tags from both. Returns
/// the delta needed to turn `actual` into `expected`, which is empty when they match.
pub fn delta_without_system_tags(expected: &[Tag], actual: &[Tag]) -> TagDelta {
    compute_tags_delta(&without_system_tags(expected), &without_system_tags(actual))
}
