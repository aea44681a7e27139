/*!

Resource templates are YAML manifests with `$KEY` placeholders. Tests fill the placeholders with
per-run values (random names, bootstrapped ARNs) before submitting the object.

!*/

use crate::error::{self, Result};
use crate::DeliveryStream;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use snafu::{ensure, ResultExt};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const PLACEHOLDER_REGEX: &str = r"\$[A-Z][A-Z0-9_]*";

lazy_static::lazy_static! {
    static ref PLACEHOLDER: Regex = {
        #[allow(clippy::unwrap_used)]
        Regex::new(PLACEHOLDER_REGEX).unwrap()
    };
}

/// The values substituted into a template, keyed by placeholder name without the leading `$`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Replacements(BTreeMap<String, String>);

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Replaces every `$KEY` in `template`. Longer keys are substituted first so that a key that
    /// is a prefix of another (e.g. `NAME` and `NAME_SUFFIX`) cannot clobber it. Fails if any
    /// placeholder is left unresolved.
    pub fn render(&self, template: &str) -> Result<String> {
        let mut keys: Vec<&String> = self.0.keys().collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let mut rendered = template.to_string();
        for key in keys {
            rendered = rendered.replace(&format!("${}", key), &self.0[key]);
        }

        let unresolved: Vec<&str> = PLACEHOLDER
            .find_iter(&rendered)
            .map(|found| found.as_str())
            .collect();
        ensure!(
            unresolved.is_empty(),
            error::UnresolvedPlaceholderSnafu {
                placeholders: unresolved.join(", "),
            }
        );
        Ok(rendered)
    }
}

impl<K, V> FromIterator<(K, V)> for Replacements
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A rendered template. The document is what gets submitted to the API server, byte for byte
/// apart from the YAML to JSON conversion. `object` is a typed view of the same document and may
/// leave out fields that `K` does not model.
#[derive(Clone, Debug, PartialEq)]
pub struct Manifest<K> {
    document: Value,
    object: K,
}

impl<K> Manifest<K>
where
    K: DeserializeOwned,
{
    /// Parses a rendered YAML document. `what` names the document in error messages.
    pub fn from_yaml(yaml: &str, what: &str) -> Result<Self> {
        let document: Value = serde_yaml::from_str(yaml).context(error::YamlSnafu { what })?;
        let object = serde_json::from_value(document.clone()).context(error::JsonSnafu { what })?;
        Ok(Self { document, object })
    }
}

impl<K> Manifest<K> {
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn object(&self) -> &K {
        &self.object
    }
}

/// Reads `<directory>/<name>.yaml` and renders it with `replacements`.
pub fn load_delivery_stream<P: AsRef<Path>>(
    directory: P,
    name: &str,
    replacements: &Replacements,
) -> Result<Manifest<DeliveryStream>> {
    let path = directory.as_ref().join(format!("{}.yaml", name));
    let template = fs::read_to_string(&path).context(error::FileSnafu { path: path.clone() })?;
    let rendered = replacements.render(&template)?;
    Manifest::from_yaml(&rendered, &format!("rendered template '{}'", path.display()))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::CrdExt;

    const TEMPLATE: &str = r#"apiVersion: firehose.services.k8s.aws/v1alpha1
kind: DeliveryStream
metadata:
  name: $DELIVERY_STREAM_NAME
spec:
  deliveryStreamName: $DELIVERY_STREAM_NAME
  deliveryStreamType: $DELIVERY_STREAM_TYPE
  httpEndpointDestinationConfiguration:
    endpointConfiguration:
      name: $HTTP_DEST_NAME
      url: $HTTP_DEST_URL
    s3Configuration:
      bucketARN: $S3_BUCKET_ARN
      roleARN: $S3_ROLE_ARN
  tags:
    - key: environment
      value: dev
"#;

    fn replacements() -> Replacements {
        [
            ("DELIVERY_STREAM_NAME", "stream-1"),
            ("DELIVERY_STREAM_TYPE", "DirectPut"),
            ("HTTP_DEST_NAME", "dest-1"),
            ("HTTP_DEST_URL", "https://example.com"),
            ("S3_BUCKET_ARN", "arn:aws:s3:::bucket"),
            ("S3_ROLE_ARN", "arn:aws:iam::123456789012:role/r"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn renders_all_placeholders() {
        let rendered = replacements().render(TEMPLATE).unwrap();
        assert!(!rendered.contains('$'));
        let stream: DeliveryStream = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(stream.object_name(), "stream-1");
        assert_eq!(stream.spec.delivery_stream_name, "stream-1");
        assert_eq!(stream.spec.delivery_stream_type.as_deref(), Some("DirectPut"));
        assert_eq!(stream.http_endpoint_name(), Some("dest-1"));
        assert!(stream.encryption_disabled());
    }

    #[test]
    fn unresolved_placeholders_are_errors() {
        let mut replacements = replacements();
        replacements.0.remove("S3_ROLE_ARN");
        let err = replacements.render(TEMPLATE).unwrap_err();
        assert!(err.to_string().contains("$S3_ROLE_ARN"));
    }

    #[test]
    fn longer_keys_win() {
        let mut replacements = Replacements::new();
        replacements.insert("NAME", "short").insert("NAME_SUFFIX", "long");
        assert_eq!(
            replacements.render("$NAME_SUFFIX/$NAME").unwrap(),
            "long/short"
        );
    }

    #[test]
    fn loads_from_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("delivery_stream_httpdest.yaml"), TEMPLATE).unwrap();
        let manifest =
            load_delivery_stream(dir.path(), "delivery_stream_httpdest", &replacements()).unwrap();
        assert_eq!(manifest.object().spec_tags().len(), 1);
        assert_eq!(manifest.document()["metadata"]["name"], "stream-1");
        assert!(load_delivery_stream(dir.path(), "missing", &replacements()).is_err());
    }

    #[test]
    fn unmodeled_fields_stay_in_the_document() {
        let template = format!(
            "{}  kinesisStreamSourceConfiguration:\n    kinesisStreamARN: $S3_BUCKET_ARN\n",
            TEMPLATE
        );
        let rendered = replacements().render(&template).unwrap();
        let manifest: Manifest<DeliveryStream> = Manifest::from_yaml(&rendered, "test").unwrap();
        assert_eq!(
            manifest.document()["spec"]["kinesisStreamSourceConfiguration"]["kinesisStreamARN"],
            "arn:aws:s3:::bucket"
        );
        assert_eq!(manifest.document()["spec"]["tags"][0]["value"], "dev");
        let typed = serde_json::to_value(manifest.object()).unwrap();
        assert!(typed["spec"].get("kinesisStreamSourceConfiguration").is_none());
    }

    #[test]
    fn documents_that_do_not_fit_the_type_are_errors() {
        let err = Manifest::<DeliveryStream>::from_yaml("spec: [1, 2]\n", "bad").unwrap_err();
        assert!(err.to_string().contains("bad"));
    }
}
