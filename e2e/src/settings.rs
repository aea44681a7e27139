use crate::error::{self, Result};
use firehose_e2e_model::constants::DEFAULT_NAMESPACE;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Test settings provides a way to send arguments into the end-to-end tests using environment
/// variables.
pub struct TestSettings {}

impl TestSettings {
    /// The directory `service-bootstrap` wrote `bootstrap.yaml` to.
    pub fn bootstrap_dir() -> Result<&'static Path> {
        Ok(inner()?.bootstrap_dir.as_path())
    }

    /// Overrides the region recorded by `service-bootstrap`.
    pub fn region() -> Result<Option<&'static str>> {
        Ok(inner()?.region.as_deref())
    }

    pub fn assume_role() -> Result<&'static Option<String>> {
        Ok(&inner()?.assume_role)
    }

    /// The namespace delivery streams are created in.
    pub fn namespace() -> Result<&'static str> {
        Ok(inner()?.namespace.as_str())
    }

    /// The directory resource templates are loaded from.
    pub fn resource_dir() -> Result<&'static Path> {
        Ok(inner()?.resource_dir.as_path())
    }
}

#[derive(Debug, Deserialize)]
struct Inner {
    /// Defaults to the directory of this crate, so running `service-bootstrap` from here needs no
    /// further configuration.
    ///
    /// # Example
    ///
    /// ```text
    /// FIREHOSE_E2E_BOOTSTRAP_DIR=/wherever/bootstrap
    /// ```
    #[serde(default = "crate_dir")]
    bootstrap_dir: PathBuf,

    #[serde(default)]
    region: Option<String>,

    /// The ARN of a role to assume for all AWS calls made by the tests.
    #[serde(default)]
    assume_role: Option<String>,

    #[serde(default = "namespace")]
    namespace: String,

    #[serde(default = "resource_dir")]
    resource_dir: PathBuf,
}

lazy_static::lazy_static! {
    static ref TEST_SETTINGS: std::result::Result<Inner, envy::Error> =
        envy::prefixed(PREFIX).from_env::<Inner>();
}

const PREFIX: &str = "FIREHOSE_E2E_";

fn inner() -> Result<&'static Inner> {
    TEST_SETTINGS.as_ref().map_err(|e| {
        error::SettingsSnafu {
            prefix: PREFIX,
            message: e.to_string(),
        }
        .build()
    })
}

/// We need these to provide defaults for serde.
fn crate_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn namespace() -> String {
    String::from(DEFAULT_NAMESPACE)
}

fn resource_dir() -> PathBuf {
    crate_dir().join("resources")
}

#[test]
fn defaults_apply_without_environment() {
    let inner: Inner = envy::prefixed("FIREHOSE_E2E_UNSET_PREFIX_")
        .from_iter(Vec::<(String, String)>::new())
        .unwrap();
    assert_eq!(inner.namespace, "default");
    assert!(inner.region.is_none());
    assert!(inner.resource_dir.ends_with("resources"));
    assert!(inner
        .resource_dir
        .join("delivery_stream_httpdest.yaml")
        .is_file());
}

#[test]
fn prefixed_variables_are_read() {
    let inner: Inner = envy::prefixed(PREFIX)
        .from_iter(vec![
            ("FIREHOSE_E2E_NAMESPACE".to_string(), "e2e".to_string()),
            ("FIREHOSE_E2E_REGION".to_string(), "eu-west-1".to_string()),
            ("FIREHOSE_E2E_BOOTSTRAP_DIR".to_string(), "/tmp/b".to_string()),
        ])
        .unwrap();
    assert_eq!(inner.namespace, "e2e");
    assert_eq!(inner.region.as_deref(), Some("eu-west-1"));
    assert_eq!(inner.bootstrap_dir, PathBuf::from("/tmp/b"));
}
