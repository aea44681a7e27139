/*!

The record of the AWS resources created by `service-bootstrap`. It is written once at the start of
a test run and read by every test that needs the bucket or the role.

!*/

use crate::constants::BOOTSTRAP_FILE_NAME;
use crate::error::{self, Result};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapResources {
    /// The region the resources were created in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// The bucket HTTP endpoint destinations back up failed records to.
    pub http_dest_bucket: BucketRecord,
    /// The role Firehose assumes to write to `http_dest_bucket`.
    pub http_dest_bucket_role: RoleRecord,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketRecord {
    pub name: String,
}

impl BucketRecord {
    pub fn arn(&self) -> String {
        format!("arn:aws:s3:::{}", self.name)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRecord {
    pub name: String,
    pub arn: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub managed_policies: Vec<String>,
}

impl BootstrapResources {
    /// The path of the record inside `directory`.
    pub fn path<P: AsRef<Path>>(directory: P) -> PathBuf {
        directory.as_ref().join(BOOTSTRAP_FILE_NAME)
    }

    /// Writes the record to `directory`, creating the directory if needed.
    pub fn serialize_to<P: AsRef<Path>>(&self, directory: P) -> Result<PathBuf> {
        let directory = directory.as_ref();
        fs::create_dir_all(directory).context(error::FileSnafu {
            path: directory.to_path_buf(),
        })?;
        let path = Self::path(directory);
        let yaml = serde_yaml::to_string(self).context(error::YamlSnafu {
            what: "bootstrap resources",
        })?;
        fs::write(&path, yaml).context(error::FileSnafu { path: path.clone() })?;
        Ok(path)
    }

    /// Reads the record previously written to `directory`.
    pub fn read_from<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let path = Self::path(directory);
        let yaml = fs::read_to_string(&path).context(error::FileSnafu { path: path.clone() })?;
        Ok(serde_yaml::from_str(&yaml).context(error::YamlSnafu {
            what: format!("bootstrap resources in '{}'", path.display()),
        })?)
    }
}
