use super::{has_error_code, AwsClients, Bootstrappable};
use crate::constants::{ERROR_CODE_NO_SUCH_ENTITY, MAX_ROLE_NAME_LEN};
use crate::error::{self, Result};
use firehose_e2e_model::{random_suffix_name, RoleRecord};
use log::info;
use serde_json::json;
use snafu::{OptionExt, ResultExt};

/// An IAM role with a randomized name that `principal_service` is trusted to assume, with
/// `managed_policies` attached.
#[derive(Clone, Debug)]
pub struct Role {
    name_prefix: String,
    principal_service: String,
    managed_policies: Vec<String>,
    name: Option<String>,
    arn: Option<String>,
    attached_policies: Vec<String>,
}

impl Role {
    pub fn new<S1, S2>(
        name_prefix: S1,
        principal_service: S2,
        managed_policies: Vec<String>,
    ) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self {
            name_prefix: name_prefix.into(),
            principal_service: principal_service.into(),
            managed_policies,
            name: None,
            arn: None,
            attached_policies: Vec::new(),
        }
    }

    /// A role that was bootstrapped by an earlier run. Every policy in the record is assumed to
    /// be attached.
    pub fn from_record(record: &RoleRecord) -> Self {
        Self {
            name_prefix: String::new(),
            principal_service: String::new(),
            managed_policies: record.managed_policies.clone(),
            name: Some(record.name.clone()),
            arn: Some(record.arn.clone()),
            attached_policies: record.managed_policies.clone(),
        }
    }

    /// The record of the created role, if it has been created.
    pub fn record(&self) -> Option<RoleRecord> {
        match (&self.name, &self.arn) {
            (Some(name), Some(arn)) => Some(RoleRecord {
                name: name.clone(),
                arn: arn.clone(),
                managed_policies: self.attached_policies.clone(),
            }),
            _ => None,
        }
    }

    fn trust_policy(&self) -> String {
        json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Effect": "Allow",
                "Principal": {
                    "Service": self.principal_service
                },
                "Action": "sts:AssumeRole"
            }]
        })
        .to_string()
    }
}

#[async_trait::async_trait]
impl Bootstrappable<AwsClients> for Role {
    fn description(&self) -> String {
        match &self.name {
            Some(name) => format!("role '{}'", name),
            None => format!("role with prefix '{}'", self.name_prefix),
        }
    }

    async fn bootstrap(&mut self, clients: &AwsClients) -> Result<()> {
        let role_name = random_suffix_name(&self.name_prefix, MAX_ROLE_NAME_LEN)
            .context(error::NameSnafu { what: "role" })?;
        let assume_role_doc = self.trust_policy();
        let output = clients
            .iam
            .create_role()
            .role_name(&role_name)
            .assume_role_policy_document(&assume_role_doc)
            .send()
            .await
            .context(error::CreateRoleSnafu {
                role_name: &role_name,
                role_policy: &assume_role_doc,
            })?;
        self.name = Some(role_name.clone());
        let arn = output
            .role()
            .and_then(|role| role.arn())
            .context(error::MissingSnafu {
                what: "role arn",
                from: "create role output",
            })?;
        info!("Created role '{}' ({})", role_name, arn);
        self.arn = Some(arn.to_string());

        for policy_arn in &self.managed_policies {
            clients
                .iam
                .attach_role_policy()
                .role_name(&role_name)
                .policy_arn(policy_arn)
                .send()
                .await
                .context(error::AttachRolePolicySnafu {
                    role_name: &role_name,
                    policy_arn,
                })?;
            info!("Attached policy '{}' to role '{}'", policy_arn, role_name);
            self.attached_policies.push(policy_arn.clone());
        }
        Ok(())
    }

    async fn cleanup(&self, clients: &AwsClients) -> Result<()> {
        let role_name = match &self.name {
            Some(name) => name,
            None => return Ok(()),
        };
        // A role cannot be deleted while policies are attached to it. `NoSuchEntity` means the
        // policy is already detached or the role is already gone.
        for policy_arn in &self.attached_policies {
            let result = clients
                .iam
                .detach_role_policy()
                .role_name(role_name)
                .policy_arn(policy_arn)
                .send()
                .await;
            if matches!(&result, Err(e) if has_error_code(e, ERROR_CODE_NO_SUCH_ENTITY)) {
                info!("Policy '{}' was already detached from role '{}'", policy_arn, role_name);
                continue;
            }
            result.context(error::DetachRolePolicySnafu {
                role_name,
                policy_arn,
            })?;
            info!("Detached policy '{}' from role '{}'", policy_arn, role_name);
        }
        let result = clients.iam.delete_role().role_name(role_name).send().await;
        if matches!(&result, Err(e) if has_error_code(e, ERROR_CODE_NO_SUCH_ENTITY)) {
            info!("Role '{}' was already deleted", role_name);
            return Ok(());
        }
        result.context(error::DeleteRoleSnafu { role_name })?;
        info!("Deleted role '{}'", role_name);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::Value;

    fn role() -> Role {
        Role::new(
            "firehose-http-dest-role",
            "firehose.amazonaws.com",
            vec!["arn:aws:iam::aws:policy/AmazonS3FullAccess".to_string()],
        )
    }

    #[test]
    fn trust_policy_names_the_principal() {
        let policy: Value = serde_json::from_str(&role().trust_policy()).unwrap();
        assert_eq!(policy["Version"], "2012-10-17");
        let statement = &policy["Statement"][0];
        assert_eq!(statement["Effect"], "Allow");
        assert_eq!(statement["Action"], "sts:AssumeRole");
        assert_eq!(statement["Principal"]["Service"], "firehose.amazonaws.com");
    }

    #[test]
    fn record_round_trips_through_from_record() {
        let role = role();
        assert!(role.record().is_none());

        let record = RoleRecord {
            name: "firehose-http-dest-role-abc".to_string(),
            arn: "arn:aws:iam::123456789012:role/firehose-http-dest-role-abc".to_string(),
            managed_policies: vec!["arn:aws:iam::aws:policy/AmazonS3FullAccess".to_string()],
        };
        let role = Role::from_record(&record);
        assert_eq!(role.record(), Some(record));
        assert_eq!(role.description(), "role 'firehose-http-dest-role-abc'");
    }
}
