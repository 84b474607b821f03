//! Parameter store lookups
//!
//! The deployment publishes its FSx networking in the SSM parameter store:
//! one parameter with a comma-separated list of private subnet IDs and one
//! with the security group IDs. Both are read with decryption enabled since
//! deployments may store them as SecureString.

use crate::error::{AwsError, Result};
use crate::settings::FsxSettings;
use aws_sdk_ssm::error::ProvideErrorMetadata;

/// Networking configuration resolved from the parameter store.
#[derive(Debug, Clone)]
pub struct NetworkParams {
    pub subnet_ids: Vec<String>,
    pub security_group_ids: Vec<String>,
}

impl NetworkParams {
    pub async fn fetch(ssm: &aws_sdk_ssm::Client, settings: &FsxSettings) -> Result<Self> {
        let subnet_ids = split_csv(&get_parameter(ssm, &settings.subnets_param).await?);
        tracing::info!(subnets = ?subnet_ids, "resolved private subnets");

        let security_group_ids =
            split_csv(&get_parameter(ssm, &settings.security_group_param).await?);
        tracing::info!(security_groups = ?security_group_ids, "resolved security groups");

        if subnet_ids.is_empty() {
            return Err(AwsError::Parameter(settings.subnets_param.clone()));
        }
        if security_group_ids.is_empty() {
            return Err(AwsError::Parameter(settings.security_group_param.clone()));
        }

        Ok(Self {
            subnet_ids,
            security_group_ids,
        })
    }

    /// The subnet the file system is placed in. Lustre file systems attach
    /// to a single subnet; the first listed one wins.
    pub fn primary_subnet(&self) -> &str {
        &self.subnet_ids[0]
    }
}

async fn get_parameter(ssm: &aws_sdk_ssm::Client, name: &str) -> Result<String> {
    let output = ssm
        .get_parameter()
        .name(name)
        .with_decryption(true)
        .send()
        .await
        .map_err(|err| {
            let service_err = err.into_service_error();
            if service_err.is_parameter_not_found() {
                AwsError::Parameter(name.to_string())
            } else {
                AwsError::Api(format!(
                    "get_parameter {name}: {}: {}",
                    service_err.code().unwrap_or("unknown"),
                    service_err.message().unwrap_or("no message")
                ))
            }
        })?;

    output
        .parameter()
        .and_then(|p| p.value())
        .map(str::to_string)
        .ok_or_else(|| AwsError::Parameter(name.to_string()))
}

/// Split a comma-separated parameter value, dropping empty segments.
pub(crate) fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
