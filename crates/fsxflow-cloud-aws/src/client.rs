//! AWS client construction

use aws_config::{BehaviorVersion, Region};

/// The service clients this tool talks to, built from one shared SDK
/// configuration.
#[derive(Debug, Clone)]
pub struct AwsClients {
    pub fsx: aws_sdk_fsx::Client,
    pub ssm: aws_sdk_ssm::Client,
    pub ec2: aws_sdk_ec2::Client,
}

impl AwsClients {
    /// Resolve credentials and region through the default provider chain,
    /// with optional named-profile and region overrides.
    pub async fn connect(profile: Option<&str>, region: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        let config = loader.load().await;
        tracing::debug!(
            region = ?config.region(),
            "resolved AWS configuration"
        );

        Self {
            fsx: aws_sdk_fsx::Client::new(&config),
            ssm: aws_sdk_ssm::Client::new(&config),
            ec2: aws_sdk_ec2::Client::new(&config),
        }
    }
}
