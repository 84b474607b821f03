//! FSx for Lustre operations
//!
//! [`FsxProvider`] issues the create/delete/describe calls and drives the
//! core poll engine to a terminal state. Creation and deletion are
//! asynchronous on the provider side; callers that need completion chain
//! the matching `wait_for_*` method after the mutating call.

use crate::client::AwsClients;
use crate::error::{AwsError, Result};
use crate::params::NetworkParams;
use crate::settings::FsxSettings;
use aws_sdk_fsx::error::ProvideErrorMetadata;
use aws_sdk_fsx::types::{
    CreateFileSystemLustreConfiguration, FileSystem, FileSystemType, Tag,
};
use fsxflow_core::lifecycle::LifecycleState;
use fsxflow_core::poll::{PollConfig, Probe, wait_until};
use std::time::Duration;
use tokio::time::Instant;

/// What the caller asks for when creating a file system.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub name: String,
    pub capacity: fsxflow_core::CapacityRequest,
    /// S3 path the file system imports its data from.
    pub import_path: String,
    /// S3 path changed data is exported to.
    pub export_path: String,
}

/// Returned by a successful create call, before the file system is usable.
#[derive(Debug, Clone)]
pub struct CreatedFileSystem {
    pub id: String,
    pub lifecycle: LifecycleState,
}

/// One observation of a file system's provider-side state.
#[derive(Debug, Clone)]
pub struct FileSystemStatus {
    pub id: String,
    pub lifecycle: LifecycleState,
    /// Unset on early describes; the provider populates it during creation.
    pub dns_name: Option<String>,
    pub network_interface_ids: Vec<String>,
}

impl FileSystemStatus {
    fn from_file_system(fs: &FileSystem) -> Result<Self> {
        let id = fs
            .file_system_id()
            .ok_or(AwsError::MissingAttribute("file system id"))?
            .to_string();
        let lifecycle = fs
            .lifecycle()
            .map(|l| LifecycleState::parse(l.as_str()))
            .ok_or(AwsError::MissingAttribute("lifecycle state"))?;

        Ok(Self {
            id,
            lifecycle,
            dns_name: fs.dns_name().map(str::to_string),
            network_interface_ids: fs.network_interface_ids().to_vec(),
        })
    }
}

/// Network addresses attached to a file system.
#[derive(Debug, Clone)]
pub struct FileSystemAddresses {
    pub dns_name: Option<String>,
    pub private_ips: Vec<String>,
}

/// The mount command a client host runs against a finished file system.
pub fn mount_command(dns_name: &str) -> String {
    format!("sudo mount -t lustre -o noatime,flock {dns_name}@tcp:/fsx /fsx")
}

/// FSx for Lustre provider.
pub struct FsxProvider {
    clients: AwsClients,
    settings: FsxSettings,
}

impl FsxProvider {
    pub fn new(clients: AwsClients, settings: FsxSettings) -> Self {
        Self { clients, settings }
    }

    pub fn settings(&self) -> &FsxSettings {
        &self.settings
    }

    /// Create a Lustre file system in the deployment's first private
    /// subnet. Returns as soon as the provider accepts the request.
    pub async fn create(&self, request: &CreateRequest) -> Result<CreatedFileSystem> {
        let network = NetworkParams::fetch(&self.clients.ssm, &self.settings).await?;
        let capacity = request.capacity.billable();
        tracing::info!(
            name = %request.name,
            requested_tb = request.capacity.terabytes(),
            billable = %capacity,
            "starting file system creation"
        );

        let lustre_config = CreateFileSystemLustreConfiguration::builder()
            .weekly_maintenance_start_time(&self.settings.weekly_maintenance_start_time)
            .import_path(&request.import_path)
            .export_path(&request.export_path)
            .build();

        let name_tag = Tag::builder()
            .key("Name")
            .value(&request.name)
            .build()
            .map_err(|err| AwsError::Api(format!("building Name tag: {err}")))?;

        let mut call = self
            .clients
            .fsx
            .create_file_system()
            .file_system_type(FileSystemType::Lustre)
            .subnet_ids(network.primary_subnet())
            .storage_capacity(capacity.as_i32())
            .tags(name_tag)
            .lustre_configuration(lustre_config);
        for security_group in &network.security_group_ids {
            call = call.security_group_ids(security_group);
        }

        let output = call
            .send()
            .await
            .map_err(|err| classify("create_file_system", err.into_service_error()))?;

        let fs = output
            .file_system()
            .ok_or(AwsError::MissingAttribute("file system"))?;
        let status = FileSystemStatus::from_file_system(fs)?;
        tracing::info!(id = %status.id, state = %status.lifecycle, "creation accepted");

        Ok(CreatedFileSystem {
            id: status.id,
            lifecycle: status.lifecycle,
        })
    }

    /// Poll until the file system reaches a terminal creation state
    /// (AVAILABLE, FAILED, or MISCONFIGURED) and report which.
    pub async fn wait_for_create(
        &self,
        id: &str,
        timeout: Option<Duration>,
    ) -> Result<FileSystemStatus> {
        let config = self.poll_config(timeout);
        let started = Instant::now();
        let fs_id = id;

        let status = wait_until(&config, move || async move {
            match self.describe(fs_id).await? {
                Some(status) if status.lifecycle.is_create_terminal() => {
                    Ok(Probe::Complete(status))
                }
                Some(status) => Ok(Probe::Pending(status.lifecycle.to_string())),
                // Freshly created file systems can lag the describe API.
                None => Ok(Probe::Pending("not listed yet".to_string())),
            }
        })
        .await
        .map_err(AwsError::from)?;

        tracing::info!(
            id = %status.id,
            state = %status.lifecycle,
            elapsed_secs = started.elapsed().as_secs(),
            "file system reached a terminal state"
        );
        Ok(status)
    }

    /// Delete a file system. A not-found response means it is already gone
    /// and is not an error.
    pub async fn delete(&self, id: &str) -> Result<()> {
        match self
            .clients
            .fsx
            .delete_file_system()
            .file_system_id(id)
            .send()
            .await
        {
            Ok(_) => {
                tracing::info!(id, "deletion accepted");
                Ok(())
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_file_system_not_found() {
                    tracing::info!(id, "file system already gone");
                    Ok(())
                } else {
                    Err(classify("delete_file_system", service_err))
                }
            }
        }
    }

    /// Poll until the file system is no longer listed.
    ///
    /// Absence is a typed observation (`describe` returns `None` on the
    /// provider's not-found), never inferred from a failed query; failed
    /// queries are retried on the next tick and bounded by the poll config.
    pub async fn wait_for_delete(&self, id: &str, timeout: Option<Duration>) -> Result<()> {
        let config = self.poll_config(timeout);
        let started = Instant::now();
        let fs_id = id;

        wait_until(&config, move || async move {
            match self.describe(fs_id).await? {
                None => Ok(Probe::Complete(())),
                Some(status) => Ok(Probe::Pending(status.lifecycle.to_string())),
            }
        })
        .await
        .map_err(AwsError::from)?;

        tracing::info!(
            id,
            elapsed_secs = started.elapsed().as_secs(),
            "file system is gone"
        );
        Ok(())
    }

    /// One status observation. `Ok(None)` means the provider does not list
    /// the file system; any other failure is a real error.
    pub async fn describe(&self, id: &str) -> Result<Option<FileSystemStatus>> {
        let result = self
            .clients
            .fsx
            .describe_file_systems()
            .file_system_ids(id)
            .max_results(1)
            .send()
            .await;

        match result {
            Ok(output) => match output.file_systems().first() {
                Some(fs) => Ok(Some(FileSystemStatus::from_file_system(fs)?)),
                None => Ok(None),
            },
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_file_system_not_found() {
                    Ok(None)
                } else {
                    Err(classify("describe_file_systems", service_err))
                }
            }
        }
    }

    /// Resolve the DNS name and the private IP of every network interface
    /// attached to the file system.
    pub async fn list_addresses(&self, id: &str) -> Result<FileSystemAddresses> {
        let status = self
            .describe(id)
            .await?
            .ok_or_else(|| AwsError::NotFound(id.to_string()))?;
        tracing::info!(id, dns_name = ?status.dns_name, "resolved file system");

        if status.network_interface_ids.is_empty() {
            return Ok(FileSystemAddresses {
                dns_name: status.dns_name,
                private_ips: Vec::new(),
            });
        }

        let output = self
            .clients
            .ec2
            .describe_network_interfaces()
            .set_network_interface_ids(Some(status.network_interface_ids.clone()))
            .send()
            .await
            .map_err(|err| classify("describe_network_interfaces", err.into_service_error()))?;

        let private_ips = output
            .network_interfaces()
            .iter()
            .filter_map(|eni| eni.private_ip_address().map(str::to_string))
            .collect();

        Ok(FileSystemAddresses {
            dns_name: status.dns_name,
            private_ips,
        })
    }

    fn poll_config(&self, timeout: Option<Duration>) -> PollConfig {
        PollConfig {
            interval: self.settings.poll_interval(),
            ..PollConfig::default()
        }
        .with_timeout(timeout.or(self.settings.poll_timeout()))
    }
}

/// Map a service error onto the transient/permanent taxonomy by its error
/// code: throttling codes are retryable, everything else is not.
fn classify<E: ProvideErrorMetadata>(operation: &'static str, err: E) -> AwsError {
    let code = err.code().unwrap_or("unknown");
    let message = err.message().unwrap_or("no message");
    let detail = format!("{operation}: {code}: {message}");
    match code {
        "ThrottlingException"
        | "Throttling"
        | "TooManyRequestsException"
        | "RequestLimitExceeded"
        | "ServiceUnavailableException" => AwsError::Throttled(detail),
        _ => AwsError::Api(detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_fsx::types::FileSystemLifecycle;

    #[test]
    fn mount_command_embeds_dns_name() {
        assert_eq!(
            mount_command("fs-0123.fsx.us-east-1.amazonaws.com"),
            "sudo mount -t lustre -o noatime,flock \
             fs-0123.fsx.us-east-1.amazonaws.com@tcp:/fsx /fsx"
        );
    }

    #[test]
    fn status_from_file_system() {
        let fs = FileSystem::builder()
            .file_system_id("fs-0123456789abcdef0")
            .lifecycle(FileSystemLifecycle::Creating)
            .network_interface_ids("eni-111")
            .network_interface_ids("eni-222")
            .build();

        let status = FileSystemStatus::from_file_system(&fs).unwrap();
        assert_eq!(status.id, "fs-0123456789abcdef0");
        assert_eq!(status.lifecycle, LifecycleState::Creating);
        assert_eq!(status.dns_name, None);
        assert_eq!(status.network_interface_ids, vec!["eni-111", "eni-222"]);
    }

    #[test]
    fn status_requires_an_id() {
        let fs = FileSystem::builder()
            .lifecycle(FileSystemLifecycle::Available)
            .build();
        assert!(matches!(
            FileSystemStatus::from_file_system(&fs),
            Err(AwsError::MissingAttribute("file system id"))
        ));
    }

    #[test]
    fn status_requires_a_lifecycle() {
        let fs = FileSystem::builder().file_system_id("fs-0123").build();
        assert!(matches!(
            FileSystemStatus::from_file_system(&fs),
            Err(AwsError::MissingAttribute("lifecycle state"))
        ));
    }
}
