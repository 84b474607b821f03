//! AWS FSx for Lustre provider for fsxflow
//!
//! This crate owns every AWS SDK call the tool makes:
//!
//! - **fsx**: create, delete, and describe file systems
//! - **ssm**: resolve the subnet and security-group parameters the
//!   deployment publishes in the parameter store
//! - **ec2**: resolve a file system's network interfaces to private IPs
//!
//! Capacity tiering and the poll loop live in `fsxflow-core`; this crate
//! wires them to the provider.
//!
//! # Example
//!
//! ```ignore
//! use fsxflow_cloud_aws::{AwsClients, CreateRequest, FsxProvider, FsxSettings};
//! use fsxflow_core::CapacityRequest;
//!
//! let settings = FsxSettings::default();
//! let clients = AwsClients::connect(None, None).await;
//! let provider = FsxProvider::new(clients, settings);
//!
//! let request = CreateRequest {
//!     name: "scratch".to_string(),
//!     capacity: CapacityRequest::new(4, 16)?,
//!     import_path: "s3://bucket/in".to_string(),
//!     export_path: "s3://bucket/out".to_string(),
//! };
//! let created = provider.create(&request).await?;
//! let status = provider.wait_for_create(&created.id, None).await?;
//! ```

pub mod client;
pub mod error;
pub mod filesystem;
pub mod params;
pub mod settings;

pub use client::AwsClients;
pub use error::{AwsError, Result};
pub use filesystem::{
    CreateRequest, CreatedFileSystem, FileSystemAddresses, FileSystemStatus, FsxProvider,
    mount_command,
};
pub use params::NetworkParams;
pub use settings::FsxSettings;
