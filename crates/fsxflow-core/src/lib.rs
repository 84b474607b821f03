//! Core domain logic for fsxflow
//!
//! This crate holds everything about provisioning FSx for Lustre file
//! systems that does not touch the AWS SDK:
//!
//! - **Capacity tiering**: translating a requested size in terabytes into
//!   the billable gigabyte capacity the provider accepts (fixed increments
//!   above the 3 TB base tier).
//! - **Lifecycle model**: the provider-reported states a file system moves
//!   through, and which of them are terminal for a create operation.
//! - **Poll engine**: a bounded sleep-then-probe loop that drives an
//!   asynchronous provider-side operation to completion.
//!
//! The AWS collaborator lives in `fsxflow-cloud-aws`; the CLI in `fsxflow`.

pub mod capacity;
pub mod error;
pub mod lifecycle;
pub mod poll;

// Re-exports
pub use capacity::{BillableCapacity, CapacityRequest, billable_gigabytes};
pub use error::{FsxError, Result};
pub use lifecycle::LifecycleState;
pub use poll::{Probe, PollConfig, PollError, wait_until};
