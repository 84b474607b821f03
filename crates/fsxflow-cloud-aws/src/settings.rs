//! Deployment settings
//!
//! Defaults match the reference deployment; an optional JSON file overrides
//! any subset of them.

use crate::error::Result;
use fsxflow_core::capacity::DEFAULT_MAX_SIZE_TB;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
const DEFAULT_SUBNETS_PARAM: &str = "/fsx/private-subnet-csv";
const DEFAULT_SECURITY_GROUP_PARAM: &str = "/fsx/security-group";
const DEFAULT_MAINTENANCE_WINDOW: &str = "2:20:30";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FsxSettings {
    /// Largest file system this deployment allows, in TB.
    pub max_size_tb: u64,

    /// Seconds between status probes while waiting on create or delete.
    pub poll_interval_secs: u64,

    /// Overall polling bound in seconds. `None` waits indefinitely.
    pub poll_timeout_secs: Option<u64>,

    /// Parameter store key holding the comma-separated subnet IDs.
    pub subnets_param: String,

    /// Parameter store key holding the comma-separated security group IDs.
    pub security_group_param: String,

    /// Weekly maintenance start time, `d:HH:MM`.
    pub weekly_maintenance_start_time: String,
}

impl Default for FsxSettings {
    fn default() -> Self {
        Self {
            max_size_tb: DEFAULT_MAX_SIZE_TB,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            poll_timeout_secs: None,
            subnets_param: DEFAULT_SUBNETS_PARAM.to_string(),
            security_group_param: DEFAULT_SECURITY_GROUP_PARAM.to_string(),
            weekly_maintenance_start_time: DEFAULT_MAINTENANCE_WINDOW.to_string(),
        }
    }
}

impl FsxSettings {
    /// Load settings from a JSON file. Absent keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let settings: FsxSettings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn poll_timeout(&self) -> Option<Duration> {
        self.poll_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_deployment() {
        let settings = FsxSettings::default();
        assert_eq!(settings.max_size_tb, 16);
        assert_eq!(settings.poll_interval_secs, 60);
        assert_eq!(settings.poll_timeout_secs, None);
        assert_eq!(settings.weekly_maintenance_start_time, "2:20:30");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"max_size_tb": 32, "subnets_param": "/team/fsx/subnets"}}"#
        )
        .unwrap();

        let settings = FsxSettings::load(file.path()).unwrap();
        assert_eq!(settings.max_size_tb, 32);
        assert_eq!(settings.subnets_param, "/team/fsx/subnets");
        // untouched keys keep their defaults
        assert_eq!(settings.poll_interval_secs, 60);
        assert_eq!(settings.security_group_param, "/fsx/security-group");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(FsxSettings::load("/nonexistent/fsxflow.json").is_err());
    }

    #[test]
    fn timeout_conversion() {
        let mut settings = FsxSettings::default();
        assert_eq!(settings.poll_timeout(), None);
        settings.poll_timeout_secs = Some(1800);
        assert_eq!(settings.poll_timeout(), Some(Duration::from_secs(1800)));
        assert_eq!(settings.poll_interval(), Duration::from_secs(60));
    }
}
