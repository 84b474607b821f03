//! Capacity tiering
//!
//! FSx for Lustre only accepts storage capacity in fixed increments: up to
//! 3 TB the capacity scales linearly at 1200 GB per requested TB, and above
//! that the file system must be provisioned in whole 3 TB groups of
//! 3600 GB each. [`billable_gigabytes`] snaps a requested size up to the
//! next valid increment.

use crate::error::{FsxError, Result};
use serde::{Deserialize, Serialize};

/// Largest size (in TB) served by the linear base tier.
pub const BASE_TIER_MAX_TB: u64 = 3;

/// Billable gigabytes per requested terabyte inside the base tier.
pub const BASE_GB_PER_TB: u64 = 1200;

/// Billable gigabytes per 3 TB group above the base tier.
pub const TIER_UNIT_GB: u64 = 3600;

/// Default cap on the requested size, matching the reference deployment.
pub const DEFAULT_MAX_SIZE_TB: u64 = 16;

/// Convert a requested size in terabytes to the provider's billable
/// capacity in gigabytes, rounded up to the nearest allowed increment.
///
/// Pure and monotonically non-decreasing.
pub fn billable_gigabytes(requested_tb: u64) -> u64 {
    if requested_tb <= BASE_TIER_MAX_TB {
        requested_tb * BASE_GB_PER_TB
    } else {
        let mut tier_count = requested_tb / BASE_TIER_MAX_TB;
        if requested_tb % BASE_TIER_MAX_TB > 0 {
            tier_count += 1;
        }
        tier_count * TIER_UNIT_GB
    }
}

/// A validated request for a file system of a given size in terabytes.
///
/// Construction fails if the request exceeds the configured maximum, so a
/// `CapacityRequest` in hand means no further size checks are needed before
/// issuing provider calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityRequest {
    terabytes: u64,
}

impl CapacityRequest {
    pub fn new(terabytes: u64, max_tb: u64) -> Result<Self> {
        if terabytes > max_tb {
            return Err(FsxError::InvalidSize {
                requested_tb: terabytes,
                max_tb,
            });
        }
        Ok(Self { terabytes })
    }

    pub fn terabytes(&self) -> u64 {
        self.terabytes
    }

    /// The billable capacity this request maps to.
    pub fn billable(&self) -> BillableCapacity {
        BillableCapacity(billable_gigabytes(self.terabytes))
    }
}

/// Billable capacity in gigabytes, always on an allowed tier boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BillableCapacity(u64);

impl BillableCapacity {
    pub fn gigabytes(&self) -> u64 {
        self.0
    }

    /// The SDK's storage-capacity field is an `i32`. Tier math on any
    /// permitted request size stays far below that range.
    pub fn as_i32(&self) -> i32 {
        self.0 as i32
    }
}

impl std::fmt::Display for BillableCapacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} GB", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_tier_is_linear() {
        for tb in 0..=3 {
            assert_eq!(billable_gigabytes(tb), tb * 1200);
        }
    }

    #[test]
    fn known_sizes() {
        assert_eq!(billable_gigabytes(0), 0);
        assert_eq!(billable_gigabytes(3), 3600);
        // 4 TB rounds up to the 6 TB group
        assert_eq!(billable_gigabytes(4), 7200);
        assert_eq!(billable_gigabytes(6), 7200);
        assert_eq!(billable_gigabytes(7), 10800);
        assert_eq!(billable_gigabytes(16), 21600);
    }

    #[test]
    fn above_base_tier_is_a_tier_multiple() {
        for tb in 4..=64 {
            let gb = billable_gigabytes(tb);
            assert_eq!(gb % TIER_UNIT_GB, 0, "{tb} TB gave {gb} GB");
            assert!(gb >= tb.div_ceil(3) * TIER_UNIT_GB);
        }
    }

    #[test]
    fn monotonically_non_decreasing() {
        let mut previous = 0;
        for tb in 0..=64 {
            let gb = billable_gigabytes(tb);
            assert!(gb >= previous, "{tb} TB decreased to {gb} GB");
            previous = gb;
        }
    }

    #[test]
    fn deterministic() {
        assert_eq!(billable_gigabytes(5), billable_gigabytes(5));
    }

    #[test]
    fn request_within_max() {
        let request = CapacityRequest::new(4, DEFAULT_MAX_SIZE_TB).unwrap();
        assert_eq!(request.terabytes(), 4);
        assert_eq!(request.billable().gigabytes(), 7200);
        assert_eq!(request.billable().as_i32(), 7200);
    }

    #[test]
    fn request_over_max_is_rejected() {
        let err = CapacityRequest::new(17, 16).unwrap_err();
        assert!(matches!(
            err,
            FsxError::InvalidSize {
                requested_tb: 17,
                max_tb: 16
            }
        ));
    }

    #[test]
    fn request_at_max_is_allowed() {
        assert!(CapacityRequest::new(16, 16).is_ok());
    }
}
