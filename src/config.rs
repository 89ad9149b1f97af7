use std::time::Duration;

use crate::constants::{
    ALLOC_INTERVAL_MS, MAX_BLOCK_SIZE, MIN_BLOCK_SIZE, REPORT_INTERVAL_MS, RETENTION_CAP,
    TOUCH_STRIDE,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} interval must be non-zero")]
    ZeroInterval { name: &'static str },
    #[error("block size range {min}..{max} is empty")]
    EmptySizeRange { min: usize, max: usize },
    #[error("touch stride must be non-zero")]
    ZeroStride,
    #[error("retention cap must be non-zero")]
    ZeroCap,
}

/// Fixed shape of the workload. Production always uses [`WorkloadConfig::default`];
/// nothing is read from the environment or the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkloadConfig {
    pub alloc_interval: Duration,
    pub report_interval: Duration,
    pub min_block_size: usize,
    pub max_block_size: usize,
    pub touch_stride: usize,
    pub retention_cap: usize,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            alloc_interval: Duration::from_millis(ALLOC_INTERVAL_MS),
            report_interval: Duration::from_millis(REPORT_INTERVAL_MS),
            min_block_size: MIN_BLOCK_SIZE,
            max_block_size: MAX_BLOCK_SIZE,
            touch_stride: TOUCH_STRIDE,
            retention_cap: RETENTION_CAP,
        }
    }
}

impl WorkloadConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alloc_interval.is_zero() {
            return Err(ConfigError::ZeroInterval { name: "allocation" });
        }
        if self.report_interval.is_zero() {
            return Err(ConfigError::ZeroInterval { name: "report" });
        }
        if self.min_block_size >= self.max_block_size {
            return Err(ConfigError::EmptySizeRange {
                min: self.min_block_size,
                max: self.max_block_size,
            });
        }
        if self.touch_stride == 0 {
            return Err(ConfigError::ZeroStride);
        }
        if self.retention_cap == 0 {
            return Err(ConfigError::ZeroCap);
        }
        Ok(())
    }
}
