pub const STARTUP_BANNER: &str = "Starting GC pressure workload...";

pub const ALLOC_INTERVAL_MS: u64 = 50;
pub const REPORT_INTERVAL_MS: u64 = 2000;

/// Inclusive lower bound of a block size, in bytes.
pub const MIN_BLOCK_SIZE: usize = 10 * 1024;
/// Exclusive upper bound of a block size, in bytes.
pub const MAX_BLOCK_SIZE: usize = 200 * 1024;

/// One write per virtual-memory page.
pub const TOUCH_STRIDE: usize = 4096;

pub const RETENTION_CAP: usize = 200;
