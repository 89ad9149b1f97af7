use crate::core::domain::MemStats;

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("failed to read allocator statistic {name}: {msg}")]
    Query { name: &'static str, msg: String },
}

/// Read-only view of the heap counters kept by whatever allocator the process runs on.
#[mockall::automock]
pub trait RuntimeStats: std::fmt::Debug + Send + Sync {
    fn snapshot(&self) -> Result<MemStats, StatsError>;
}
