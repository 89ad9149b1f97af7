use tikv_jemalloc_ctl::{epoch, raw, stats};

use crate::core::{
    domain::MemStats,
    traits::stats::{RuntimeStats, StatsError},
};

// 4096 is MALLCTL_ARENAS_ALL: the counters summed over every arena.
const DIRTY_PURGES: &[u8] = b"stats.arenas.4096.dirty_npurge\0";
const MUZZY_PURGES: &[u8] = b"stats.arenas.4096.muzzy_npurge\0";

/// Heap counters of the jemalloc global allocator.
///
/// jemalloc has no tracing collector, so a completed purge sweep (freed pages
/// handed back to the OS) stands in for a completed collection cycle.
#[derive(Clone, Debug)]
pub struct JemallocStats;

impl JemallocStats {
    pub fn new() -> Self {
        Self
    }
}

impl RuntimeStats for JemallocStats {
    fn snapshot(&self) -> Result<MemStats, StatsError> {
        // Counters are cached per epoch; advance to get current values.
        epoch::advance().map_err(query_error("epoch"))?;

        let allocated = stats::allocated::read().map_err(query_error("stats.allocated"))?;
        let mapped = stats::mapped::read().map_err(query_error("stats.mapped"))?;
        let dirty = read_counter(DIRTY_PURGES, "stats.arenas.dirty_npurge")?;
        let muzzy = read_counter(MUZZY_PURGES, "stats.arenas.muzzy_npurge")?;

        Ok(MemStats {
            heap_alloc_bytes: allocated as u64,
            heap_sys_bytes: mapped as u64,
            num_gc: dirty + muzzy,
        })
    }
}

fn read_counter(key: &[u8], name: &'static str) -> Result<u64, StatsError> {
    // SAFETY: both keys are NUL-terminated and name uint64_t statistics.
    unsafe { raw::read::<u64>(key) }.map_err(query_error(name))
}

fn query_error(name: &'static str) -> impl FnOnce(tikv_jemalloc_ctl::Error) -> StatsError {
    move |err| StatsError::Query {
        name,
        msg: err.to_string(),
    }
}
