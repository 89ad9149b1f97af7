use std::time::Duration;

use rand::Rng;
use tokio::{
    io::AsyncWrite,
    time::{Instant, Interval, MissedTickBehavior, interval_at},
};

use crate::{
    config::WorkloadConfig,
    core::pipeline::{allocating::Workload, reporting::Reporter},
};

/// Multiplexes the allocation and reporting timers onto one control loop.
///
/// Each wake services exactly one timer and runs its handler to completion
/// before waiting again, so the working set never sees concurrent access.
#[derive(Debug)]
pub struct Scheduler<R, W> {
    workload: Workload<R>,
    reporter: Reporter<W>,
    alloc_interval: Duration,
    report_interval: Duration,
}

impl<R: Rng, W: AsyncWrite + Unpin> Scheduler<R, W> {
    pub fn new(config: &WorkloadConfig, workload: Workload<R>, reporter: Reporter<W>) -> Self {
        Self {
            workload,
            reporter,
            alloc_interval: config.alloc_interval,
            report_interval: config.report_interval,
        }
    }

    /// Runs until the surrounding task is dropped.
    #[tracing::instrument(skip(self))]
    pub async fn run(&mut self) {
        let mut alloc_ticks = ticker(self.alloc_interval);
        let mut report_ticks = ticker(self.report_interval);

        tracing::info!(
            alloc_interval_ms = self.alloc_interval.as_millis() as u64,
            report_interval_ms = self.report_interval.as_millis() as u64,
            "scheduler started"
        );

        loop {
            tokio::select! {
                _ = alloc_ticks.tick() => {
                    self.workload.tick();
                }
                _ = report_ticks.tick() => {
                    match self.reporter.report().await {
                        Ok(line) => tracing::debug!(
                            %line,
                            retained = self.workload.working_set().len(),
                            "reported runtime stats"
                        ),
                        Err(err) => tracing::error!(error = %err, "failed to report runtime stats"),
                    }
                }
            }
        }
    }
}

/// First fire is one full period after creation; late ticks are skipped, not replayed.
fn ticker(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        domain::MemStats,
        traits::stats::{MockRuntimeStats, StatsError},
    };
    use rand::{SeedableRng, rngs::StdRng};
    use std::sync::Arc;
    use tokio::{io::AsyncReadExt, time::timeout};

    fn small_blocks() -> WorkloadConfig {
        WorkloadConfig {
            min_block_size: 64,
            max_block_size: 256,
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timers_fire_independently() {
        let config = small_blocks();
        let mut stats = MockRuntimeStats::new();
        let mut num_gc = 0;
        stats.expect_snapshot().times(2).returning(move || {
            num_gc += 1;
            Ok(MemStats {
                heap_alloc_bytes: 4096,
                heap_sys_bytes: 8192,
                num_gc,
            })
        });
        let (writer, mut reader) = tokio::io::duplex(4096);
        let mut scheduler = Scheduler::new(
            &config,
            Workload::new(StdRng::seed_from_u64(3), &config),
            Reporter::new(Arc::new(stats), writer),
        );

        let result = timeout(Duration::from_millis(4025), scheduler.run()).await;

        assert!(result.is_err());
        assert_eq!(scheduler.workload.working_set().len(), 80);

        drop(scheduler);
        let mut output = String::new();
        reader.read_to_string(&mut output).await.unwrap();
        assert_eq!(
            output,
            "heap_alloc=4KB heap_sys=8KB num_gc=1\n\
             heap_alloc=4KB heap_sys=8KB num_gc=2\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_fires_before_first_period() {
        let config = small_blocks();
        let mut stats = MockRuntimeStats::new();
        stats.expect_snapshot().never();
        let mut scheduler = Scheduler::new(
            &config,
            Workload::new(StdRng::seed_from_u64(3), &config),
            Reporter::new(Arc::new(stats), Vec::new()),
        );

        let _ = timeout(Duration::from_millis(49), scheduler.run()).await;

        assert_eq!(scheduler.workload.working_set().len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_report_failure_keeps_loop_running() {
        let config = small_blocks();
        let mut stats = MockRuntimeStats::new();
        let mut calls = 0;
        stats.expect_snapshot().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Err(StatsError::Query {
                    name: "epoch",
                    msg: "unavailable".to_string(),
                })
            } else {
                Ok(MemStats::default())
            }
        });
        let (writer, mut reader) = tokio::io::duplex(4096);
        let mut scheduler = Scheduler::new(
            &config,
            Workload::new(StdRng::seed_from_u64(5), &config),
            Reporter::new(Arc::new(stats), writer),
        );

        let _ = timeout(Duration::from_millis(4025), scheduler.run()).await;

        assert_eq!(scheduler.workload.working_set().len(), 80);
        drop(scheduler);
        let mut output = String::new();
        reader.read_to_string(&mut output).await.unwrap();
        assert_eq!(output, "heap_alloc=0KB heap_sys=0KB num_gc=0\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_working_set_is_capped_over_long_run() {
        let config = small_blocks();
        let mut stats = MockRuntimeStats::new();
        stats
            .expect_snapshot()
            .returning(|| Ok(MemStats::default()));
        let mut scheduler = Scheduler::new(
            &config,
            Workload::new(StdRng::seed_from_u64(11), &config),
            Reporter::new(Arc::new(stats), tokio::io::sink()),
        );

        // 201 allocation ticks: the 201st pushes the set over the cap.
        let _ = timeout(Duration::from_millis(201 * 50 + 25), scheduler.run()).await;

        assert_eq!(scheduler.workload.working_set().len(), 201 - 100);
    }
}
