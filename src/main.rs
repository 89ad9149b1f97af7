use std::panic;
use std::sync::Arc;

use rand::{SeedableRng, rngs::StdRng};
use tracing_subscriber::EnvFilter;

use crate::config::WorkloadConfig;
use crate::constants::STARTUP_BANNER;
use crate::core::pipeline::{allocating::Workload, reporting::Reporter, scheduling::Scheduler};
use crate::native::jemalloc::JemallocStats;

mod config;
mod constants;
mod core;
mod native;

#[global_allocator]
static ALLOC: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    set_panic_hook();

    let config = WorkloadConfig::default();
    config.validate()?;

    let seed = wall_clock_seed();
    tracing::info!(?config, seed, "workload configured");

    let mut reporter = Reporter::new(Arc::new(JemallocStats::new()), tokio::io::stdout());
    reporter.announce(STARTUP_BANNER).await?;

    let workload = Workload::new(StdRng::seed_from_u64(seed), &config);
    let mut scheduler = Scheduler::new(&config, workload, reporter);
    scheduler.run().await;

    Ok(())
}

fn wall_clock_seed() -> u64 {
    let now = chrono::Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros()) as u64
}

fn set_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        tracing::error!(
            message = "panic occurred",
            panic = %panic_info
        );
    }));
}
