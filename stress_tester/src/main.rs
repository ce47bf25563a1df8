use std::sync::Arc;

use anyhow::{Context, ensure};
use cfg::{Cfg, Implementation};
use clap::Parser;
use sequence::{ChanneledQueue, LockedQueue};
use sorted_map::SkipQueue;
use tracing::{debug, error, info};
use triage::{
    PriorityQueue,
    test::stress::{StressTestConfig, run_stress_test},
};

pub mod cfg;

fn main() {
    let cfg = Cfg::parse();
    init_tracing(&cfg);
    debug!("running configuration: {cfg:?}");

    let res = match cfg.implementation {
        Implementation::Locked => run_locked(&cfg),
        Implementation::Channeled => run_channeled(&cfg),
        Implementation::SkipMap => run_skip_map(&cfg),
    };
    if let Err(e) = res {
        error!("stress test failed: {e:?}");
    }
}

fn init_tracing(cfg: &Cfg) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();
}

fn capacity(cfg: &Cfg) -> anyhow::Result<usize> {
    cfg.element_num
        .checked_mul(cfg.producer_num)
        .context("overflow while calculating queue capacity")
}

fn run_locked(cfg: &Cfg) -> anyhow::Result<()> {
    let queue = Arc::new(LockedQueue::with_capacity(capacity(cfg)?));
    run(queue, cfg)
}

fn run_channeled(cfg: &Cfg) -> anyhow::Result<()> {
    let queue = Arc::new(ChanneledQueue::with_capacity(capacity(cfg)?));
    run(queue, cfg)
}

fn run_skip_map(cfg: &Cfg) -> anyhow::Result<()> {
    let queue = Arc::new(SkipQueue::with_capacity(capacity(cfg)?));
    run(queue, cfg)
}

fn run<Q: PriorityQueue<String, u64>>(queue: Arc<Q>, cfg: &Cfg) -> anyhow::Result<()> {
    ensure!(
        (0.0..1.0).contains(&cfg.update_ratio),
        "update ratio must be in [0, 1), got {}",
        cfg.update_ratio
    );

    let config = StressTestConfig {
        num_producers: cfg.producer_num,
        num_elements: cfg.element_num,
        num_consumers: cfg.consumer_num,
        update_ratio: cfg.update_ratio,
        drain_interval_ms: cfg.drain_interval_ms,
        drain_batch_size: cfg.drain_batch_size,
        priority_range: (1, 1_000),
        run_duration_seconds: cfg.run_duration_seconds,
    };
    info!(implementation = %cfg.implementation, "queue ready");

    let results = run_stress_test(queue, config)?;
    results.print_summary();
    ensure!(
        results.is_conserved(),
        "elements were lost or duplicated during the run"
    );
    Ok(())
}
