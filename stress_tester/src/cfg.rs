#[derive(Debug, Clone, clap::Parser)]
pub struct Cfg {
    /// The priority queue implementation to test.
    pub implementation: Implementation,
    /// Number of producers that add and re-prioritize elements.
    #[arg(short, long)]
    pub producer_num: usize,
    /// Number of elements each producer will add during the test.
    #[arg(short, long)]
    pub element_num: usize,
    /// Number of consumers that will drain elements from the queue.
    #[arg(short, long, default_value_t = 1)]
    pub consumer_num: usize,
    /// Share of producer operations that update an earlier element instead of adding a new one.
    #[arg(short, long, default_value_t = 0.2)]
    pub update_ratio: f64,
    /// Delay between the start of each drain interval.
    #[arg(long, default_value_t = 5)]
    pub drain_interval_ms: u64,
    /// Number of elements that will be drained per batch.
    #[arg(short = 'b', long, default_value_t = 100)]
    pub drain_batch_size: usize,
    /// Hard cap on the test's execution time.
    #[arg(long, default_value_t = 10)]
    pub run_duration_seconds: u64,
    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, strum::EnumString, strum::Display, clap::ValueEnum)]
pub enum Implementation {
    /// Ordered sequence behind a single mutex.
    #[strum(ascii_case_insensitive)]
    Locked,
    /// Ordered sequence owned by a worker thread.
    #[strum(ascii_case_insensitive)]
    Channeled,
    /// Lock-free skip list with an element index.
    #[strum(ascii_case_insensitive, serialize = "skip-map")]
    SkipMap,
}
