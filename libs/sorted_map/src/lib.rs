//! Priority queue backed by a concurrent sorted map instead of a single lock.

mod key;
mod skip_queue;

// region:    --- Exports
pub use skip_queue::SkipQueue;
// endregion: --- Exports
