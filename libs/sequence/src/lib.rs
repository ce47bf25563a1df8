//! Priority queues that keep their entries in one sequence sorted by descending priority.
//! Insertion pays the ordering cost, popping the most urgent entry is O(1).

mod channel_based;
mod list;
mod lock_based;

// region:    --- Exports
pub use channel_based::ChanneledQueue;
pub use lock_based::LockedQueue;
// endregion: --- Exports
