mod queue;

// region:    --- Exports
pub use queue::{Entry, PriorityQueue};
// endregion: --- Exports
