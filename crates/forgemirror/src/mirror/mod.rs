//! The mirror run: source listing, optional reconciliation, migration.

mod engine;
mod progress;
mod types;

pub use engine::{run, MirrorError};
pub use progress::{emit, MirrorProgress, ProgressCallback};
pub use types::{InvalidStrategy, MirrorOptions, MirrorStrategy, RunSummary};
