// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod enricher;
mod progress;
pub mod rows;

pub use enricher::{Enricher, RowOutcome};
pub use progress::{PipelineStats, ProgressTracker};
pub use rows::load_rows;
