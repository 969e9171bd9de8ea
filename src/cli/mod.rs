//! Command-line workflow entry points

pub mod orchestration;

pub use orchestration::{run_pipeline, PipelineOutput};
