//! Pipeline orchestration: note tree → similarity service → graph store

pub mod runner;

pub use runner::{Orchestrator, PipelineOptions, RunReport};
