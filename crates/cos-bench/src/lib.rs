//! League generator and benchmark utilities for cos.
//!
//! This crate provides deterministic generation of season snapshots for
//! benchmarking and property-based testing of `cos-core`.

pub mod correctness;
pub mod generator;

pub use generator::{
    GeneratorConfig, SizeTier, conference_name, division_name, generate_league,
    generate_snapshot, generate_snapshot_json,
};
