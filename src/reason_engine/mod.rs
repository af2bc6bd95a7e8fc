//! Fetch -> gate -> canonicalize -> dedupe -> score -> rank -> persist
//! (spec.md §4.3), plus the bounded-queue worker pool (spec.md §5).

pub mod adapter;
pub mod canonical;
pub mod gate;
pub mod pipeline;
pub mod scoring;

pub use adapter::Adapter;
pub use pipeline::{EventQueue, ReasonEngine};
