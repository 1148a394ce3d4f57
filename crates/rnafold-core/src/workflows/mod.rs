//! High-level entry points: fold compounds bound to one sequence, and batch
//! folding of many sequences.

pub mod batch;
pub mod runner;
