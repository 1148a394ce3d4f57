//! Readers for the textual reports produced by external folding tools.

pub mod rnafold;
