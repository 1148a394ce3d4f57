//! Stateless building blocks: sequence validation, fold results and the parser
//! for the folding tool's output.

pub mod io;
pub mod sequence;
pub mod structure;
