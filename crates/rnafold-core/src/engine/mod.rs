//! # Engine Module
//!
//! Everything between a validated [`Sequence`](crate::core::sequence::Sequence)
//! and the external folding tool.
//!
//! - **Configuration** ([`config`]) - Tool name and arguments, timeout, kill grace period and
//!   sequence length limit
//! - **Tool Resolution** ([`locator`]) - Injectable lookup of the executable, `PATH` by default
//! - **Process Invocation** ([`invoker`]) - Blocking and async adapters that run the tool with a
//!   timeout and capture its output
//! - **Context** ([`context`]) - Ties configuration and locator together and turns tool output
//!   into a [`FoldResult`](crate::core::structure::FoldResult)
//! - **Progress Monitoring** ([`progress`]) - Progress reporting for batch folding
//! - **Error Handling** ([`error`]) - The single [`FoldError`](error::FoldError) type

pub mod config;
pub mod context;
pub mod error;
pub mod invoker;
pub mod locator;
pub mod progress;
