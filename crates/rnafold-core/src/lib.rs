//! # cmdrnafold
//!
//! RNA secondary structure prediction through the ViennaRNA `RNAfold`
//! commandline tool, with a blocking and an asynchronous interface.
//!
//! The folding itself is done by the external executable. This crate validates
//! the input sequence, runs the tool without a shell, parses its report, and
//! maps every failure to one typed [`FoldError`].
//!
//! ## Layers
//!
//! - **[`core`]: The Foundation.** Stateless pieces: [`Sequence`] validation,
//!   the [`FoldResult`] model and the parser for RNAfold's textual output.
//!
//! - **[`engine`]: Talking to the Tool.** Configuration, tool resolution through
//!   an injectable [`ToolLocator`], the process invoker with its timeout and
//!   termination handling, and the [`FoldContext`] that ties them together.
//!
//! - **[`workflows`]: The Public API.** [`RnaRunner`] and [`SyncRnaRunner`] fold
//!   one sequence; [`workflows::batch`] folds many concurrently.
//!
//! ## Example
//!
//! ```no_run
//! let fc = cmdrnafold::fold_compound_sync("CGCAGGGAUACCCGCG")?;
//! let result = fc.mfe()?;
//! println!("{}", result);
//! # Ok::<(), cmdrnafold::FoldError>(())
//! ```

pub mod core;
pub mod engine;
pub mod workflows;

#[cfg(all(test, unix))]
mod test_utils;

pub use crate::core::sequence::{Sequence, ValidationError};
pub use crate::core::structure::FoldResult;
pub use crate::engine::config::{FoldConfig, FoldConfigBuilder};
pub use crate::engine::context::FoldContext;
pub use crate::engine::error::{FoldError, FoldErrorKind};
pub use crate::engine::locator::{FixedLocator, PathLocator, ToolLocator};
pub use crate::workflows::runner::{RnaRunner, SyncRnaRunner};

/// Creates an asynchronous fold compound for `sequence` using `RNAfold` from
/// `PATH`.
///
/// # Errors
///
/// Returns [`FoldError::Validation`] if `sequence` is not a valid RNA sequence.
/// No process is started in that case.
pub fn fold_compound(sequence: &str) -> Result<RnaRunner, FoldError> {
    RnaRunner::new(sequence)
}

/// Creates a blocking fold compound for `sequence` using `RNAfold` from `PATH`.
///
/// # Errors
///
/// Returns [`FoldError::Validation`] if `sequence` is not a valid RNA sequence.
pub fn fold_compound_sync(sequence: &str) -> Result<SyncRnaRunner, FoldError> {
    SyncRnaRunner::new(sequence)
}

/// Mirrors the `RNA` module of the ViennaRNA Python bindings, where
/// `fold_compound` is blocking.
pub mod rna {
    use super::{FoldError, SyncRnaRunner};

    pub fn fold_compound(sequence: &str) -> Result<SyncRnaRunner, FoldError> {
        super::fold_compound_sync(sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_points_validate_before_anything_else() {
        assert_eq!(
            fold_compound("INVALID_SEQUENCE").unwrap_err().kind(),
            FoldErrorKind::Validation
        );
        assert_eq!(
            fold_compound_sync("").unwrap_err().kind(),
            FoldErrorKind::Validation
        );
        assert_eq!(
            rna::fold_compound("AUGCX").unwrap_err().kind(),
            FoldErrorKind::Validation
        );
    }

    #[test]
    fn entry_points_normalize_case() {
        assert_eq!(fold_compound("augc").unwrap().sequence().as_str(), "AUGC");
        assert_eq!(rna::fold_compound("gauc").unwrap().sequence().as_str(), "GAUC");
    }

    #[test]
    fn default_context_runs_rnafold() {
        let fc = fold_compound_sync("AUGC").unwrap();
        assert_eq!(fc.context().config().command_line(), "RNAfold --noPS");
    }
}
