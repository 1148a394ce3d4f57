use crate::core::io::rnafold::parse_mfe_report;
use crate::core::sequence::Sequence;
use crate::core::structure::FoldResult;
use crate::engine::config::FoldConfig;
use crate::engine::error::FoldError;
use crate::engine::invoker::{self, Invocation, InvocationOutcome};
use crate::engine::locator::{PathLocator, ToolLocator};
use crate::workflows::runner::{RnaRunner, SyncRnaRunner};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// Line that ends RNAfold's interactive input loop.
const END_OF_INPUT: &str = "@";

/// Shared configuration and tool resolution for every runner it creates.
///
/// Cloning is cheap; clones share the same locator.
#[derive(Debug, Clone)]
pub struct FoldContext {
    config: Arc<FoldConfig>,
    locator: Arc<dyn ToolLocator>,
}

impl Default for FoldContext {
    fn default() -> Self {
        Self::new(FoldConfig::default())
    }
}

impl FoldContext {
    pub fn new(config: FoldConfig) -> Self {
        Self {
            config: Arc::new(config),
            locator: Arc::new(PathLocator::new()),
        }
    }

    pub fn with_locator(mut self, locator: impl ToolLocator + 'static) -> Self {
        self.locator = Arc::new(locator);
        self
    }

    pub fn config(&self) -> &FoldConfig {
        &self.config
    }

    /// Validates `raw` against this context's length limit.
    pub fn validate(&self, raw: &str) -> Result<Sequence, FoldError> {
        Ok(Sequence::with_max_length(
            raw,
            self.config.max_sequence_length,
        )?)
    }

    pub fn fold_compound(&self, raw: &str) -> Result<RnaRunner, FoldError> {
        Ok(RnaRunner::from_parts(self.validate(raw)?, self.clone()))
    }

    pub fn fold_compound_sync(&self, raw: &str) -> Result<SyncRnaRunner, FoldError> {
        Ok(SyncRnaRunner::from_parts(self.validate(raw)?, self.clone()))
    }

    pub fn locate(&self) -> Result<PathBuf, FoldError> {
        self.locator.locate(&self.config.tool_name)
    }

    /// Builds the call that folds `sequence`. The first half of every fold,
    /// whichever adapter then waits on the child.
    pub fn prepare(&self, sequence: &Sequence) -> Result<Invocation, FoldError> {
        Ok(Invocation {
            tool: self.config.tool_name.clone(),
            program: self.locate()?,
            args: self.config.tool_args.clone(),
            stdin: format!("{}\n{}\n", sequence, END_OF_INPUT),
            timeout: self.config.timeout,
            kill_grace: self.config.kill_grace,
        })
    }

    /// Parses the tool's report for `sequence`. The second half of every fold.
    pub fn finish(
        &self,
        sequence: &Sequence,
        outcome: InvocationOutcome,
    ) -> Result<FoldResult, FoldError> {
        parse_mfe_report(&outcome.stdout, sequence.len()).map_err(|source| {
            warn!(
                tool = %self.config.tool_name,
                error = %source,
                output = %outcome.stdout,
                "Unexpected output from folding tool."
            );
            FoldError::Parse {
                source,
                output: outcome.stdout,
            }
        })
    }

    pub async fn fold(&self, sequence: &Sequence) -> Result<FoldResult, FoldError> {
        let invocation = self.prepare(sequence)?;
        let outcome = invoker::invoke(&invocation).await?;
        self.finish(sequence, outcome)
    }

    pub fn fold_blocking(&self, sequence: &Sequence) -> Result<FoldResult, FoldError> {
        let invocation = self.prepare(sequence)?;
        let outcome = invoker::invoke_blocking(&invocation)?;
        self.finish(sequence, outcome)
    }

    /// Runs the tool with `--version` and returns the first line it prints.
    pub async fn tool_version(&self) -> Result<String, FoldError> {
        let invocation = Invocation {
            tool: self.config.tool_name.clone(),
            program: self.locate()?,
            args: vec!["--version".to_string()],
            stdin: String::new(),
            timeout: self.config.timeout,
            kill_grace: self.config.kill_grace,
        };
        let outcome = invoker::invoke(&invocation).await?;
        Ok(outcome
            .stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_string())
    }
}
