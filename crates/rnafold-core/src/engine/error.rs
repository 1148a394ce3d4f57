use crate::core::io::rnafold::OutputParseError;
use crate::core::sequence::ValidationError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Coarse classification of a [`FoldError`], for retry-vs-abort decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoldErrorKind {
    Validation,
    ToolNotFound,
    Timeout,
    Execution,
    Parse,
}

impl fmt::Display for FoldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::ToolNotFound => "tool-not-found",
            Self::Timeout => "timeout",
            Self::Execution => "execution",
            Self::Parse => "parse",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum FoldError {
    #[error("Invalid RNA sequence: {0}")]
    Validation(#[from] ValidationError),

    #[error("Folding tool '{tool}' not found: {message}")]
    ToolNotFound { tool: String, message: String },

    #[error("'{tool}' did not finish within {timeout:?} and was terminated")]
    Timeout {
        tool: String,
        timeout: Duration,
        stderr: String,
    },

    #[error("{message}{}", format_stderr(.stderr))]
    Execution {
        message: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Could not parse RNAfold output: {source}")]
    Parse {
        #[source]
        source: OutputParseError,
        output: String,
    },
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

impl FoldError {
    pub fn kind(&self) -> FoldErrorKind {
        match self {
            Self::Validation(_) => FoldErrorKind::Validation,
            Self::ToolNotFound { .. } => FoldErrorKind::ToolNotFound,
            Self::Timeout { .. } => FoldErrorKind::Timeout,
            Self::Execution { .. } => FoldErrorKind::Execution,
            Self::Parse { .. } => FoldErrorKind::Parse,
        }
    }

    /// Raw text captured from the tool: stderr for process failures, stdout for
    /// parse failures.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Timeout { stderr, .. } | Self::Execution { stderr, .. } => Some(stderr.as_str()),
            Self::Parse { output, .. } => Some(output.as_str()),
            Self::Validation(_) | Self::ToolNotFound { .. } => None,
        }
    }

    /// Only timeouts may succeed on a second attempt; the tool is otherwise
    /// deterministic for a given input.
    pub fn is_retryable(&self) -> bool {
        self.kind() == FoldErrorKind::Timeout
    }
}
