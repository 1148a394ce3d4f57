use crate::core::sequence::DEFAULT_MAX_SEQUENCE_LENGTH;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_TOOL_NAME: &str = "RNAfold";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_KILL_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FoldConfig {
    /// Executable name resolved by the tool locator.
    pub tool_name: String,
    /// Arguments passed before the sequence is written to stdin.
    pub tool_args: Vec<String>,
    pub timeout: Duration,
    /// Time allowed between SIGTERM and a forced kill.
    pub kill_grace: Duration,
    pub max_sequence_length: usize,
}

impl Default for FoldConfig {
    fn default() -> Self {
        Self {
            tool_name: DEFAULT_TOOL_NAME.to_string(),
            tool_args: vec!["--noPS".to_string()],
            timeout: DEFAULT_TIMEOUT,
            kill_grace: DEFAULT_KILL_GRACE,
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
        }
    }
}

impl FoldConfig {
    /// The command as it would be typed, used for hashing and display.
    pub fn command_line(&self) -> String {
        std::iter::once(self.tool_name.as_str())
            .chain(self.tool_args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Default)]
pub struct FoldConfigBuilder {
    tool_name: Option<String>,
    tool_args: Option<Vec<String>>,
    timeout: Option<Duration>,
    kill_grace: Option<Duration>,
    max_sequence_length: Option<usize>,
}

impl FoldConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool_name(mut self, name: impl Into<String>) -> Self {
        self.tool_name = Some(name.into());
        self
    }
    pub fn tool_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tool_args = Some(args.into_iter().map(Into::into).collect());
        self
    }
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
    pub fn kill_grace(mut self, grace: Duration) -> Self {
        self.kill_grace = Some(grace);
        self
    }
    pub fn max_sequence_length(mut self, max: usize) -> Self {
        self.max_sequence_length = Some(max);
        self
    }

    pub fn build(self) -> Result<FoldConfig, ConfigError> {
        let defaults = FoldConfig::default();

        let tool_name = self.tool_name.unwrap_or(defaults.tool_name);
        if tool_name.trim().is_empty() {
            return Err(ConfigError::InvalidParameter {
                parameter: "tool_name",
                reason: "must not be empty",
            });
        }

        let timeout = self.timeout.unwrap_or(defaults.timeout);
        if timeout.is_zero() {
            return Err(ConfigError::InvalidParameter {
                parameter: "timeout",
                reason: "must be greater than zero",
            });
        }

        let max_sequence_length = self
            .max_sequence_length
            .unwrap_or(defaults.max_sequence_length);
        if max_sequence_length == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "max_sequence_length",
                reason: "must be greater than zero",
            });
        }

        Ok(FoldConfig {
            tool_name,
            tool_args: self.tool_args.unwrap_or(defaults.tool_args),
            timeout,
            kill_grace: self.kill_grace.unwrap_or(defaults.kill_grace),
            max_sequence_length,
        })
    }
}
