use crate::cli::OutputFormat;
use cmdrnafold::engine::config::{DEFAULT_KILL_GRACE, DEFAULT_TIMEOUT, DEFAULT_TOOL_NAME};
use cmdrnafold::core::sequence::DEFAULT_MAX_SEQUENCE_LENGTH;

pub struct DefaultsConfig {
    pub tool_name: String,
    pub tool_args: Vec<String>,
    pub timeout_secs: f64,
    pub kill_grace_secs: f64,
    pub max_sequence_length: usize,
    pub jobs: usize,
    pub format: OutputFormat,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            tool_name: DEFAULT_TOOL_NAME.to_string(),
            tool_args: vec!["--noPS".to_string()],
            timeout_secs: DEFAULT_TIMEOUT.as_secs_f64(),
            kill_grace_secs: DEFAULT_KILL_GRACE.as_secs_f64(),
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
            jobs: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            format: OutputFormat::Text,
        }
    }
}
