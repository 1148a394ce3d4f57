use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::{OutputFormat, ToolArgs};
use crate::error::{CliError, Result};
use cmdrnafold::FoldConfigBuilder;
use std::time::Duration;

/// Merges command-line flags over the configuration file over built-in defaults.
pub fn build_config(
    args: &ToolArgs,
    jobs: Option<usize>,
    format: Option<OutputFormat>,
) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let tool_file = file_config.tool.take().unwrap_or_default();
    let limits_file = file_config.limits.take().unwrap_or_default();
    let output_file = file_config.output.take().unwrap_or_default();

    let tool_name = args
        .tool
        .clone()
        .or(tool_file.name)
        .unwrap_or(defaults.tool_name);
    let tool_args = tool_file.args.unwrap_or(defaults.tool_args);
    let timeout = seconds(
        "timeout",
        args.timeout
            .or(tool_file.timeout_secs)
            .unwrap_or(defaults.timeout_secs),
    )?;
    let kill_grace = seconds(
        "kill-grace",
        tool_file
            .kill_grace_secs
            .unwrap_or(defaults.kill_grace_secs),
    )?;
    let max_sequence_length = limits_file
        .max_sequence_length
        .unwrap_or(defaults.max_sequence_length);

    let fold = FoldConfigBuilder::new()
        .tool_name(tool_name)
        .tool_args(tool_args)
        .timeout(timeout)
        .kill_grace(kill_grace)
        .max_sequence_length(max_sequence_length)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let jobs = jobs.or(limits_file.jobs).unwrap_or(defaults.jobs);
    if jobs == 0 {
        return Err(CliError::Config("jobs must be at least 1".to_string()));
    }

    Ok(AppConfig {
        fold,
        tool_path: args.tool_path.clone().or(tool_file.path),
        jobs,
        format: format.or(output_file.format).unwrap_or(defaults.format),
    })
}

fn seconds(name: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|_| CliError::Config(format!("Invalid {} of {} seconds", name, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "tool.name" => {
                config.tool.get_or_insert_with(Default::default).name = Some(value_str.to_string());
            }
            "tool.path" => {
                config.tool.get_or_insert_with(Default::default).path = Some(value_str.into());
            }
            "tool.timeout-secs" => {
                config.tool.get_or_insert_with(Default::default).timeout_secs =
                    Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
                    })?);
            }
            "tool.kill-grace-secs" => {
                config.tool.get_or_insert_with(Default::default).kill_grace_secs =
                    Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
                    })?);
            }
            "limits.max-sequence-length" => {
                config
                    .limits
                    .get_or_insert_with(Default::default)
                    .max_sequence_length = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                })?);
            }
            "limits.jobs" => {
                config.limits.get_or_insert_with(Default::default).jobs =
                    Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                    })?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
