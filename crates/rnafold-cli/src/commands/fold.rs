use crate::cli::{FoldArgs, OutputFormat};
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::input::{InputRecord, parse_records};
use crate::utils::output::{FoldRecord, write_records};
use crate::utils::progress::CliProgressHandler;
use cmdrnafold::engine::progress::ProgressReporter;
use cmdrnafold::workflows::batch::fold_all;
use cmdrnafold::{FoldError, FoldResult, Sequence};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

pub async fn run(args: FoldArgs, show_progress: bool) -> Result<()> {
    let app_config = build_config(&args.tool, args.jobs, args.format)?;
    debug!("Resolved configuration: {:?}", app_config);
    let context = app_config.context();

    let mut inputs: Vec<InputRecord> = args
        .sequences
        .iter()
        .map(|raw| InputRecord {
            name: None,
            raw: raw.clone(),
        })
        .collect();
    if let Some(path) = &args.input {
        inputs.extend(read_input(path)?);
    }
    info!("Collected {} sequence(s).", inputs.len());

    let mut outcomes: Vec<Option<std::result::Result<FoldResult, FoldError>>> =
        Vec::with_capacity(inputs.len());
    let mut shown: Vec<String> = Vec::with_capacity(inputs.len());
    let mut pending: Vec<(usize, Sequence)> = Vec::new();
    for (index, input) in inputs.iter().enumerate() {
        match context.validate(&input.raw) {
            Ok(sequence) => {
                shown.push(sequence.to_string());
                pending.push((index, sequence));
                outcomes.push(None);
            }
            Err(e) => {
                warn!("Skipping sequence #{}: {}", index + 1, e);
                shown.push(input.raw.clone());
                outcomes.push(Some(Err(e)));
            }
        }
    }

    if !pending.is_empty() {
        let program = context.locate()?;
        info!("Using {:?}", program);
    }

    let handler = if show_progress && pending.len() > 1 {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    let reporter = ProgressReporter::with_callback(handler.get_callback());

    let (indices, sequences): (Vec<usize>, Vec<Sequence>) = pending.into_iter().unzip();
    let folded = fold_all(&context, sequences, app_config.jobs, &reporter).await;
    for (index, result) in indices.into_iter().zip(folded) {
        outcomes[index] = Some(result);
    }

    let records: Vec<FoldRecord> = inputs
        .into_iter()
        .zip(shown)
        .zip(outcomes)
        .map(|((input, sequence), outcome)| {
            let outcome = outcome.unwrap_or_else(|| {
                Err(FoldError::Execution {
                    message: "Sequence was not folded".to_string(),
                    exit_code: None,
                    stderr: String::new(),
                })
            });
            FoldRecord::new(input.name, sequence, &outcome)
        })
        .collect();

    write_output(&records, app_config.format, args.output.as_deref())?;

    let failed = records.iter().filter(|r| r.is_failure()).count();
    if failed > 0 {
        return Err(CliError::PartialFailure {
            failed,
            total: records.len(),
        });
    }
    info!("Folded {} sequence(s).", records.len());
    Ok(())
}

fn read_input(path: &Path) -> Result<Vec<InputRecord>> {
    info!("Reading sequences from {:?}", path);
    let text = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    parse_records(&text).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

fn write_output(
    records: &[FoldRecord],
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    match output {
        Some(path) => {
            info!("Writing results to {:?}", path);
            let mut writer = BufWriter::new(File::create(path)?);
            write_records(records, format, &mut writer)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_records(records, format, &mut writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}
