use crate::cli::OutputFormat;
use crate::error::{CliError, Result};
use cmdrnafold::{FoldError, FoldResult};
use serde::Serialize;
use std::io::Write;

/// One line of the report: a folded sequence or the reason it was not folded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoldRecord {
    pub name: Option<String>,
    pub sequence: String,
    pub structure: Option<String>,
    pub energy: Option<f64>,
    pub error_kind: Option<String>,
    pub error: Option<String>,
}

impl FoldRecord {
    pub fn new(
        name: Option<String>,
        sequence: String,
        outcome: &std::result::Result<FoldResult, FoldError>,
    ) -> Self {
        let mut record = Self {
            name,
            sequence,
            structure: None,
            energy: None,
            error_kind: None,
            error: None,
        };
        match outcome {
            Ok(result) => {
                record.structure = Some(result.structure.clone());
                record.energy = Some(result.energy);
            }
            Err(e) => {
                record.error_kind = Some(e.kind().to_string());
                record.error = Some(e.to_string());
            }
        }
        record
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

pub fn write_records(
    records: &[FoldRecord],
    format: OutputFormat,
    writer: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(records, writer),
        OutputFormat::Json => write_json(records, writer),
        OutputFormat::Csv => write_csv(records, writer),
    }
}

fn write_text(records: &[FoldRecord], writer: &mut dyn Write) -> Result<()> {
    for record in records {
        if let Some(name) = &record.name {
            writeln!(writer, ">{}", name)?;
        }
        writeln!(writer, "{}", record.sequence)?;
        match (&record.structure, record.energy, &record.error) {
            (Some(structure), Some(energy), _) => {
                writeln!(writer, "{}", FoldResult::new(structure.clone(), energy))?
            }
            (_, _, Some(error)) => writeln!(writer, "error: {}", error)?,
            _ => {}
        }
    }
    Ok(())
}

fn write_json(records: &[FoldRecord], writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, records)
        .map_err(|e| CliError::Output(e.to_string()))?;
    writeln!(writer)?;
    Ok(())
}

fn write_csv(records: &[FoldRecord], writer: &mut dyn Write) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer
            .serialize(record)
            .map_err(|e| CliError::Output(e.to_string()))?;
    }
    csv_writer.flush()?;
    Ok(())
}
