use thiserror::Error;

/// One sequence to fold, as read from the command line or an input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    pub name: Option<String>,
    pub raw: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Line {line}: sequence data before the first FASTA header")]
    SequenceBeforeHeader { line: usize },
    #[error("Input contains no sequences")]
    Empty,
}

/// Parses FASTA or plain text with one sequence per line.
///
/// The input is treated as FASTA when its first non-blank line starts with `>`;
/// sequence lines under a header are concatenated. In plain text, blank lines
/// and lines starting with `#` are skipped. Sequences are not validated here.
pub fn parse_records(text: &str) -> Result<Vec<InputRecord>, InputError> {
    let is_fasta = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .is_some_and(|line| line.starts_with('>'));

    let records = if is_fasta {
        parse_fasta(text)?
    } else {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| InputRecord {
                name: None,
                raw: line.to_string(),
            })
            .collect()
    };

    if records.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(records)
}

fn parse_fasta(text: &str) -> Result<Vec<InputRecord>, InputError> {
    let mut records: Vec<InputRecord> = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('>') {
            let name = header.split_whitespace().next().unwrap_or_default();
            records.push(InputRecord {
                name: (!name.is_empty()).then(|| name.to_string()),
                raw: String::new(),
            });
        } else {
            let Some(current) = records.last_mut() else {
                return Err(InputError::SequenceBeforeHeader { line: index + 1 });
            };
            current.raw.push_str(line);
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_yields_one_record_per_line() {
        let records = parse_records("AUGC\n\n# comment\n  gggaaaccc  \n").unwrap();
        assert_eq!(
            records,
            vec![
                InputRecord { name: None, raw: "AUGC".into() },
                InputRecord { name: None, raw: "gggaaaccc".into() },
            ]
        );
    }

    #[test]
    fn fasta_concatenates_wrapped_sequences() {
        let text = ">hairpin some description\nGGGAAA\nCCC\n\n>short\nAUGC\n";
        let records = parse_records(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name.as_deref(), Some("hairpin"));
        assert_eq!(records[0].raw, "GGGAAACCC");
        assert_eq!(records[1].name.as_deref(), Some("short"));
        assert_eq!(records[1].raw, "AUGC");
    }

    #[test]
    fn fasta_header_without_sequence_keeps_empty_record() {
        let records = parse_records(">empty\n>full\nAU\n").unwrap();
        assert_eq!(records[0].raw, "");
        assert_eq!(records[1].raw, "AU");
    }

    #[test]
    fn anonymous_fasta_header_has_no_name() {
        let records = parse_records(">\nAUGC\n").unwrap();
        assert_eq!(records[0].name, None);
    }

    #[test]
    fn blank_input_is_an_error() {
        assert_eq!(parse_records(""), Err(InputError::Empty));
        assert_eq!(parse_records("\n# only comments\n"), Err(InputError::Empty));
    }

    #[test]
    fn fasta_reports_stray_sequence_lines() {
        let text = "\n>a\nAU\n";
        assert!(parse_records(text).is_ok());
        assert_eq!(
            parse_fasta("AU\n>a\nGC\n"),
            Err(InputError::SequenceBeforeHeader { line: 1 })
        );
    }
}
