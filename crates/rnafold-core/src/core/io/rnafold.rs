use crate::core::structure::{FoldResult, check_balanced, is_dot_bracket};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OutputParseError {
    #[error("No dot-bracket structure line found in RNAfold output")]
    MissingStructure,

    #[error("No energy value follows structure line '{line}'")]
    MissingEnergy { line: String },

    #[error("Invalid energy value '{value}'")]
    InvalidEnergy { value: String },

    #[error("Structure length {found} does not match sequence length {expected}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("Unbalanced bracket at position {position} in structure '{structure}'")]
    Unbalanced { structure: String, position: usize },
}

/// Parses an RNAfold MFE report into a [`FoldResult`].
///
/// Blank lines, FASTA headers (`>name`) and the echoed sequence are skipped. The
/// first line whose leading token is a dot-bracket string is taken as the
/// structure. Its energy is read from the rest of that line, as in
/// `((((....)))) ( -4.20)`, or, when the line holds only the structure, from the
/// following line in either the `( -4.20)` or the
/// ` minimum free energy =  -4.20 kcal/mol` form.
///
/// # Arguments
///
/// * `text` - The captured standard output of the tool.
/// * `expected_len` - Length of the sequence that was folded.
///
/// # Errors
///
/// Returns an [`OutputParseError`] when no structure or energy can be found,
/// the energy is not a finite number, the structure length differs from
/// `expected_len`, or the brackets do not match.
pub fn parse_mfe_report(text: &str, expected_len: usize) -> Result<FoldResult, OutputParseError> {
    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('>'));

    while let Some(line) = lines.next() {
        let (token, rest) = split_structure(line);
        if !is_dot_bracket(token) {
            continue;
        }

        let energy_text = if rest.is_empty() {
            lines.next().ok_or_else(|| OutputParseError::MissingEnergy {
                line: line.to_string(),
            })?
        } else {
            rest
        };
        let energy = parse_energy(energy_text)?;

        if token.len() != expected_len {
            return Err(OutputParseError::LengthMismatch {
                expected: expected_len,
                found: token.len(),
            });
        }
        check_balanced(token).map_err(|position| OutputParseError::Unbalanced {
            structure: token.to_string(),
            position,
        })?;

        return Ok(FoldResult::new(token, energy));
    }

    Err(OutputParseError::MissingStructure)
}

/// Splits a line into its leading dot-bracket run and the trimmed remainder.
/// The energy may follow the structure directly, as in `((..))(-1.00)`.
fn split_structure(line: &str) -> (&str, &str) {
    let mut end = line
        .find(|c| !matches!(c, '.' | '(' | ')'))
        .unwrap_or(line.len());
    // A structure never ends with `(`; one left over opens the energy.
    if end < line.len() && line[..end].ends_with('(') {
        end -= 1;
    }
    (&line[..end], line[end..].trim())
}

fn parse_energy(text: &str) -> Result<f64, OutputParseError> {
    let value = if let Some(inner) = text
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
    {
        inner.trim()
    } else if let Some((_, rhs)) = text
        .split_once('=')
        .filter(|(lhs, _)| lhs.contains("minimum free energy"))
    {
        rhs.trim().trim_end_matches("kcal/mol").trim()
    } else {
        return Err(OutputParseError::InvalidEnergy {
            value: text.to_string(),
        });
    };

    match value.parse::<f64>() {
        Ok(energy) if energy.is_finite() => Ok(energy),
        _ => Err(OutputParseError::InvalidEnergy {
            value: value.to_string(),
        }),
    }
}
