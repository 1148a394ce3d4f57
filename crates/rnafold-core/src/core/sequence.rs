use std::fmt;
use thiserror::Error;

/// Upper bound on accepted sequence length unless configured otherwise.
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 10_000;

const NUCLEOTIDES: [u8; 4] = *b"AUGC";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Sequence must be a non-empty string")]
    Empty,

    #[error(
        "Invalid nucleotide {character:?} at position {position}. Only A, U, G, C allowed."
    )]
    InvalidNucleotide { character: char, position: usize },

    #[error("Sequence length {length} exceeds the maximum of {max}")]
    TooLong { length: usize, max: usize },
}

/// A validated RNA sequence over the alphabet {A, U, G, C}.
///
/// Lowercase nucleotides are accepted and normalized to uppercase; every other
/// character (whitespace, `T`, IUPAC codes, punctuation) is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sequence(String);

impl Sequence {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        Self::with_max_length(raw, DEFAULT_MAX_SEQUENCE_LENGTH)
    }

    pub fn with_max_length(raw: &str, max: usize) -> Result<Self, ValidationError> {
        if raw.is_empty() {
            return Err(ValidationError::Empty);
        }

        let length = raw.chars().count();
        if length > max {
            return Err(ValidationError::TooLong { length, max });
        }

        let mut normalized = String::with_capacity(raw.len());
        for (position, character) in raw.chars().enumerate() {
            let upper = character.to_ascii_uppercase();
            if !upper.is_ascii() || !NUCLEOTIDES.contains(&(upper as u8)) {
                return Err(ValidationError::InvalidNucleotide {
                    character,
                    position,
                });
            }
            normalized.push(upper);
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Short form used in runner representations: the first 20 nucleotides,
    /// followed by `...` when the sequence is longer.
    pub fn preview(&self) -> String {
        const PREVIEW_LEN: usize = 20;
        if self.0.len() > PREVIEW_LEN {
            format!("{}...", &self.0[..PREVIEW_LEN])
        } else {
            self.0.clone()
        }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Sequence {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Sequence {
    type Error = ValidationError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl std::str::FromStr for Sequence {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::new(raw)
    }
}
