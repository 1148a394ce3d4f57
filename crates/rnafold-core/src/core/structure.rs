use serde::Serialize;
use std::fmt;

/// A predicted secondary structure together with its free energy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoldResult {
    /// Dot-bracket notation, one character per nucleotide.
    pub structure: String,
    /// Minimum free energy in kcal/mol.
    pub energy: f64,
}

impl FoldResult {
    pub fn new(structure: impl Into<String>, energy: f64) -> Self {
        Self {
            structure: structure.into(),
            energy,
        }
    }

    pub fn len(&self) -> usize {
        self.structure.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structure.is_empty()
    }

    /// Number of base pairs in the structure.
    pub fn pair_count(&self) -> usize {
        self.structure.bytes().filter(|&b| b == b'(').count()
    }

    pub fn into_tuple(self) -> (String, f64) {
        (self.structure, self.energy)
    }
}

impl From<FoldResult> for (String, f64) {
    fn from(result: FoldResult) -> Self {
        result.into_tuple()
    }
}

impl fmt::Display for FoldResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:6.2})", self.structure, self.energy)
    }
}

/// Returns true when `token` is non-empty and made only of `(`, `)` and `.`.
pub fn is_dot_bracket(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| matches!(b, b'(' | b')' | b'.'))
}

/// Checks that every `(` has a matching `)`.
///
/// Returns the 0-based position of the first offending bracket on failure: an
/// unexpected `)` or, when openers remain at the end, the last unclosed `(`.
pub fn check_balanced(structure: &str) -> Result<(), usize> {
    let mut open = Vec::new();
    for (i, b) in structure.bytes().enumerate() {
        match b {
            b'(' => open.push(i),
            b')' => {
                if open.pop().is_none() {
                    return Err(i);
                }
            }
            _ => {}
        }
    }
    match open.pop() {
        Some(i) => Err(i),
        None => Ok(()),
    }
}
