//! Order-preserving accumulator for recoverable per-file errors.
//!
//! A `Diagnostics` value is created by the caller, threaded through rule
//! evaluation by `&mut`, and handed back for logging once the batch is done.
//! Entries are never dropped or reordered.

use std::fmt;

use crate::error::LintError;

#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<LintError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: LintError) {
        self.errors.push(error);
    }

    pub fn all(&self) -> &[LintError] {
        &self.errors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LintError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Extend<LintError> for Diagnostics {
    fn extend<T: IntoIterator<Item = LintError>>(&mut self, iter: T) {
        self.errors.extend(iter);
    }
}

impl IntoIterator for Diagnostics {
    type Item = LintError;
    type IntoIter = std::vec::IntoIter<LintError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a LintError;
    type IntoIter = std::slice::Iter<'a, LintError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.len() {
            0 => write!(f, "no errors occurred"),
            1 => write!(f, "1 error occurred:\n\t* {}", self.errors[0]),
            n => {
                write!(f, "{n} errors occurred:")?;
                for err in &self.errors {
                    write!(f, "\n\t* {err}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Diagnostics {}
