use std::fmt;

/// Outcome of an advisory artifact check.
///
/// Generators always produce output. Whether that output is consistent is a separate question
/// answered by the `validate_*` functions, which return this report instead of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ArtifactReport {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Concatenates two reports, prefixing the errors of `other` with `label`.
    pub fn merge(&mut self, label: &str, other: Self) {
        self.valid &= other.valid;
        self.errors
            .extend(other.errors.into_iter().map(|e| format!("{label}: {e}")));
    }
}

impl fmt::Display for ArtifactReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            return f.write_str("valid");
        }
        write!(f, "{} problem(s)", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}
