//! Turns a validation run into a proceed/cancel decision

use crate::catalog::{AlgorithmId, Mode};
use crate::validator::{FormState, ValidationResult};
use log::{info, warn};
use std::fmt;
use zeroize::Zeroizing;

/// Holds the error list currently shown to the user.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    displayed: Vec<String>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows the violations of `result` and returns false, or clears any
    /// previously shown errors and returns true when there are none.
    ///
    /// A false return obliges the caller to cancel the pending submission
    /// before it takes effect.
    pub fn report(&mut self, result: &ValidationResult) -> bool {
        self.displayed = result.messages().map(str::to_owned).collect();
        if self.displayed.is_empty() {
            true
        } else {
            warn!("submission cancelled: {} violation(s)", self.displayed.len());
            false
        }
    }

    pub fn is_visible(&self) -> bool {
        !self.displayed.is_empty()
    }

    pub fn displayed(&self) -> &[String] {
        &self.displayed
    }

    /// Bullet list, one violation per line.
    pub fn render(&self) -> String {
        self.displayed
            .iter()
            .map(|e| format!("• {}", e))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The validated fields handed to the encryption service.
#[derive(Clone, PartialEq, Eq)]
pub struct Submission {
    pub mode: Mode,
    pub algorithm: AlgorithmId,
    pub key: Zeroizing<String>,
    pub key_file: Option<String>,
    pub data_file: Option<String>,
    /// Hill cells in row-major order; empty for every other algorithm.
    pub hill_entries: Vec<String>,
}

impl Submission {
    /// Returns `None` when no algorithm is selected.
    pub(crate) fn from_form(form: &FormState) -> Option<Self> {
        let algorithm = form.algorithm?;
        let hill_entries = match (algorithm, form.key.hill()) {
            (AlgorithmId::Hill, Some(matrix)) => matrix
                .cells()
                .iter()
                .map(|c| c.trim().to_owned())
                .collect(),
            _ => Vec::new(),
        };
        info!("submission allowed: {} in {} mode", algorithm, form.mode);
        Some(Self {
            mode: form.mode,
            algorithm,
            key: Zeroizing::new(form.key.key().to_owned()),
            key_file: form.key.key_file().map(str::to_owned),
            data_file: form.data_file.clone(),
            hill_entries,
        })
    }
}

impl fmt::Debug for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submission")
            .field("mode", &self.mode)
            .field("algorithm", &self.algorithm)
            .field("key", &format_args!("<{} chars>", self.key.chars().count()))
            .field("key_file", &self.key_file)
            .field("data_file", &self.data_file)
            .field("hill_entries", &self.hill_entries)
            .finish()
    }
}
