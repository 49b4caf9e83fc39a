//! Per-algorithm key rules
//!
//! [`validate`] evaluates every rule that applies to the current form and
//! collects every violation; it never stops at the first one. Nothing is
//! cached between runs: callers build a fresh [`FormState`] from the
//! current input each time.

use crate::catalog::{AlgorithmId, Mode};
use crate::determinant::{Determinant, determinant};
use crate::error::ErrorKind;
use crate::hill::{ENTRY_MAX, ENTRY_MIN, HillMatrix};
use crate::number_theory::{BYTE_MODULUS, TEXT_MODULUS, is_coprime};
use log::debug;
use std::collections::HashSet;
use std::fmt;
use zeroize::Zeroizing;

/// The key as entered: trimmed key text, an optional key file and, for
/// Hill, the matrix grid.
#[derive(Clone, Default)]
pub struct KeyMaterial {
    key: Zeroizing<String>,
    key_file: Option<String>,
    hill: Option<HillMatrix>,
}

impl KeyMaterial {
    /// Surrounding whitespace is dropped before any rule sees the key.
    pub fn new(key: &str) -> Self {
        Self {
            key: Zeroizing::new(key.trim().to_owned()),
            key_file: None,
            hill: None,
        }
    }

    /// Marks a key file as selected. Only its name is kept; the contents
    /// belong to the encryption service.
    pub fn with_key_file(mut self, name: impl Into<String>) -> Self {
        self.key_file = Some(name.into());
        self
    }

    pub fn with_hill(mut self, matrix: HillMatrix) -> Self {
        self.hill = Some(matrix);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn key_file(&self) -> Option<&str> {
        self.key_file.as_deref()
    }

    pub fn hill(&self) -> Option<&HillMatrix> {
        self.hill.as_ref()
    }

    fn has_key_or_key_file(&self) -> bool {
        !self.key.is_empty() || self.key_file.is_some()
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("key", &format_args!("<{} chars>", self.key.chars().count()))
            .field("key_file", &self.key_file)
            .field("hill", &self.hill)
            .finish()
    }
}

/// Snapshot of everything the rules read, taken at submit time.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub mode: Mode,
    pub algorithm: Option<AlgorithmId>,
    pub key: KeyMaterial,
    /// Name of the selected data file (file mode). Never opened here.
    pub data_file: Option<String>,
}

impl FormState {
    pub fn new(mode: Mode, algorithm: Option<AlgorithmId>, key: KeyMaterial) -> Self {
        Self {
            mode,
            algorithm,
            key,
            data_file: None,
        }
    }

    pub fn with_data_file(mut self, name: impl Into<String>) -> Self {
        self.data_file = Some(name.into());
        self
    }

    pub fn data_file_provided(&self) -> bool {
        self.data_file.is_some()
    }
}

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ErrorKind,
    pub message: String,
}

/// Every violation found in one run, in rule order. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    violations: Vec<Violation>,
}

impl ValidationResult {
    /// True when no rule failed; the form may be submitted.
    pub fn is_valid(&self) -> bool {
        self.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.message.as_str())
    }

    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.violations.iter().map(|v| v.kind).collect()
    }

    pub fn has(&self, kind: ErrorKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }

    fn push(&mut self, kind: ErrorKind, message: impl Into<String>) {
        self.violations.push(Violation {
            kind,
            message: message.into(),
        });
    }
}

impl IntoIterator for ValidationResult {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

/// Runs every rule applicable to `form` and returns all violations.
pub fn validate(form: &FormState) -> ValidationResult {
    let mut result = ValidationResult::default();

    if form.algorithm.is_none() {
        result.push(ErrorKind::MissingSelection, "Please select an algorithm.");
    }

    match form.mode {
        Mode::Text => {
            if let Some(algorithm) = form.algorithm {
                check_text(algorithm, &form.key, &mut result);
            }
        }
        Mode::File => {
            if !form.data_file_provided() {
                result.push(
                    ErrorKind::MissingInput,
                    "Please choose a file to encrypt/decrypt in file mode.",
                );
            }
            if let Some(algorithm) = form.algorithm {
                check_file(algorithm, &form.key, &mut result);
            }
        }
    }

    debug!(
        "validated {} key in {} mode: {} violation(s)",
        form.algorithm.map_or("<none>", AlgorithmId::as_str),
        form.mode,
        result.len()
    );
    result
}

fn check_text(algorithm: AlgorithmId, key: &KeyMaterial, result: &mut ValidationResult) {
    let text = key.key();
    match algorithm {
        AlgorithmId::Shift => {
            if !is_integer(text) {
                result.push(
                    ErrorKind::FormatError,
                    "Shift key must be an integer (example: 3).",
                );
            }
        }
        AlgorithmId::Substitution => check_substitution(text, result),
        AlgorithmId::Affine => check_affine(text, Mode::Text, result),
        AlgorithmId::Vigenere => {
            if !is_letters(text) {
                result.push(
                    ErrorKind::FormatError,
                    "Vigenere key must contain letters only (A-Z).",
                );
            }
        }
        AlgorithmId::Playfair => {
            if !is_letters(text) {
                result.push(
                    ErrorKind::FormatError,
                    "Playfair key must contain letters only (A-Z).",
                );
            }
        }
        AlgorithmId::Hill => check_hill(key.hill(), result),
        AlgorithmId::Permutation => check_permutation(text, result),
        AlgorithmId::Otp => check_otp(key, result),
    }
}

fn check_file(algorithm: AlgorithmId, key: &KeyMaterial, result: &mut ValidationResult) {
    if !algorithm.supports(Mode::File) {
        result.push(
            ErrorKind::ModeUnsupported,
            format!("Algorithm \"{}\" does not support file mode.", algorithm),
        );
        return;
    }

    match algorithm {
        AlgorithmId::Affine => check_affine(key.key(), Mode::File, result),
        AlgorithmId::Otp => check_otp(key, result),
        _ => {
            // The byte-level meaning of these keys is up to the service.
            if !key.has_key_or_key_file() {
                result.push(
                    ErrorKind::MissingInput,
                    "Key required for this algorithm in file mode (text input or key file).",
                );
            }
        }
    }
}

fn check_substitution(key: &str, result: &mut ValidationResult) {
    if key.len() != 26 || !is_letters(key) {
        result.push(
            ErrorKind::FormatError,
            "Substitution key must be 26 letters A-Z.",
        );
        return;
    }
    let mut seen = HashSet::new();
    if !key.bytes().all(|b| seen.insert(b.to_ascii_uppercase())) {
        result.push(
            ErrorKind::UniquenessError,
            "Substitution key letters must be unique (each of A-Z exactly once).",
        );
    }
}

fn check_affine(key: &str, mode: Mode, result: &mut ValidationResult) {
    let Some((a, _b)) = parse_affine(key) else {
        result.push(
            ErrorKind::FormatError,
            "Affine key must be two integers separated by comma, e.g. 5,8.",
        );
        return;
    };
    let modulus = match mode {
        Mode::Text => TEXT_MODULUS,
        Mode::File => BYTE_MODULUS,
    };
    if !is_coprime(a, modulus) {
        result.push(
            ErrorKind::RangeError,
            format!(
                "For affine {}-mode, a must be coprime with {}.",
                mode, modulus
            ),
        );
    }
}

fn parse_affine(key: &str) -> Option<(i64, i64)> {
    let mut parts = key.split(',');
    let (a, b) = (parts.next()?, parts.next()?);
    if parts.next().is_some() || !is_integer(a) || !is_integer(b) {
        return None;
    }
    Some((a.parse().ok()?, b.parse().ok()?))
}

fn check_hill(matrix: Option<&HillMatrix>, result: &mut ValidationResult) {
    let values = matrix.map(HillMatrix::filled_values).unwrap_or_default();
    if values.is_empty() {
        result.push(
            ErrorKind::MissingInput,
            "Hill key matrix required (enter numbers in the grid).",
        );
        return;
    }

    let n = values.len().isqrt();
    if n * n != values.len() {
        result.push(ErrorKind::FormatError, "Hill key matrix must be n*n.");
        return;
    }
    // A partly filled grid can still hold a square number of values; the
    // order comes from the grid, never from the count.
    if let Some(order) = matrix.map(HillMatrix::order).filter(|&order| order != n) {
        result.push(
            ErrorKind::FormatError,
            format!("Hill key matrix is incomplete: fill all {order}x{order} cells."),
        );
        return;
    }

    let parsed: Vec<HillEntry> = values.iter().map(|v| HillEntry::parse(v)).collect();
    if parsed.contains(&HillEntry::NotInteger) {
        result.push(
            ErrorKind::FormatError,
            "Hill key matrix entries must be integers.",
        );
    }
    let entries: Vec<i32> = parsed
        .iter()
        .filter_map(|e| match e {
            HillEntry::Value(v) => Some(*v),
            _ => None,
        })
        .collect();
    let too_large = parsed.contains(&HillEntry::Overflow);
    if too_large || entries.iter().any(|e| !(ENTRY_MIN..=ENTRY_MAX).contains(e)) {
        result.push(
            ErrorKind::RangeError,
            "Hill key matrix entries must be between 0 and 25.",
        );
    }
    if entries.len() != n * n {
        return;
    }

    let rows: Vec<Vec<i32>> = entries.chunks(n).map(<[i32]>::to_vec).collect();
    match determinant(&rows) {
        Determinant::Value(det) => {
            let det_mod = det.rem_euclid(i128::from(TEXT_MODULUS));
            // det_mod < 26, so the narrowing is lossless
            if !is_coprime(det_mod as i64, TEXT_MODULUS) {
                result.push(
                    ErrorKind::RangeError,
                    "Hill key matrix determinant must be invertible mod 26 (gcd(det,26)=1).",
                );
            }
        }
        Determinant::Unsupported { order } => {
            debug!("skipping invertibility check for {order}x{order} Hill matrix");
        }
    }
}

/// One Hill cell after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HillEntry {
    Value(i32),
    /// A well-formed integer too large for any key entry.
    Overflow,
    NotInteger,
}

impl HillEntry {
    fn parse(value: &str) -> Self {
        match value.parse() {
            Ok(v) => HillEntry::Value(v),
            Err(_) if is_integer(value) => HillEntry::Overflow,
            Err(_) => HillEntry::NotInteger,
        }
    }
}

fn check_permutation(key: &str, result: &mut ValidationResult) {
    let tokens: Vec<&str> = key.split(',').collect();
    if !tokens.iter().all(|t| is_digits(t)) {
        result.push(
            ErrorKind::FormatError,
            "Permutation key must be comma-separated integers like \"2,0,1\".",
        );
        return;
    }

    let k = tokens.len();
    // Compare digit strings without leading zeros so huge values need no parse.
    let mut seen = HashSet::new();
    if !tokens
        .iter()
        .all(|t| seen.insert(t.trim_start_matches('0')))
    {
        result.push(ErrorKind::UniquenessError, "Permutation indices must be unique.");
    }
    for token in &tokens {
        let in_range = token.parse::<usize>().is_ok_and(|v| v < k);
        if !in_range {
            result.push(
                ErrorKind::RangeError,
                format!(
                    "Permutation indices must be in range 0..k-1 (got {}, k={}).",
                    token, k
                ),
            );
        }
    }
}

fn check_otp(key: &KeyMaterial, result: &mut ValidationResult) {
    if !key.has_key_or_key_file() {
        result.push(
            ErrorKind::MissingInput,
            "For OTP you must provide a key or upload a key file.",
        );
    }
    if !key.key().is_empty() && !is_letters(key.key()) {
        result.push(
            ErrorKind::FormatError,
            "OTP key (if entered directly) must contain letters A-Z only.",
        );
    }
}

/// One or more ASCII letters.
fn is_letters(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphabetic())
}

/// One or more ASCII digits.
fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Decimal integer with an optional leading minus.
fn is_integer(s: &str) -> bool {
    is_digits(s.strip_prefix('-').unwrap_or(s))
}
