//! Cipherkey - key validation for classical cipher forms
//!
//! Checks the key a user entered for one of eight classical ciphers
//! against that cipher's constraints before the form is handed to an
//! external encryption service. Text mode works modulo 26; file mode works
//! on bytes (modulo 256) and only offers the byte-capable ciphers.
//!
//! ```
//! use cipherkey::catalog::{AlgorithmId, Mode};
//! use cipherkey::controller::{FormInput, ModeController, SubmitOutcome};
//!
//! let mut form = ModeController::new();
//! form.select_algorithm(Mode::Text, Some(AlgorithmId::Affine));
//!
//! let input = FormInput { key: "4,8", ..Default::default() };
//! match form.submit(&input) {
//!     SubmitOutcome::Cancelled(result) => assert_eq!(result.len(), 1),
//!     SubmitOutcome::Proceed(_) => unreachable!("4 is not coprime with 26"),
//! }
//! ```

#![forbid(unsafe_code)]

pub mod catalog;
pub mod controller;
pub mod determinant;
pub mod error;
pub mod hill;
pub mod key_source;
pub mod number_theory;
pub mod reporter;
pub mod validator;

pub use catalog::{AlgorithmId, Mode};
pub use error::{CipherKeyError, ErrorCategory, ErrorKind, Result};
pub use validator::{FormState, KeyMaterial, ValidationResult, Violation, validate};
