//! Where the command line gets key text and key-file previews from

use crate::error::{CipherKeyError, ErrorCategory, ErrorKind, Result};
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::Path;
use zeroize::Zeroizing;

/// Number of characters shown when previewing a key file.
pub const PREVIEW_CHARS: usize = 200;

/// Trait for reading key text from various sources
pub trait KeyReader {
    /// Read the key as UTF-8 text.
    ///
    /// The key is wrapped in `Zeroizing` so it is wiped from memory when
    /// dropped.
    fn read_key(&mut self) -> Result<Zeroizing<String>>;
}

/// Returns a fixed key (for testing)
pub struct ConstantKeyReader {
    key: Zeroizing<String>,
}

impl ConstantKeyReader {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Zeroizing::new(key.into()),
        }
    }
}

impl KeyReader for ConstantKeyReader {
    fn read_key(&mut self) -> Result<Zeroizing<String>> {
        Ok(self.key.clone())
    }
}

/// Reads the key from any io::Read source, such as piped stdin.
///
/// A single trailing line ending is dropped.
pub struct ReaderKeyReader {
    reader: Box<dyn Read>,
}

impl ReaderKeyReader {
    pub fn new(reader: Box<dyn Read>) -> Self {
        Self { reader }
    }
}

impl KeyReader for ReaderKeyReader {
    fn read_key(&mut self) -> Result<Zeroizing<String>> {
        let mut data = Zeroizing::new(Vec::new());
        self.reader.read_to_end(&mut data).map_err(|e| {
            CipherKeyError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("error reading key: {}", e),
                e,
            )
        })?;
        let text = std::str::from_utf8(&data).map_err(|e| {
            CipherKeyError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::KeyUnavailable,
                "key is not valid UTF-8",
                e,
            )
        })?;
        let text = text
            .strip_suffix('\n')
            .map(|t| t.strip_suffix('\r').unwrap_or(t))
            .unwrap_or(text);
        Ok(Zeroizing::new(text.to_owned()))
    }
}

/// Reads the key from the terminal with no echo
pub struct TerminalKeyReader;

impl TerminalKeyReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalKeyReader {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyReader for TerminalKeyReader {
    fn read_key(&mut self) -> Result<Zeroizing<String>> {
        if !io::stdin().is_terminal() {
            return Err(CipherKeyError::with_kind(
                ErrorCategory::User,
                ErrorKind::KeyUnavailable,
                "cannot prompt for key - stdin is not a terminal",
            ));
        }

        io::stderr().write_all(b"Key (cipherkey): ").map_err(|e| {
            CipherKeyError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("failed to write prompt: {}", e),
                e,
            )
        })?;
        io::stderr().flush().map_err(|e| {
            CipherKeyError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("failed to flush prompt: {}", e),
                e,
            )
        })?;

        // rpassword hands back a plain String; move it straight into Zeroizing
        let key = rpassword::read_password().map_err(|e| {
            CipherKeyError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::KeyUnavailable,
                format!("failure reading key: {}", e),
                e,
            )
        })?;

        Ok(Zeroizing::new(key))
    }
}

/// Checks that a selected file exists, returning its display name.
///
/// Only presence matters; the contents are left to the encryption service.
pub fn require_file(path: &Path) -> Result<String> {
    fs::metadata(path).map_err(|e| read_error(path, e))?;
    Ok(path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string()))
}

/// First [`PREVIEW_CHARS`] characters of a key file, decoded lossily.
pub fn preview_key_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| read_error(path, e))?;
    Ok(String::from_utf8_lossy(&bytes)
        .chars()
        .take(PREVIEW_CHARS)
        .collect())
}

fn read_error(path: &Path, err: io::Error) -> CipherKeyError {
    let category = if err.kind() == io::ErrorKind::NotFound {
        ErrorCategory::User
    } else {
        ErrorCategory::Internal
    };
    CipherKeyError::with_kind_and_source(
        category,
        ErrorKind::Io,
        format!("failed to read from {}", path.display()),
        err,
    )
}
