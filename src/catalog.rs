//! Input modes, algorithm identifiers and their static descriptions

use crate::error::{CipherKeyError, ErrorCategory, ErrorKind};
use std::fmt;
use std::str::FromStr;

/// How the data to be processed is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Letters typed into the form, keys work modulo 26.
    #[default]
    Text,
    /// An uploaded file, keys work on bytes (modulo 256).
    File,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Text, Mode::File];

    /// Discriminator value handed to the encryption service.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Text => "text",
            Mode::File => "file",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = CipherKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Mode::Text),
            "file" => Ok(Mode::File),
            other => Err(CipherKeyError::with_kind(
                ErrorCategory::User,
                ErrorKind::UnknownMode,
                format!("unknown mode \"{}\" (expected \"text\" or \"file\")", other),
            )),
        }
    }
}

/// The closed set of classical ciphers the form offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmId {
    Shift,
    Substitution,
    Affine,
    Vigenere,
    Hill,
    Permutation,
    Otp,
    Playfair,
}

impl AlgorithmId {
    /// Catalog order, which is also the order algorithms are offered in.
    pub const ALL: [AlgorithmId; 8] = [
        AlgorithmId::Shift,
        AlgorithmId::Substitution,
        AlgorithmId::Affine,
        AlgorithmId::Vigenere,
        AlgorithmId::Hill,
        AlgorithmId::Permutation,
        AlgorithmId::Otp,
        AlgorithmId::Playfair,
    ];

    /// Identifier handed to the encryption service.
    pub fn as_str(self) -> &'static str {
        match self {
            AlgorithmId::Shift => "shift",
            AlgorithmId::Substitution => "substitution",
            AlgorithmId::Affine => "affine",
            AlgorithmId::Vigenere => "vigenere",
            AlgorithmId::Hill => "hill",
            AlgorithmId::Permutation => "permutation",
            AlgorithmId::Otp => "otp",
            AlgorithmId::Playfair => "playfair",
        }
    }

    pub fn display_name(self) -> &'static str {
        entry(self).name
    }

    pub fn help_text(self) -> &'static str {
        entry(self).help
    }

    pub fn supported_modes(self) -> &'static [Mode] {
        entry(self).modes
    }

    pub fn supports(self, mode: Mode) -> bool {
        self.supported_modes().contains(&mode)
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmId {
    type Err = CipherKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlgorithmId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| {
                CipherKeyError::with_kind(
                    ErrorCategory::User,
                    ErrorKind::UnknownAlgorithm,
                    format!("unknown algorithm \"{}\"", s),
                )
            })
    }
}

struct CatalogEntry {
    name: &'static str,
    modes: &'static [Mode],
    help: &'static str,
}

const BOTH: &[Mode] = &[Mode::Text, Mode::File];
const TEXT_ONLY: &[Mode] = &[Mode::Text];

// Indexed by `AlgorithmId as usize`, so entries follow `AlgorithmId::ALL`.
static CATALOG: [CatalogEntry; 8] = [
    // shift
    CatalogEntry {
        name: "Shift Cipher",
        modes: BOTH,
        help: "Shift -> integer (e.g. 3). Works mod 26 for text, mod 256 for bytes.",
    },
    // substitution
    CatalogEntry {
        name: "Substitution Cipher",
        modes: BOTH,
        help: "Substitution -> 26-letter mapping (A..Z). Example: QWERTYUIOPASDFGHJKLZXCVBNM (26 unique letters).",
    },
    // affine
    CatalogEntry {
        name: "Affine Cipher",
        modes: BOTH,
        help: "Affine -> \"a,b\". For text-mode a must be coprime with 26 (e.g. 5,8). For file-mode a must be coprime with 256 (odd and gcd(a,256)=1).",
    },
    // vigenere
    CatalogEntry {
        name: "Vigenere Cipher",
        modes: TEXT_ONLY,
        help: "Vigenere -> keyword letters only (e.g. KEY). Non-letters in plaintext are ignored.",
    },
    // hill
    CatalogEntry {
        name: "Hill Cipher",
        modes: TEXT_ONLY,
        help: "Hill -> n*n integers matrix inputs (choose size and fill numbers 0–25). Matrix must be invertible modulo 26.",
    },
    // permutation
    CatalogEntry {
        name: "Permutation Cipher",
        modes: BOTH,
        help: "Permutation -> comma-separated indices starting at 0 (e.g. for k=3: \"2,0,1\"). Must be a permutation of 0..k-1.",
    },
    // otp
    CatalogEntry {
        name: "One-Time Pad",
        modes: BOTH,
        help: "One-Time Pad -> key must be letters (A-Z) at least as long as plaintext, or upload a key file (.txt) with many letters.",
    },
    // playfair
    CatalogEntry {
        name: "Playfair Cipher",
        modes: TEXT_ONLY,
        help: "Playfair -> keyword letters only (e.g. MONARCHY). J is treated as I in the cipher.",
    },
];

fn entry(id: AlgorithmId) -> &'static CatalogEntry {
    &CATALOG[id as usize]
}

/// Help text for a raw dropdown value.
///
/// Unknown or empty identifiers yield the empty string: no hint is
/// available, which is not an error.
pub fn help_text_for(id: &str) -> &'static str {
    id.parse::<AlgorithmId>()
        .map(AlgorithmId::help_text)
        .unwrap_or("")
}

/// Algorithms offered for `mode`, in catalog order.
pub fn algorithms_for(mode: Mode) -> impl Iterator<Item = AlgorithmId> {
    AlgorithmId::ALL
        .into_iter()
        .filter(move |id| id.supports(mode))
}
