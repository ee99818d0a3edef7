use serde::{Deserialize, Serialize};

/// Structured private-key formats the classifier knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyFormat {
    /// PEM-armored key that parses as a private key (OpenSSH, PKCS#1, SEC1, PKCS#8)
    OpenSsh,
    /// PuTTY `.ppk` file (matched on a `Private-Lines:` header)
    Putty,
}

/// Outcome of classifying a candidate key blob. Never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyFormatResult {
    Recognized(KeyFormat),
    Unrecognized,
}

impl KeyFormatResult {
    pub fn is_recognized(&self) -> bool {
        matches!(self, KeyFormatResult::Recognized(_))
    }

    pub fn format(&self) -> Option<KeyFormat> {
        match self {
            KeyFormatResult::Recognized(format) => Some(*format),
            KeyFormatResult::Unrecognized => None,
        }
    }
}

impl std::fmt::Display for KeyFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyFormat::OpenSsh => f.write_str("openssh"),
            KeyFormat::Putty => f.write_str("putty"),
        }
    }
}
