//! unseal-keyfmt: classify candidate private-key files
//!
//! Checks run in order, first match wins:
//!   1. PEM armor that parses as an unencrypted private key → `OpenSsh`
//!   2. a `Private-Lines: <digits>` header anywhere in the blob → `Putty`
//!
//! The PuTTY check is purely syntactic. Nothing after the header is
//! validated, so any text carrying that line is reported as a PuTTY key.
//! Classification never fails; unreadable or empty input is `Unrecognized`.

pub mod pem_key;
pub mod putty;

use std::path::Path;

use unseal_core::{KeyFormat, KeyFormatResult};

pub use pem_key::is_pem_private_key;
pub use putty::is_putty_key;

/// Classify a raw key-file blob. Pure; the blob is only read.
pub fn classify(blob: &[u8]) -> KeyFormatResult {
    let result = if is_pem_private_key(blob) {
        KeyFormatResult::Recognized(KeyFormat::OpenSsh)
    } else if is_putty_key(blob) {
        KeyFormatResult::Recognized(KeyFormat::Putty)
    } else {
        KeyFormatResult::Unrecognized
    };

    match result.format() {
        Some(format) => tracing::debug!(len = blob.len(), %format, "recognized key blob"),
        None => tracing::debug!(len = blob.len(), "unrecognized key blob"),
    }
    result
}

/// Read a candidate key file whole.
pub fn read_key_file(path: &Path) -> std::io::Result<Vec<u8>> {
    std::fs::read(path)
}

/// Read then classify. Only the read can fail.
pub fn classify_file(path: &Path) -> std::io::Result<KeyFormatResult> {
    let blob = read_key_file(path)?;
    let result = classify(&blob);
    tracing::trace!(path = %path.display(), recognized = result.is_recognized(), "classified key file");
    Ok(result)
}
