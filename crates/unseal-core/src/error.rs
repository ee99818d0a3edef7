use std::path::PathBuf;

use thiserror::Error;

pub type UnsealResult<T> = Result<T, UnsealError>;

/// Every failure the decryption pipeline can surface. No variant is retried
/// internally; each one is terminal for the call that produced it.
#[derive(Debug, Error)]
pub enum UnsealError {
    #[error("reading configuration store {}: {source}", path.display())]
    ConfigReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("field '{0}' not found as a string in configuration store")]
    FieldNotFound(String),

    #[error("base64 decode of protected key failed: {0}")]
    Base64DecodeFailure(#[from] base64::DecodeError),

    #[error("protected key blob too short ({len} bytes, must exceed {marker_len}-byte version marker)")]
    MalformedKeyBlob { len: usize, marker_len: usize },

    #[error("key unwrap service failed: {0}")]
    UnwrapServiceFailure(#[from] UnwrapError),

    #[error("master key must be {expected} bytes, got {got}")]
    InvalidKeyLength { got: usize, expected: usize },

    #[error("encrypted record too short: {len} bytes (minimum {min})")]
    MalformedRecord { len: usize, min: usize },

    #[error("unsupported record scheme marker {found:?} (expected {expected:?})")]
    UnsupportedSchemeMarker { found: Vec<u8>, expected: Vec<u8> },

    #[error("AES-256-GCM authentication failed (wrong key or tampered record)")]
    AuthenticationFailure,

    #[error("decrypted secret is not valid UTF-8")]
    NotUtf8,
}

/// Failure of the host platform's secret-unprotect facility.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnwrapError {
    /// Blob corrupted or protected under a different user/machine context.
    #[error("protected blob rejected: {0}")]
    Rejected(String),

    #[error("secret-protection facility unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwrap_error_converts_into_service_failure() {
        let err: UnsealError = UnwrapError::Unavailable("no DPAPI".into()).into();
        assert!(matches!(err, UnsealError::UnwrapServiceFailure(UnwrapError::Unavailable(_))));
        assert!(err.to_string().contains("no DPAPI"));
    }

    #[test]
    fn config_read_failure_keeps_io_source() {
        use std::error::Error as _;

        let err = UnsealError::ConfigReadFailure {
            path: PathBuf::from("/nope/Local State"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/nope/Local State"));
        assert!(err.source().is_some());
    }
}
