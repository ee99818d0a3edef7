//! Master key extraction from a Chromium-style `Local State` JSON store
//!
//! ```json
//! { "os_crypt": { "encrypted_key": "RFBBUEkBAAAA0Iyd3wEV0RGMegDAT8KX6wEAAAA..." } }
//! ```
//!
//! The decoded value is `[5 bytes: "DPAPI"][DPAPI-protected payload]`.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use unseal_core::config::{MasterKeyConfig, DEFAULT_KEY_FIELD};
use unseal_core::{UnsealError, UnsealResult};
use unseal_crypto::MasterKey;
use zeroize::Zeroizing;

use crate::unwrap::KeyUnwrap;

/// Version marker prefixed to the protected key blob
pub const KEY_BLOB_MARKER: &[u8; 5] = b"DPAPI";

/// Loads the session master key through an injected [`KeyUnwrap`].
#[derive(Debug)]
pub struct MasterKeyLoader<U> {
    unwrapper: U,
    key_field: String,
    local_state: Option<PathBuf>,
}

impl<U: KeyUnwrap> MasterKeyLoader<U> {
    pub fn new(unwrapper: U) -> Self {
        Self {
            unwrapper,
            key_field: DEFAULT_KEY_FIELD.to_string(),
            local_state: None,
        }
    }

    pub fn from_config(config: &MasterKeyConfig, unwrapper: U) -> Self {
        Self {
            unwrapper,
            key_field: config.key_field.clone(),
            local_state: config.local_state_path(),
        }
    }

    /// Override the dotted path of the key field.
    pub fn with_key_field(mut self, key_field: impl Into<String>) -> Self {
        self.key_field = key_field.into();
        self
    }

    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// Load from the configuration store at `config_path`.
    pub fn load(&self, config_path: &Path) -> UnsealResult<MasterKey> {
        let content = std::fs::read_to_string(config_path).map_err(|source| {
            UnsealError::ConfigReadFailure {
                path: config_path.to_path_buf(),
                source,
            }
        })?;

        tracing::debug!(path = %config_path.display(), "read configuration store");
        self.load_from_str(&content)
    }

    /// Load from the store path given at construction.
    pub fn load_configured(&self) -> UnsealResult<MasterKey> {
        match &self.local_state {
            Some(path) => self.load(path),
            None => Err(UnsealError::ConfigReadFailure {
                path: PathBuf::new(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no local_state path configured",
                ),
            }),
        }
    }

    /// Load from configuration store content already in memory.
    pub fn load_from_str(&self, content: &str) -> UnsealResult<MasterKey> {
        let payload = extract_protected_blob(content, &self.key_field)?;
        let key = self.unwrapper.unwrap(&payload, false)?;

        tracing::debug!(
            protected_len = payload.len(),
            key_len = key.len(),
            "unwrapped master key"
        );
        Ok(MasterKey::from_bytes(key))
    }
}

/// Locate `key_field`, base64-decode it and strip the version marker.
///
/// Returns the protected payload that the platform facility must unwrap.
pub fn extract_protected_blob(content: &str, key_field: &str) -> UnsealResult<Zeroizing<Vec<u8>>> {
    let field_not_found = || UnsealError::FieldNotFound(key_field.to_string());

    let doc: serde_json::Value = serde_json::from_str(content).map_err(|_| field_not_found())?;
    let encoded = lookup_str(&doc, key_field).ok_or_else(field_not_found)?;

    let blob = Zeroizing::new(B64.decode(encoded)?);
    if blob.len() <= KEY_BLOB_MARKER.len() {
        return Err(UnsealError::MalformedKeyBlob {
            len: blob.len(),
            marker_len: KEY_BLOB_MARKER.len(),
        });
    }

    Ok(Zeroizing::new(blob[KEY_BLOB_MARKER.len()..].to_vec()))
}

/// Dotted-path lookup of a string leaf, e.g. `os_crypt.encrypted_key`.
fn lookup_str<'a>(doc: &'a serde_json::Value, dotted: &str) -> Option<&'a str> {
    dotted
        .split('.')
        .try_fold(doc, |node, segment| node.get(segment))?
        .as_str()
}
