//! Session master key

use unseal_core::UnsealResult;
use zeroize::Zeroizing;

use crate::record::{decrypt_record, DecryptedSecret};
use crate::MASTER_KEY_LEN;

/// Raw master key as returned by the platform unwrap call.
///
/// The length is not validated here: a key of the wrong size is only
/// rejected when it is used, with `InvalidKeyLength`. Bytes are zeroized on
/// drop. The type is `Send + Sync`, so a loaded key can be shared read-only
/// (e.g. behind an `Arc`) by concurrent decrypt calls.
#[derive(Clone)]
pub struct MasterKey {
    bytes: Zeroizing<Vec<u8>>,
}

impl MasterKey {
    pub fn from_bytes(bytes: Zeroizing<Vec<u8>>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True when the key has the 32-byte AES-256 length.
    pub fn is_valid_length(&self) -> bool {
        self.bytes.len() == MASTER_KEY_LEN
    }

    pub fn decrypt(&self, record: &[u8]) -> UnsealResult<DecryptedSecret> {
        decrypt_record(record, self.as_bytes())
    }
}

impl From<Vec<u8>> for MasterKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(Zeroizing::new(bytes))
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
