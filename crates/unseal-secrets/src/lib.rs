//! unseal-secrets: session master key retrieval
//!
//! Flow:
//!   1. read the JSON configuration store (`Local State`)
//!   2. base64-decode `os_crypt.encrypted_key`, strip the 5-byte `DPAPI` marker
//!   3. hand the remainder to a [`KeyUnwrap`] implementation (no entropy)
//!   4. the unwrapped bytes become the session [`unseal_crypto::MasterKey`]

pub mod local_state;
pub mod unwrap;

pub use local_state::{extract_protected_blob, MasterKeyLoader, KEY_BLOB_MARKER};
pub use unwrap::{KeyUnwrap, MappedUnwrap, PlatformUnwrap};
