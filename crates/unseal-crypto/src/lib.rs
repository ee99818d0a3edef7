//! unseal-crypto: decryption of browser-protected secret records
//!
//! Encrypted record format (binary):
//! ```text
//! [3 bytes: scheme marker "v10"][12 bytes: nonce][N bytes: ciphertext][16 bytes: GCM tag]
//! ```
//!
//! Every record in a profile is sealed with the same 256-bit master key,
//! which is unwrapped once per session (see `unseal-secrets`).

pub mod key;
pub mod record;

pub use key::MasterKey;
pub use record::{decrypt_record, decrypt_record_utf8, DecryptedSecret};

/// Size of the AES-256 master key in bytes
pub const MASTER_KEY_LEN: usize = 32;

/// Scheme marker of the only supported record layout (AES-256-GCM)
pub const RECORD_SCHEME_MARKER: &[u8; 3] = b"v10";

/// Length of the scheme marker prefix
pub const SCHEME_MARKER_LEN: usize = 3;

/// Size of an AES-GCM nonce (96-bit)
pub const NONCE_LEN: usize = 12;

/// Size of a GCM authentication tag
pub const TAG_LEN: usize = 16;

/// Shortest well-formed record: marker + nonce + tag over empty plaintext
pub const MIN_RECORD_LEN: usize = SCHEME_MARKER_LEN + NONCE_LEN + TAG_LEN;
