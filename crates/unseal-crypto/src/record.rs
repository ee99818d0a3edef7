//! Per-record AES-256-GCM decryption
//!
//! Checks run in a fixed order so that the reported error is stable for a
//! given input: key length, record length, scheme marker, then the AEAD open.
//! No associated data is bound to records.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use unseal_core::{UnsealError, UnsealResult};
use zeroize::Zeroizing;

use crate::{MASTER_KEY_LEN, MIN_RECORD_LEN, NONCE_LEN, RECORD_SCHEME_MARKER, SCHEME_MARKER_LEN};

/// Recovered plaintext; zeroized when dropped
pub type DecryptedSecret = Zeroizing<Vec<u8>>;

/// Decrypt one stored record with the session master key.
///
/// - `record`: `[3-byte marker][12-byte nonce][ciphertext || 16-byte tag]`
/// - `key`: raw master key, must be exactly 32 bytes
pub fn decrypt_record(record: &[u8], key: &[u8]) -> UnsealResult<DecryptedSecret> {
    if key.len() != MASTER_KEY_LEN {
        return Err(UnsealError::InvalidKeyLength {
            got: key.len(),
            expected: MASTER_KEY_LEN,
        });
    }

    if record.len() < MIN_RECORD_LEN {
        return Err(UnsealError::MalformedRecord {
            len: record.len(),
            min: MIN_RECORD_LEN,
        });
    }

    let (marker, rest) = record.split_at(SCHEME_MARKER_LEN);
    if marker != RECORD_SCHEME_MARKER {
        tracing::warn!(
            marker = %String::from_utf8_lossy(marker),
            "refusing to decrypt record with unsupported scheme marker"
        );
        return Err(UnsealError::UnsupportedSchemeMarker {
            found: marker.to_vec(),
            expected: RECORD_SCHEME_MARKER.to_vec(),
        });
    }

    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| UnsealError::InvalidKeyLength {
        got: key.len(),
        expected: MASTER_KEY_LEN,
    })?;

    cipher
        .decrypt(nonce, ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| UnsealError::AuthenticationFailure)
}

/// Decrypt a record whose plaintext is text (passwords, tokens).
pub fn decrypt_record_utf8(record: &[u8], key: &[u8]) -> UnsealResult<Zeroizing<String>> {
    let plaintext = decrypt_record(record, key)?;
    let text = std::str::from_utf8(&plaintext).map_err(|_| UnsealError::NotUtf8)?;
    Ok(Zeroizing::new(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    fn seal(key: &[u8; 32], marker: &[u8], plaintext: &[u8]) -> Vec<u8> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);
        let ciphertext = Aes256Gcm::new(key.into())
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .unwrap();

        let mut record = Vec::with_capacity(marker.len() + NONCE_LEN + ciphertext.len());
        record.extend_from_slice(marker);
        record.extend_from_slice(&nonce);
        record.extend_from_slice(&ciphertext);
        record
    }

    #[test]
    fn test_decrypt_roundtrip() {
        let key = [7u8; 32];
        let record = seal(&key, RECORD_SCHEME_MARKER, b"correct horse battery staple");

        let plaintext = decrypt_record(&record, &key).unwrap();
        assert_eq!(plaintext.as_slice(), b"correct horse battery staple");
    }

    #[test]
    fn test_minimum_length_record_decrypts_to_empty() {
        let key = [1u8; 32];
        let record = seal(&key, RECORD_SCHEME_MARKER, b"");
        assert_eq!(record.len(), MIN_RECORD_LEN);

        let plaintext = decrypt_record(&record, &key).unwrap();
        assert!(plaintext.is_empty());
    }

    #[test]
    fn test_wrong_key_is_authentication_failure() {
        let record = seal(&[1u8; 32], RECORD_SCHEME_MARKER, b"secret");
        let result = decrypt_record(&record, &[2u8; 32]);
        assert!(matches!(result, Err(UnsealError::AuthenticationFailure)));
    }

    #[test]
    fn test_key_length_checked_before_record() {
        // Record is also too short; the key error must win.
        let result = decrypt_record(&[0u8; 4], &[0u8; 16]);
        assert!(matches!(
            result,
            Err(UnsealError::InvalidKeyLength { got: 16, expected: 32 })
        ));
    }

    #[test]
    fn test_short_record_is_malformed() {
        let result = decrypt_record(&[0u8; MIN_RECORD_LEN - 1], &[0u8; 32]);
        assert!(matches!(
            result,
            Err(UnsealError::MalformedRecord { len: 30, min: 31 })
        ));
    }

    #[test]
    fn test_unsupported_marker_is_not_decrypted() {
        let key = [3u8; 32];
        for marker in [b"v11", b"v20", b"\0\0\0"] {
            let record = seal(&key, marker, b"secret");
            match decrypt_record(&record, &key) {
                Err(UnsealError::UnsupportedSchemeMarker { found, expected }) => {
                    assert_eq!(found, marker.to_vec());
                    assert_eq!(expected, b"v10".to_vec());
                }
                other => panic!("expected UnsupportedSchemeMarker, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_tampered_nonce() {
        let key = [5u8; 32];
        let mut record = seal(&key, RECORD_SCHEME_MARKER, b"secret data");
        record[SCHEME_MARKER_LEN] ^= 0x01;

        let result = decrypt_record(&record, &key);
        assert!(matches!(result, Err(UnsealError::AuthenticationFailure)));
    }

    #[test]
    fn test_utf8_helper() {
        let key = [9u8; 32];
        let record = seal(&key, RECORD_SCHEME_MARKER, "pässwörd".as_bytes());
        assert_eq!(decrypt_record_utf8(&record, &key).unwrap().as_str(), "pässwörd");

        let record = seal(&key, RECORD_SCHEME_MARKER, &[0xff, 0xfe, 0x00]);
        assert!(matches!(
            decrypt_record_utf8(&record, &key),
            Err(UnsealError::NotUtf8)
        ));
    }
}
