//! Platform secret-unprotect integration.
//!
//! - Windows: DPAPI `CryptUnprotectData`, bound to the current user/machine
//! - other targets: no facility; every call fails with `Unavailable`
//!
//! [`MappedUnwrap`] is a deterministic in-memory stand-in for tests and for
//! callers that already hold unwrapped key material.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use unseal_core::UnwrapError;
use zeroize::Zeroizing;

/// Converts an OS-protected blob back into the secret bytes it protects.
///
/// `use_entropy` exists for parity with the platform API; the master key
/// pipeline always passes `false` and no implementation here accepts an
/// entropy channel.
pub trait KeyUnwrap: Send + Sync {
    fn unwrap(&self, blob: &[u8], use_entropy: bool) -> Result<Zeroizing<Vec<u8>>, UnwrapError>;
}

impl<T: KeyUnwrap + ?Sized> KeyUnwrap for &T {
    fn unwrap(&self, blob: &[u8], use_entropy: bool) -> Result<Zeroizing<Vec<u8>>, UnwrapError> {
        (**self).unwrap(blob, use_entropy)
    }
}

impl<T: KeyUnwrap + ?Sized> KeyUnwrap for Box<T> {
    fn unwrap(&self, blob: &[u8], use_entropy: bool) -> Result<Zeroizing<Vec<u8>>, UnwrapError> {
        (**self).unwrap(blob, use_entropy)
    }
}

/// Host platform implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformUnwrap;

impl PlatformUnwrap {
    pub fn new() -> Self {
        Self
    }

    /// Whether this build has a secret-protection facility at all.
    pub fn is_available() -> bool {
        cfg!(windows)
    }
}

impl KeyUnwrap for PlatformUnwrap {
    fn unwrap(&self, blob: &[u8], use_entropy: bool) -> Result<Zeroizing<Vec<u8>>, UnwrapError> {
        if use_entropy {
            return Err(UnwrapError::Rejected(
                "supplementary entropy is not supported".into(),
            ));
        }

        platform_unprotect(blob)
    }
}

#[cfg(windows)]
fn platform_unprotect(blob: &[u8]) -> Result<Zeroizing<Vec<u8>>, UnwrapError> {
    dpapi::unprotect(blob)
}

#[cfg(not(windows))]
fn platform_unprotect(blob: &[u8]) -> Result<Zeroizing<Vec<u8>>, UnwrapError> {
    tracing::debug!(len = blob.len(), "no platform unwrap facility on this target");
    Err(UnwrapError::Unavailable(format!(
        "DPAPI is not available on {}",
        std::env::consts::OS
    )))
}

#[cfg(windows)]
mod dpapi {
    use unseal_core::UnwrapError;
    use windows::Win32::Foundation::{LocalFree, HLOCAL};
    use windows::Win32::Security::Cryptography::{
        CryptUnprotectData, CRYPTPROTECT_UI_FORBIDDEN, CRYPT_INTEGER_BLOB,
    };
    use zeroize::Zeroizing;

    pub(super) fn unprotect(blob: &[u8]) -> Result<Zeroizing<Vec<u8>>, UnwrapError> {
        let len = u32::try_from(blob.len())
            .map_err(|_| UnwrapError::Rejected(format!("blob too large: {} bytes", blob.len())))?;
        let input = CRYPT_INTEGER_BLOB {
            cbData: len,
            pbData: blob.as_ptr() as *mut u8,
        };
        let mut output = CRYPT_INTEGER_BLOB::default();

        // SAFETY: `input` points into `blob`, which outlives the call and is
        // only read. `output` is filled by the system with a LocalAlloc buffer.
        unsafe {
            CryptUnprotectData(
                &input,
                None,
                None,
                None,
                None,
                CRYPTPROTECT_UI_FORBIDDEN,
                &mut output,
            )
        }
        .map_err(|e| UnwrapError::Rejected(e.message().to_string()))?;

        if output.pbData.is_null() {
            return Ok(Zeroizing::new(Vec::new()));
        }

        // SAFETY: on success `output` describes `cbData` initialized bytes owned
        // by the system allocator. They are copied out, wiped, then released;
        // no pointer into the buffer survives this block.
        let plaintext = unsafe {
            let out_len = output.cbData as usize;
            let owned = std::slice::from_raw_parts(output.pbData, out_len).to_vec();
            std::ptr::write_bytes(output.pbData, 0, out_len);
            let _ = LocalFree(Some(HLOCAL(output.pbData.cast())));
            owned
        };

        Ok(Zeroizing::new(plaintext))
    }
}

/// Fixed blob → plaintext mapping; unknown blobs are rejected.
#[derive(Debug, Default)]
pub struct MappedUnwrap {
    entries: HashMap<Vec<u8>, Vec<u8>>,
    calls: AtomicUsize,
    entropy_calls: AtomicUsize,
}

impl MappedUnwrap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, blob: impl Into<Vec<u8>>, plaintext: impl Into<Vec<u8>>) -> Self {
        self.entries.insert(blob.into(), plaintext.into());
        self
    }

    /// Number of `unwrap` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of calls that asked for supplementary entropy.
    pub fn entropy_calls(&self) -> usize {
        self.entropy_calls.load(Ordering::SeqCst)
    }
}

impl KeyUnwrap for MappedUnwrap {
    fn unwrap(&self, blob: &[u8], use_entropy: bool) -> Result<Zeroizing<Vec<u8>>, UnwrapError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if use_entropy {
            self.entropy_calls.fetch_add(1, Ordering::SeqCst);
            return Err(UnwrapError::Rejected(
                "supplementary entropy is not supported".into(),
            ));
        }

        self.entries
            .get(blob)
            .map(|plaintext| Zeroizing::new(plaintext.clone()))
            .ok_or_else(|| {
                UnwrapError::Rejected("blob was not protected under this context".into())
            })
    }
}
