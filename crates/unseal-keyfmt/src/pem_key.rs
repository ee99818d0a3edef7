//! PEM-armored private key detection
//!
//! Accepted block labels:
//! - `OPENSSH PRIVATE KEY`  (openssh-key-v1)
//! - `RSA PRIVATE KEY`      (PKCS#1)
//! - `EC PRIVATE KEY`       (SEC1)
//! - `DSA PRIVATE KEY`      (OpenSSL SEQUENCE of six INTEGERs)
//! - `PRIVATE KEY`          (PKCS#8; RSA, EC or Ed25519)
//!
//! EC keys count only on the NIST curves P-256, P-384 and P-521.
//!
//! Keys that would need a passphrase to parse (encrypted openssh-key-v1,
//! `Proc-Type: 4,ENCRYPTED` legacy PEM, `ENCRYPTED PRIVATE KEY`) are not
//! matches, since no passphrase is ever supplied.

use der::asn1::IntRef;
use der::{Decode, Sequence};
use pkcs8::ObjectIdentifier;

const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const ID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const ID_ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");

const EC_CURVES: [ObjectIdentifier; 3] = [
    ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7"), // secp256r1
    ObjectIdentifier::new_unwrap("1.3.132.0.34"),        // secp384r1
    ObjectIdentifier::new_unwrap("1.3.132.0.35"),        // secp521r1
];

/// OpenSSL's traditional DSA private key body.
#[derive(Sequence)]
struct DsaPrivateKey<'a> {
    version: IntRef<'a>,
    p: IntRef<'a>,
    q: IntRef<'a>,
    g: IntRef<'a>,
    public: IntRef<'a>,
    private: IntRef<'a>,
}

fn is_supported_curve(curve: Option<ObjectIdentifier>) -> bool {
    curve.is_some_and(|oid| EC_CURVES.contains(&oid))
}

fn is_sec1_key(der: &[u8]) -> bool {
    sec1::EcPrivateKey::try_from(der)
        .is_ok_and(|key| is_supported_curve(key.parameters.and_then(|p| p.named_curve())))
}

fn is_pkcs8_key(der: &[u8]) -> bool {
    let Ok(info) = pkcs8::PrivateKeyInfo::try_from(der) else {
        return false;
    };
    let algorithm = info.algorithm.oid;
    if algorithm == ID_EC_PUBLIC_KEY {
        is_supported_curve(info.algorithm.parameters_oid().ok())
    } else {
        algorithm == RSA_ENCRYPTION || algorithm == ID_ED25519
    }
}

fn is_dsa_key(der: &[u8]) -> bool {
    DsaPrivateKey::from_der(der).is_ok()
}

/// Decode PEM armor, then parse the block as a private key.
///
/// Any failure along the way is a plain `false`.
pub fn is_pem_private_key(blob: &[u8]) -> bool {
    let Ok(block) = pem::parse(blob) else {
        return false;
    };

    if block
        .headers()
        .get("Proc-Type")
        .is_some_and(|v| v.contains("ENCRYPTED"))
    {
        return false;
    }

    let der = block.contents();
    match block.tag() {
        "OPENSSH PRIVATE KEY" => {
            ssh_key::PrivateKey::from_bytes(der).is_ok_and(|key| !key.is_encrypted())
        }
        "RSA PRIVATE KEY" => pkcs1::RsaPrivateKey::try_from(der).is_ok(),
        "EC PRIVATE KEY" => is_sec1_key(der),
        "DSA PRIVATE KEY" => is_dsa_key(der),
        "PRIVATE KEY" => is_pkcs8_key(der),
        _ => false,
    }
}
