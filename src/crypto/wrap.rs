use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::rngs::OsRng;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};

use super::{AesSessionMaterial, CryptoError};

/// Wrap the AES session key under the gateway's long-lived RSA public key.
///
/// The gateway publishes its key as a base64 X.509/SPKI DER blob and expects
/// the 16 key bytes encrypted with RSA PKCS#1 v1.5 padding in a single block
/// (the key is far below the modulus size, so no chunking is involved).
pub fn wrap_session_key(
    public_key_b64: &str,
    material: &AesSessionMaterial,
) -> Result<String, CryptoError> {
    let der = BASE64
        .decode(public_key_b64.trim())
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;

    let public_key = RsaPublicKey::from_public_key_der(&der)
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;

    let wrapped = public_key
        .encrypt(&mut OsRng, Pkcs1v15Encrypt, material.key_bytes())
        .map_err(|e| CryptoError::RsaEncryption(e.to_string()))?;

    Ok(BASE64.encode(wrapped))
}
