//! Shared fixtures for gateway-facing tests.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::rngs::OsRng;
use rsa::pkcs8::EncodePublicKey;
use rsa::RsaPrivateKey;

/// A `GetPublicKey` response body carrying a freshly generated RSA key.
/// Small modulus keeps test key generation fast; 16 key bytes still fit.
pub(crate) fn test_public_key_body() -> String {
    let private_key = RsaPrivateKey::new(&mut OsRng, 512).unwrap();
    let der = private_key.to_public_key().to_public_key_der().unwrap();
    format!(r#"{{"PublicKey":"{}"}}"#, BASE64.encode(der.as_bytes()))
}
