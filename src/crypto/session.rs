use aes::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const SESSION_KEY_LENGTH: usize = 16;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;

/// One-call AES session material: a random 128-bit key and the
/// protocol-mandated all-zero IV. Minted fresh for every outbound gateway
/// call and never reused; the key is wiped from memory on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct AesSessionMaterial {
    key: [u8; SESSION_KEY_LENGTH],
    iv: [u8; SESSION_KEY_LENGTH],
}

impl AesSessionMaterial {
    pub fn generate() -> Self {
        let mut key = [0u8; SESSION_KEY_LENGTH];
        OsRng.fill_bytes(&mut key);
        Self {
            key,
            iv: [0u8; SESSION_KEY_LENGTH],
        }
    }

    pub(crate) fn key_bytes(&self) -> &[u8; SESSION_KEY_LENGTH] {
        &self.key
    }

    /// Encrypt a request field with AES-128-CBC/PKCS7 and base64 the result.
    /// An empty plaintext encrypts to an empty string — the gateway expects
    /// absent values as `""`, not as a ciphertext of nothing.
    pub fn encrypt_field(&self, plaintext: &str) -> String {
        if plaintext.is_empty() {
            return String::new();
        }

        let ciphertext = Aes128CbcEnc::new(&self.key.into(), &self.iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        BASE64.encode(ciphertext)
    }
}
