//! Deterministic field encryption.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{CipherError, CipherInitError};
use crate::key::FieldKeys;

/// Environment variable holding the process-wide encryption secret.
pub const SECRET_ENV_VAR: &str = "ENC_KEY";

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
/// Associated data authenticated with every ciphertext.
const FORMAT_TAG: &[u8] = b"field-cipher/v1";

type HmacSha256 = Hmac<Sha256>;

/// Symmetric cipher applied to identifying fields before they reach storage.
///
/// Build it once at startup and share it behind an `Arc`; it holds no
/// mutable state.
pub struct FieldCipher {
    keys: FieldKeys,
}

impl FieldCipher {
    /// Derive a cipher from a secret string.
    ///
    /// # Errors
    ///
    /// Returns [`CipherInitError::MissingSecret`] when `secret` is empty or
    /// whitespace, and [`CipherInitError::KeyDerivation`] if key expansion
    /// fails.
    pub fn from_secret(secret: &str) -> Result<Self, CipherInitError> {
        Self::build(secret, "secret")
    }

    /// Derive a cipher from [`SECRET_ENV_VAR`].
    ///
    /// # Errors
    ///
    /// Returns [`CipherInitError::MissingSecret`] when the variable is unset,
    /// empty or not valid Unicode.
    pub fn from_env() -> Result<Self, CipherInitError> {
        Self::from_env_var(SECRET_ENV_VAR)
    }

    /// Derive a cipher from the named environment variable.
    ///
    /// # Errors
    ///
    /// See [`FieldCipher::from_env`].
    pub fn from_env_var(variable: &str) -> Result<Self, CipherInitError> {
        let secret = std::env::var(variable).map_err(|_| CipherInitError::MissingSecret {
            variable: variable.to_owned(),
        })?;
        Self::build(&secret, variable)
    }

    fn build(secret: &str, source: &str) -> Result<Self, CipherInitError> {
        if secret.trim().is_empty() {
            return Err(CipherInitError::MissingSecret {
                variable: source.to_owned(),
            });
        }
        let keys = FieldKeys::derive(secret.as_bytes())?;
        Ok(Self { keys })
    }

    /// Encrypt `plaintext` into a base64 string.
    ///
    /// The same plaintext always yields the same output under one secret.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Encoding`] if the AEAD primitive rejects the
    /// input.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let nonce = self.synthetic_nonce(plaintext.as_bytes())?;
        let sealed = self
            .aead()
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: plaintext.as_bytes(),
                    aad: FORMAT_TAG,
                },
            )
            .map_err(|err| CipherError::encoding(err.to_string()))?;

        let mut wire = Vec::with_capacity(NONCE_LEN + sealed.len());
        wire.extend_from_slice(&nonce);
        wire.extend_from_slice(&sealed);
        Ok(STANDARD.encode(wire))
    }

    /// Decrypt a value produced by [`FieldCipher::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::MalformedCiphertext`] for invalid base64,
    /// truncated input, failed authentication, a nonce that does not match
    /// the recovered plaintext, or plaintext that is not UTF-8.
    pub fn decrypt(&self, encoded: &str) -> Result<String, CipherError> {
        let wire = STANDARD
            .decode(encoded)
            .map_err(|err| CipherError::malformed(format!("invalid base64: {err}")))?;
        if wire.len() < NONCE_LEN + TAG_LEN {
            return Err(CipherError::malformed(format!(
                "expected at least {} bytes, found {}",
                NONCE_LEN + TAG_LEN,
                wire.len()
            )));
        }

        let (nonce, sealed) = wire.split_at(NONCE_LEN);
        let plaintext = self
            .aead()
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: sealed,
                    aad: FORMAT_TAG,
                },
            )
            .map_err(|_| CipherError::malformed("authentication failed"))?;

        self.siv_mac(&plaintext)
            .map_err(|err| CipherError::malformed(err.to_string()))?
            .verify_truncated_left(nonce)
            .map_err(|_| CipherError::malformed("synthetic nonce mismatch"))?;

        String::from_utf8(plaintext).map_err(|_| CipherError::malformed("plaintext is not UTF-8"))
    }

    fn aead(&self) -> ChaCha20Poly1305 {
        ChaCha20Poly1305::new(Key::from_slice(self.keys.encryption.as_slice()))
    }

    fn siv_mac(&self, plaintext: &[u8]) -> Result<HmacSha256, CipherError> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(self.keys.synthetic_iv.as_slice())
            .map_err(|err| CipherError::encoding(err.to_string()))?;
        mac.update(plaintext);
        Ok(mac)
    }

    fn synthetic_nonce(&self, plaintext: &[u8]) -> Result<[u8; NONCE_LEN], CipherError> {
        let digest = self.siv_mac(plaintext)?.finalize().into_bytes();
        digest
            .as_slice()
            .first_chunk::<NONCE_LEN>()
            .copied()
            .ok_or_else(|| CipherError::encoding("HMAC output shorter than nonce"))
    }
}

impl fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldCipher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for the cipher; environment loading is covered in
    //! `tests/secret_env.rs`.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn cipher() -> FieldCipher {
        FieldCipher::from_secret("unit-test-secret").expect("non-empty secret")
    }

    #[rstest]
    #[case::oib("12345678903")]
    #[case::croatian_name("Anić")]
    #[case::full_name("Ana Anić")]
    #[case::empty("")]
    fn decrypt_recovers_plaintext(cipher: FieldCipher, #[case] plaintext: &str) {
        let sealed = cipher.encrypt(plaintext).expect("encrypt");
        assert_eq!(cipher.decrypt(&sealed).expect("decrypt"), plaintext);
    }

    #[rstest]
    fn encryption_is_deterministic(cipher: FieldCipher) {
        let first = cipher.encrypt("Ana").expect("encrypt");
        let second = cipher.encrypt("Ana").expect("encrypt");
        assert_eq!(first, second);
        assert_ne!(first, cipher.encrypt("Ivo").expect("encrypt"));
    }

    #[rstest]
    fn ciphertext_does_not_contain_plaintext(cipher: FieldCipher) {
        let sealed = cipher.encrypt("12345678903").expect("encrypt");
        assert!(!sealed.contains("12345678903"));
    }

    #[rstest]
    fn other_secret_cannot_decrypt(cipher: FieldCipher) {
        let sealed = cipher.encrypt("Ana").expect("encrypt");
        let other = FieldCipher::from_secret("another-secret").expect("non-empty secret");
        assert!(matches!(
            other.decrypt(&sealed),
            Err(CipherError::MalformedCiphertext { .. })
        ));
    }

    #[rstest]
    #[case::not_base64("definitely not base64!")]
    #[case::empty("")]
    #[case::truncated("AAAA")]
    #[case::zeroed_block("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA")]
    fn rejects_foreign_input(cipher: FieldCipher, #[case] encoded: &str) {
        assert!(matches!(
            cipher.decrypt(encoded),
            Err(CipherError::MalformedCiphertext { .. })
        ));
    }

    #[rstest]
    fn rejects_tampered_ciphertext(cipher: FieldCipher) {
        let sealed = cipher.encrypt("12345678903").expect("encrypt");
        let mut wire = STANDARD.decode(&sealed).expect("valid base64");
        if let Some(byte) = wire.last_mut() {
            *byte ^= 0x01;
        }
        let tampered = STANDARD.encode(wire);
        assert!(matches!(
            cipher.decrypt(&tampered),
            Err(CipherError::MalformedCiphertext { .. })
        ));
    }

    #[rstest]
    #[case::empty("")]
    #[case::whitespace("   ")]
    fn blank_secret_is_rejected(#[case] secret: &str) {
        assert!(matches!(
            FieldCipher::from_secret(secret),
            Err(CipherInitError::MissingSecret { .. })
        ));
    }

    #[rstest]
    fn debug_output_hides_key_material(cipher: FieldCipher) {
        assert_eq!(format!("{cipher:?}"), "FieldCipher { .. }");
    }
}
