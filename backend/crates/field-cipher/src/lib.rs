//! Deterministic authenticated encryption for text fields stored at rest.
//!
//! The cipher is keyed by a single process-wide secret (read from
//! [`SECRET_ENV_VAR`] by [`FieldCipher::from_env`]). Encryption is
//! deterministic so equal plaintexts produce equal ciphertexts, which lets a
//! store look records up by an encrypted column. Ciphertexts are
//! authenticated: tampering, truncation or a wrong key is reported as
//! [`CipherError::MalformedCiphertext`] rather than returning garbage.
//!
//! # Wire format
//!
//! Standard base64 (with padding) of `nonce (12 bytes) || ciphertext || tag
//! (16 bytes)`. The nonce is a synthetic IV: the leading bytes of
//! HMAC-SHA256 over the plaintext under a dedicated key. The payload is
//! sealed with ChaCha20-Poly1305. Both keys are expanded from the secret
//! with HKDF-SHA256.
//!
//! # Example
//!
//! ```
//! use field_cipher::FieldCipher;
//!
//! let cipher = FieldCipher::from_secret("correct horse battery staple")
//!     .expect("non-empty secret");
//! let sealed = cipher.encrypt("12345678903").expect("encrypt");
//! assert_ne!(sealed, "12345678903");
//! assert_eq!(sealed, cipher.encrypt("12345678903").expect("encrypt"));
//! assert_eq!(cipher.decrypt(&sealed).expect("decrypt"), "12345678903");
//! ```

mod cipher;
mod error;
mod key;

pub use cipher::{FieldCipher, SECRET_ENV_VAR};
pub use error::{CipherError, CipherInitError};
