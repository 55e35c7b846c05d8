//! Error types for the field cipher.

use thiserror::Error;

/// Failures while building a [`crate::FieldCipher`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherInitError {
    /// The secret is absent, empty or not valid Unicode.
    #[error("encryption secret `{variable}` is missing or empty")]
    MissingSecret {
        /// Name of the environment variable (or other source) consulted.
        variable: String,
    },

    /// HKDF refused to expand the secret into key material.
    #[error("failed to derive field keys: {message}")]
    KeyDerivation {
        /// Description reported by the KDF.
        message: String,
    },
}

/// Failures while encrypting or decrypting a single field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// Input to `decrypt` is not something this cipher produced under the
    /// current key.
    #[error("malformed ciphertext: {reason}")]
    MalformedCiphertext {
        /// Which check rejected the input.
        reason: String,
    },

    /// The primitive refused to seal the plaintext.
    #[error("failed to encrypt field: {reason}")]
    Encoding {
        /// Description reported by the primitive.
        reason: String,
    },
}

impl CipherError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedCiphertext {
            reason: reason.into(),
        }
    }

    pub(crate) fn encoding(reason: impl Into<String>) -> Self {
        Self::Encoding {
            reason: reason.into(),
        }
    }
}
