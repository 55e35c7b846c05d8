//! Key material expanded from the process secret.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::CipherInitError;

const KDF_SALT: &[u8] = b"client-card-field-cipher-v1";
const ENCRYPTION_INFO: &[u8] = b"encryption";
const SYNTHETIC_IV_INFO: &[u8] = b"synthetic-iv";

/// Length in bytes of each derived key.
pub(crate) const KEY_LEN: usize = 32;

/// Independent keys for sealing and for deriving nonces. Zeroized on drop.
pub(crate) struct FieldKeys {
    pub(crate) encryption: Zeroizing<[u8; KEY_LEN]>,
    pub(crate) synthetic_iv: Zeroizing<[u8; KEY_LEN]>,
}

impl FieldKeys {
    pub(crate) fn derive(secret: &[u8]) -> Result<Self, CipherInitError> {
        let hkdf = Hkdf::<Sha256>::new(Some(KDF_SALT), secret);
        let mut keys = Self {
            encryption: Zeroizing::new([0_u8; KEY_LEN]),
            synthetic_iv: Zeroizing::new([0_u8; KEY_LEN]),
        };
        for (info, okm) in [
            (ENCRYPTION_INFO, keys.encryption.as_mut_slice()),
            (SYNTHETIC_IV_INFO, keys.synthetic_iv.as_mut_slice()),
        ] {
            hkdf.expand(info, okm)
                .map_err(|err| CipherInitError::KeyDerivation {
                    message: err.to_string(),
                })?;
        }
        Ok(keys)
    }
}
