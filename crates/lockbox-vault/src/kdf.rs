// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from the master password.

use std::num::NonZeroU32;

use lockbox_core::LockboxError;
use ring::pbkdf2;
use zeroize::Zeroizing;

use crate::random::RandomSource;

/// Length of the master-key salt in bytes.
pub const SALT_LEN: usize = 16;

/// Length of the derived AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

/// Default iteration count for new vaults.
pub const DEFAULT_ITERATIONS: NonZeroU32 = match NonZeroU32::new(480_000) {
    Some(n) => n,
    None => unreachable!(),
};

/// Derive a 32-byte key from `password` and `salt`.
///
/// The returned key is wrapped in [`Zeroizing`] for automatic memory zeroing
/// on drop.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    iterations: NonZeroU32,
) -> Zeroizing<[u8; KEY_LEN]> {
    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        password,
        &mut output[..],
    );
    output
}

/// Draw a fresh salt from `rng`.
pub fn generate_salt(rng: &dyn RandomSource) -> Result<[u8; SALT_LEN], LockboxError> {
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)?;
    Ok(salt)
}

/// Decode a hex salt, requiring exactly [`SALT_LEN`] bytes.
pub fn decode_salt(salt_hex: &str) -> Result<[u8; SALT_LEN], LockboxError> {
    let bytes = hex::decode(salt_hex.trim()).map_err(|_| LockboxError::InvalidSaltEncoding)?;
    bytes
        .try_into()
        .map_err(|_| LockboxError::InvalidSaltEncoding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SystemRandomSource;

    fn iters(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn matches_published_pbkdf2_sha256_vectors() {
        let one = derive_key(b"password", b"salt", iters(1));
        assert_eq!(
            hex::encode(*one),
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
        );

        let two = derive_key(b"password", b"salt", iters(2));
        assert_eq!(
            hex::encode(*two),
            "ae4d0c95af6b46d32d0adff928f06dd02a303f8ef3c251dfd6e2d85a95474c43"
        );
    }

    #[test]
    fn derive_key_is_deterministic() {
        let salt = [7u8; SALT_LEN];
        let a = derive_key(b"masterpw", &salt, iters(1000));
        let b = derive_key(b"masterpw", &salt, iters(1000));
        assert_eq!(*a, *b);
    }

    #[test]
    fn different_password_or_salt_changes_key() {
        let base = derive_key(b"masterpw", &[1u8; SALT_LEN], iters(1000));
        let other_pw = derive_key(b"wrongpw", &[1u8; SALT_LEN], iters(1000));
        let other_salt = derive_key(b"masterpw", &[2u8; SALT_LEN], iters(1000));
        assert_ne!(*base, *other_pw);
        assert_ne!(*base, *other_salt);
    }

    #[test]
    fn default_iterations_meet_minimum() {
        assert!(DEFAULT_ITERATIONS.get() >= 480_000);
    }

    #[test]
    fn generated_salts_differ() {
        let rng = SystemRandomSource::new();
        assert_ne!(generate_salt(&rng).unwrap(), generate_salt(&rng).unwrap());
    }

    #[test]
    fn decode_salt_roundtrips_hex() {
        let salt = [0xabu8; SALT_LEN];
        assert_eq!(decode_salt(&hex::encode(salt)).unwrap(), salt);
    }

    #[test]
    fn decode_salt_rejects_bad_input() {
        assert!(matches!(decode_salt("not hex"), Err(LockboxError::InvalidSaltEncoding)));
        assert!(matches!(decode_salt("abcd"), Err(LockboxError::InvalidSaltEncoding)));
        assert!(matches!(decode_salt("abc"), Err(LockboxError::InvalidSaltEncoding)));
    }
}
