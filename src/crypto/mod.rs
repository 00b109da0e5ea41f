//! AES-256-CBC encryption and PBKDF2-HMAC-SHA256 key derivation for secret payloads.
//!
//! Authenticity is *not* provided here — the header's HMAC (see `header`) is
//! the sole integrity check for the whole payload set. This module only
//! provides confidentiality plus tamper-evident padding.
//!
//! Key derivation: PBKDF2-HMAC-SHA256(passphrase, salt, 100_000 iters) → 32-byte key
//! Encryption:     AES-256-CBC, PKCS#7 padding
//!
//! Encrypted payload layout: `salt (16 B) || iv (16 B) || ciphertext`

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use thiserror::Error;

/// Byte length of the random salt prepended to every encrypted payload.
pub const SALT_LEN: usize = 16;
/// Byte length of the random IV prepended after the salt.
pub const IV_LEN: usize = 16;
/// PBKDF2 iteration count. Frozen; changing it breaks decrypting old payloads.
pub const PBKDF2_ITERATIONS: u32 = 100_000;
/// AES block size in bytes.
const BLOCK_LEN: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Encryption failed")]
    EncryptionFailed,
    #[error("Decryption failed — wrong password or corrupted data")]
    DecryptionFailed,
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),
    #[error("Encrypted payload too short (minimum {} bytes)", SALT_LEN + IV_LEN)]
    TooShort,
}

/// Derive a 256-bit key from a passphrase and salt using PBKDF2-HMAC-SHA256.
pub fn derive_key(passphrase: &str, salt: &[u8]) -> Result<[u8; 32], CryptoError> {
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
    Ok(key)
}

/// Encrypt `plaintext` with AES-256-CBC using a random salt and IV.
///
/// Returns `salt (16 B) || iv (16 B) || ciphertext`. PKCS#7 padding always
/// appends a full extra block when `plaintext` is already block-aligned.
pub fn encrypt(passphrase: &str, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    rand::thread_rng().fill_bytes(&mut iv);

    let key = derive_key(passphrase, &salt)?;
    let encryptor = Aes256CbcEnc::new(&key.into(), &iv.into());

    let mut buf = vec![0u8; plaintext.len() + BLOCK_LEN];
    buf[..plaintext.len()].copy_from_slice(plaintext);
    let ciphertext = encryptor
        .encrypt_padded_mut::<Pkcs7>(&mut buf, plaintext.len())
        .map_err(|_| CryptoError::EncryptionFailed)?;

    let mut out = Vec::with_capacity(SALT_LEN + IV_LEN + ciphertext.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(&iv);
    out.extend_from_slice(ciphertext);
    Ok(out)
}

/// Decrypt an AES-256-CBC envelope produced by [`encrypt`].
///
/// Fails with [`CryptoError::DecryptionFailed`] on malformed padding — this
/// is the only signal available to distinguish "wrong passphrase" from
/// "corrupted ciphertext" at this layer; the caller attaches the user-facing
/// distinction (see the engine's `DataCorrupted` / `WrongPassword` split).
pub fn decrypt(passphrase: &str, envelope: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if envelope.len() < SALT_LEN + IV_LEN {
        return Err(CryptoError::TooShort);
    }
    let salt = &envelope[..SALT_LEN];
    let iv = &envelope[SALT_LEN..SALT_LEN + IV_LEN];
    let ciphertext = &envelope[SALT_LEN + IV_LEN..];

    let key = derive_key(passphrase, salt)?;
    let decryptor = Aes256CbcDec::new(&key.into(), iv.into());

    let mut buf = ciphertext.to_vec();
    let plaintext = decryptor
        .decrypt_padded_mut::<Pkcs7>(&mut buf)
        .map_err(|_| CryptoError::DecryptionFailed)?;
    Ok(plaintext.to_vec())
}

/// Exact ciphertext envelope length for a plaintext of `plaintext_len` bytes,
/// without performing the encryption. Used by the header codec to declare
/// `EMBEDDED_SIZES` before the payload is actually encrypted.
pub fn estimate_size(plaintext_len: usize) -> usize {
    SALT_LEN + IV_LEN + ((plaintext_len + 1).div_ceil(BLOCK_LEN)) * BLOCK_LEN
}
