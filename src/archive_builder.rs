//! Archive builder: applies the inverse compression/encryption matrix to an
//! [`ExtractedPayload`] to recover each file's original bytes.
//!
//! This is the "external collaborator" the engine's module doc comment
//! defers to — the core's `extract_data` deliberately stops at on-wire
//! bytes. It is included here, thin and separate from `engine`, so the CLI
//! has something to hand a user besides raw ciphertext.

use thiserror::Error;

use crate::codec;
use crate::crypto;
use crate::payload::ExtractedPayload;

#[derive(Error, Debug)]
pub enum ArchiveBuilderError {
    #[error("a passphrase is required to rebuild this payload")]
    RequirePassword,
    #[error("payload data is corrupted")]
    DataCorrupted,
}

/// Recover every file's original bytes from `payload`, in order.
pub fn rebuild(payload: &ExtractedPayload, passphrase: Option<&str>) -> Result<Vec<(String, Vec<u8>)>, ArchiveBuilderError> {
    let encrypted = payload.is_encrypted();
    let compressed = payload.is_compressed();

    if encrypted && passphrase.is_none() {
        return Err(ArchiveBuilderError::RequirePassword);
    }

    let mut out = Vec::with_capacity(payload.extracted_files.len());
    for (name, on_wire) in &payload.extracted_files {
        let decrypted = if encrypted {
            crypto::decrypt(passphrase.unwrap(), on_wire).map_err(|_| ArchiveBuilderError::DataCorrupted)?
        } else {
            on_wire.clone()
        };
        let original = if compressed {
            codec::decompress(&decrypted).map_err(|_| ArchiveBuilderError::DataCorrupted)?
        } else {
            decrypted
        };
        out.push((name.clone(), original));
    }
    Ok(out)
}
