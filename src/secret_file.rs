//! `SecretFile`: one secret payload's name, raw bytes, and memoized
//! derivatives (compressed bytes, estimated on-wire size).

use std::fs;
use std::path::Path;

use crate::codec;
use crate::crypto;
use crate::error::StegoError;

/// A secret file to be embedded, or one recovered after extraction.
///
/// Built through [`SecretFile::from_path`] or [`SecretFile::from_bytes`] —
/// never directly — so there is exactly one value shape regardless of where
/// the bytes came from.
#[derive(Debug, Clone)]
pub struct SecretFile {
    name: String,
    raw_data: Vec<u8>,
    compressed_data: Option<Vec<u8>>,
}

impl SecretFile {
    /// Read a file from disk; `name` is the path's file name component.
    pub fn from_path(path: impl AsRef<Path>) -> Result<SecretFile, StegoError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StegoError::InvalidArgument("path has no file name".into()))?
            .to_string();
        let raw_data = fs::read(path)
            .map_err(|e| StegoError::InvalidArgument(format!("cannot read {path:?}: {e}")))?;
        SecretFile::from_bytes(name, raw_data)
    }

    /// Build a secret file directly from an in-memory name/bytes pair.
    pub fn from_bytes(name: impl Into<String>, raw_data: impl Into<Vec<u8>>) -> Result<SecretFile, StegoError> {
        let name = name.into();
        if name.is_empty() {
            return Err(StegoError::InvalidArgument("secret file name must not be empty".into()));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(StegoError::InvalidArgument(
                "secret file name must not contain path separators".into(),
            ));
        }
        Ok(SecretFile { name, raw_data: raw_data.into(), compressed_data: None })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.raw_data.len()
    }

    pub fn raw_data(&self) -> &[u8] {
        &self.raw_data
    }

    /// Zlib-compressed bytes, computed and cached on first access.
    pub fn compressed_data(&mut self) -> Result<&[u8], StegoError> {
        if self.compressed_data.is_none() {
            let compressed = codec::compress(&self.raw_data)
                .map_err(|e| StegoError::Internal(e.to_string()))?;
            self.compressed_data = Some(compressed);
        }
        Ok(self.compressed_data.as_deref().unwrap())
    }

    /// Length of [`SecretFile::compressed_data`], computed and cached on first access.
    pub fn compressed_size(&mut self) -> Result<usize, StegoError> {
        Ok(self.compressed_data()?.len())
    }

    /// The on-wire byte blob this file would occupy for a given
    /// `(compressed, passphrase)` combination — the single computation both
    /// the estimated size and the actual embed step are derived from.
    pub fn prepared_bytes(
        &mut self,
        compressed: bool,
        passphrase: Option<&str>,
    ) -> Result<Vec<u8>, StegoError> {
        let base: Vec<u8> = if compressed {
            self.compressed_data()?.to_vec()
        } else {
            self.raw_data.clone()
        };
        match passphrase {
            Some(pass) => crypto::encrypt(pass, &base).map_err(|e| StegoError::Internal(e.to_string())),
            None => Ok(base),
        }
    }

    /// Number of samples this file will occupy at `bits_per_sample`, for the
    /// given `(compressed, passphrase)` combination — matches
    /// `embedded_byte_len(..) * 8 / bits_per_sample`, computed without
    /// actually compressing/encrypting when a size alone is needed.
    pub fn estimated_embedded_size(
        &mut self,
        bits_per_sample: u8,
        compressed: bool,
        passphrase: Option<&str>,
    ) -> Result<usize, StegoError> {
        let byte_len = self.embedded_byte_len(compressed, passphrase)?;
        Ok(byte_len * 8 / bits_per_sample as usize)
    }

    /// On-wire byte length for the given `(compressed, passphrase)`
    /// combination, without the `8 / bits_per_sample` sample-count
    /// conversion — this is the quantity `free_space` subtracts in bytes.
    pub fn embedded_byte_len(
        &mut self,
        compressed: bool,
        passphrase: Option<&str>,
    ) -> Result<usize, StegoError> {
        let plain_len = if compressed { self.compressed_size()? } else { self.size() };
        Ok(match passphrase {
            Some(_) => crypto::estimate_size(plain_len),
            None => plain_len,
        })
    }
}

/// Join secret file names with `/`, in order.
pub fn join_filenames(files: &[SecretFile]) -> String {
    files.iter().map(SecretFile::name).collect::<Vec<_>>().join("/")
}

/// Split a `/`-joined filenames string back into its components.
pub fn split_filenames(s: &str) -> Vec<String> {
    s.split('/').map(String::from).collect()
}

/// Join each file's embedded *sample count* (see [`SecretFile::estimated_embedded_size`])
/// with `/`, in order.
pub fn join_embedded_sizes(
    files: &mut [SecretFile],
    bits_per_sample: u8,
    compressed: bool,
    passphrase: Option<&str>,
) -> Result<String, StegoError> {
    let mut parts = Vec::with_capacity(files.len());
    for file in files.iter_mut() {
        parts.push(file.estimated_embedded_size(bits_per_sample, compressed, passphrase)?.to_string());
    }
    Ok(parts.join("/"))
}

/// Split a `/`-joined sizes string back into its integer components.
pub fn split_sizes(s: &str) -> Result<Vec<usize>, StegoError> {
    s.split('/')
        .map(|p| p.parse::<usize>().map_err(|_| StegoError::DataCorrupted))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_rejects_path_separators() {
        assert!(SecretFile::from_bytes("a/b.txt", b"x".to_vec()).is_err());
    }

    #[test]
    fn compressed_size_is_memoized() {
        let mut f = SecretFile::from_bytes("a.txt", b"hello world hello world".to_vec()).unwrap();
        let first = f.compressed_size().unwrap();
        let second = f.compressed_size().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn join_split_filenames_round_trip() {
        let files = vec![
            SecretFile::from_bytes("a.txt", b"1".to_vec()).unwrap(),
            SecretFile::from_bytes("b.txt", b"2".to_vec()).unwrap(),
        ];
        let joined = join_filenames(&files);
        assert_eq!(split_filenames(&joined), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn estimated_embedded_size_no_crypto_no_compress() {
        let mut f = SecretFile::from_bytes("a.txt", vec![0u8; 16]).unwrap();
        // 16 bytes * 8 bits / 2 bits-per-sample = 64 samples.
        assert_eq!(f.estimated_embedded_size(2, false, None).unwrap(), 64);
    }
}
