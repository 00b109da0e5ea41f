//! The LSB engine: capacity planning, embed, extract, and depth
//! auto-detection. Orchestrates the codec, cipher, secret-file, and header
//! components; this is the only module that touches the sample buffer
//! directly for anything beyond the magic-string probe.

use crate::bits;
use crate::error::StegoError;
use crate::header::{self, HeaderBlocks};
use crate::payload::ExtractedPayload;
use crate::quality::Quality;
use crate::secret_file::{self, SecretFile};

/// States `extract_data` passes through. Any failure is terminal —
/// there is no partial extraction to roll back to a prior state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractState {
    Idle,
    HeaderParsed,
    Authenticated,
    Extracting,
    Done,
    Failed(String),
}

fn resolve_hmac_key(passphrase: Option<&str>, secret_key: &[u8]) -> Vec<u8> {
    match passphrase {
        Some(pass) => pass.as_bytes().to_vec(),
        None => secret_key.to_vec(),
    }
}

/// Build the header bytes for one embed, given already-prepared
/// filenames/sizes strings. Exposed at module level so `free_space` and
/// `embed` compute the identical header, not two headers that could drift.
fn build_header_bytes(
    compressed: bool,
    encrypted: bool,
    secret_files: &mut [SecretFile],
    quality: Quality,
    passphrase: Option<&str>,
    secret_key: &[u8],
) -> Result<Vec<u8>, StegoError> {
    let filenames = secret_file::join_filenames(secret_files);
    let sizes = secret_file::join_embedded_sizes(secret_files, quality.depth(), compressed, passphrase)?;
    let hmac_key = resolve_hmac_key(passphrase, secret_key);
    Ok(header::build(compressed, encrypted, &filenames, &sizes, &hmac_key))
}

/// Builds the header once and computes free space from it, so `free_space`
/// and `embed` never risk building two different headers for the same call.
fn plan(
    samples: &[i32],
    secret_files: &mut [SecretFile],
    quality: Quality,
    compressed: bool,
    passphrase: Option<&str>,
    secret_key: &[u8],
) -> Result<(Vec<u8>, isize), StegoError> {
    let depth = quality.depth();
    let header_bytes =
        build_header_bytes(compressed, passphrase.is_some(), secret_files, quality, passphrase, secret_key)?;

    let mut total_byte_len = 0usize;
    for file in secret_files.iter_mut() {
        total_byte_len += file.embedded_byte_len(compressed, passphrase)?;
    }

    let capacity = (samples.len() * depth as usize) / 8;
    let space = capacity as isize - header_bytes.len() as isize - total_byte_len as isize;
    Ok((header_bytes, space))
}

/// `(len(samples) * depth) / 8 − len(header) − Σ embedded_byte_len_i`.
/// May be negative; callers treat negative as "will not fit".
pub fn free_space(
    samples: &[i32],
    secret_files: &mut [SecretFile],
    quality: Quality,
    compressed: bool,
    passphrase: Option<&str>,
    secret_key: &[u8],
) -> Result<isize, StegoError> {
    let (_header, space) = plan(samples, secret_files, quality, compressed, passphrase, secret_key)?;
    Ok(space)
}

/// Embed `secret_files` into `samples` in place.
///
/// Mutation is in place; the caller re-encodes the audio afterward. A
/// canceled or failed embed may leave `samples` partially modified and must
/// be discarded by the caller — there is no rollback.
pub fn embed(
    samples: &mut [i32],
    secret_files: &mut [SecretFile],
    quality: Quality,
    compressed: bool,
    passphrase: Option<&str>,
    secret_key: &[u8],
) -> Result<(), StegoError> {
    let depth = quality.depth();
    let (header_bytes, space) = plan(samples, secret_files, quality, compressed, passphrase, secret_key)?;
    if space < 0 {
        return Err(StegoError::RunOutOfFreeSpace);
    }

    let mut index = bits::pack(samples, 0, &header_bytes, depth);
    for file in secret_files.iter_mut() {
        let prepared = file.prepared_bytes(compressed, passphrase)?;
        index = bits::pack(samples, index, &prepared, depth);
    }

    Ok(())
}

/// Parse and authenticate the header without raising on "not embedded" —
/// used by the inspection path. Returns `None` if no payload is present.
pub fn get_header_blocks(
    samples: &[i32],
    passphrase: Option<&str>,
    secret_key: &[u8],
) -> Result<Option<HeaderBlocks>, StegoError> {
    let Some(quality) = header::probe_quality(samples) else {
        return Ok(None);
    };
    let depth = quality.depth();
    let start = header::magic_sample_count(depth);
    let (blocks, _next) =
        header::parse_blocks(samples, depth, start).map_err(|_| StegoError::DataCorrupted)?;

    let encrypted = blocks.is_encrypted();
    if encrypted && passphrase.is_none() {
        return Err(StegoError::RequirePassword);
    }
    let key = resolve_hmac_key(passphrase, secret_key);
    if !header::verify_hmac(&key, &blocks) {
        return Err(if encrypted { StegoError::WrongPassword } else { StegoError::DataCorrupted });
    }
    Ok(Some(blocks))
}

/// Extract every embedded secret file's on-wire bytes from `samples`.
///
/// Post-processing (decrypt/decompress back to the original file content)
/// is an external concern — see the crate's module doc comment.
pub fn extract_data(samples: &[i32], passphrase: Option<&str>, secret_key: &[u8]) -> Result<ExtractedPayload, StegoError> {
    let (payload, _states) = extract_data_tracked(samples, passphrase, secret_key);
    payload
}

/// Same as [`extract_data`] but also returns the state-machine trace, for
/// tests that assert on the `Idle → HeaderParsed → Authenticated →
/// Extracting → Done` transitions (or the terminal `Failed` state).
pub fn extract_data_tracked(
    samples: &[i32],
    passphrase: Option<&str>,
    secret_key: &[u8],
) -> (Result<ExtractedPayload, StegoError>, Vec<ExtractState>) {
    let mut trace = vec![ExtractState::Idle];

    let Some(quality) = header::probe_quality(samples) else {
        trace.push(ExtractState::Failed(StegoError::NotEmbeddedBySystem.to_string()));
        return (Err(StegoError::NotEmbeddedBySystem), trace);
    };
    let depth = quality.depth();
    let start = header::magic_sample_count(depth);

    let (blocks, mut index) = match header::parse_blocks(samples, depth, start) {
        Ok(v) => v,
        Err(_) => {
            trace.push(ExtractState::Failed(StegoError::DataCorrupted.to_string()));
            return (Err(StegoError::DataCorrupted), trace);
        }
    };
    trace.push(ExtractState::HeaderParsed);

    let encrypted = blocks.is_encrypted();
    if encrypted && passphrase.is_none() {
        trace.push(ExtractState::Failed(StegoError::RequirePassword.to_string()));
        return (Err(StegoError::RequirePassword), trace);
    }

    let key = resolve_hmac_key(passphrase, secret_key);
    if !header::verify_hmac(&key, &blocks) {
        let err = if encrypted { StegoError::WrongPassword } else { StegoError::DataCorrupted };
        trace.push(ExtractState::Failed(err.to_string()));
        return (Err(err), trace);
    }
    trace.push(ExtractState::Authenticated);
    trace.push(ExtractState::Extracting);

    let sizes = match blocks.sizes() {
        Ok(s) => s,
        Err(_) => {
            trace.push(ExtractState::Failed(StegoError::DataCorrupted.to_string()));
            return (Err(StegoError::DataCorrupted), trace);
        }
    };
    let filenames = blocks.filenames();

    let mut extracted_files = Vec::new();
    for i in 0..sizes.len().min(filenames.len()) {
        let n = sizes[i];
        if index + n > samples.len() {
            trace.push(ExtractState::Failed(StegoError::DataCorrupted.to_string()));
            return (Err(StegoError::DataCorrupted), trace);
        }
        let bytes = bits::unpack(samples, index, n, depth);
        extracted_files.push((filenames[i].clone(), bytes));
        index += n;
    }

    trace.push(ExtractState::Done);
    (Ok(ExtractedPayload { metadata: blocks, extracted_files }), trace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::Quality;

    const KEY: &[u8] = b"process-secret";

    #[test]
    fn s1_happy_plain_round_trip() {
        let mut samples = vec![0i32; 2000];
        let mut files = vec![SecretFile::from_bytes("hello.txt", b"Hello, world!".to_vec()).unwrap()];

        let space = free_space(&samples, &mut files, Quality::Medium, false, None, KEY).unwrap();
        assert!(space > 0);

        embed(&mut samples, &mut files, Quality::Medium, false, None, KEY).unwrap();
        let extracted = extract_data(&samples, None, KEY).unwrap();
        assert_eq!(extracted.extracted_files, vec![("hello.txt".to_string(), b"Hello, world!".to_vec())]);
    }

    #[test]
    fn s2_capacity_fail() {
        let mut samples = vec![0i32; 10];
        let mut files = vec![SecretFile::from_bytes("big.bin", vec![0u8; 100]).unwrap()];
        let err = embed(&mut samples, &mut files, Quality::Medium, false, None, KEY).unwrap_err();
        assert!(matches!(err, StegoError::RunOutOfFreeSpace));
    }

    #[test]
    fn s3_password_required() {
        let mut samples = vec![0i32; 4000];
        let mut files = vec![SecretFile::from_bytes("a.txt", b"secret".to_vec()).unwrap()];
        embed(&mut samples, &mut files, Quality::Medium, false, Some("alpha"), KEY).unwrap();
        let err = extract_data(&samples, None, KEY).unwrap_err();
        assert!(matches!(err, StegoError::RequirePassword));
    }

    #[test]
    fn s4_wrong_password() {
        let mut samples = vec![0i32; 4000];
        let mut files = vec![SecretFile::from_bytes("a.txt", b"secret".to_vec()).unwrap()];
        embed(&mut samples, &mut files, Quality::Medium, false, Some("alpha"), KEY).unwrap();
        let err = extract_data(&samples, Some("beta"), KEY).unwrap_err();
        assert!(matches!(err, StegoError::WrongPassword));
    }

    #[test]
    fn s5_tamper_no_password_is_data_corrupted() {
        let mut samples = vec![0i32; 4000];
        let mut files = vec![SecretFile::from_bytes("a.txt", b"secret".to_vec()).unwrap()];
        embed(&mut samples, &mut files, Quality::Medium, false, None, KEY).unwrap();
        samples[50] ^= 1;
        let err = extract_data(&samples, None, KEY).unwrap_err();
        assert!(matches!(err, StegoError::DataCorrupted));
    }

    #[test]
    fn s5_tamper_with_password_is_wrong_password() {
        let mut samples = vec![0i32; 4000];
        let mut files = vec![SecretFile::from_bytes("a.txt", b"secret".to_vec()).unwrap()];
        embed(&mut samples, &mut files, Quality::Medium, false, Some("alpha"), KEY).unwrap();
        samples[50] ^= 1;
        let err = extract_data(&samples, Some("alpha"), KEY).unwrap_err();
        assert!(matches!(err, StegoError::WrongPassword));
    }

    #[test]
    fn s6_multi_file_ordering() {
        let mut samples = vec![0i32; 8000];
        let mut files = vec![
            SecretFile::from_bytes("a.txt", b"AAA".to_vec()).unwrap(),
            SecretFile::from_bytes("b.txt", b"BBBB".to_vec()).unwrap(),
            SecretFile::from_bytes("c.txt", b"CC".to_vec()).unwrap(),
        ];
        embed(&mut samples, &mut files, Quality::High, false, None, KEY).unwrap();
        let extracted = extract_data(&samples, None, KEY).unwrap();
        assert_eq!(
            extracted.extracted_files,
            vec![
                ("a.txt".to_string(), b"AAA".to_vec()),
                ("b.txt".to_string(), b"BBBB".to_vec()),
                ("c.txt".to_string(), b"CC".to_vec()),
            ]
        );
    }

    #[test]
    fn s7_depth_auto_detect() {
        let mut samples = vec![0i32; 2000];
        let mut files = vec![SecretFile::from_bytes("a.txt", b"x".to_vec()).unwrap()];
        embed(&mut samples, &mut files, Quality::VeryLow, false, None, KEY).unwrap();
        assert_eq!(header::probe_quality(&samples), Some(Quality::VeryLow));
        let extracted = extract_data(&samples, None, KEY).unwrap();
        assert_eq!(extracted.extracted_files[0].0, "a.txt");
    }

    #[test]
    fn carrier_preservation_high_bits_untouched() {
        let mut samples = vec![0x7FFFi32; 2000];
        let original = samples.clone();
        let mut files = vec![SecretFile::from_bytes("a.txt", b"x".to_vec()).unwrap()];
        let depth = Quality::Medium.depth();
        embed(&mut samples, &mut files, Quality::Medium, false, None, KEY).unwrap();
        for (before, after) in original.iter().zip(samples.iter()) {
            assert_eq!(before >> depth, after >> depth);
        }
    }

    #[test]
    fn inspect_does_not_mutate() {
        let mut samples = vec![0i32; 4000];
        let mut files = vec![SecretFile::from_bytes("a.txt", b"secret".to_vec()).unwrap()];
        embed(&mut samples, &mut files, Quality::Medium, false, None, KEY).unwrap();
        let before = samples.clone();
        let _ = get_header_blocks(&samples, None, KEY).unwrap();
        assert_eq!(before, samples);
    }

    #[test]
    fn extract_state_trace_reaches_done() {
        let mut samples = vec![0i32; 4000];
        let mut files = vec![SecretFile::from_bytes("a.txt", b"secret".to_vec()).unwrap()];
        embed(&mut samples, &mut files, Quality::Medium, false, None, KEY).unwrap();
        let (result, trace) = extract_data_tracked(&samples, None, KEY);
        assert!(result.is_ok());
        assert_eq!(
            trace,
            vec![
                ExtractState::Idle,
                ExtractState::HeaderParsed,
                ExtractState::Authenticated,
                ExtractState::Extracting,
                ExtractState::Done,
            ]
        );
    }

    #[test]
    fn extract_state_trace_terminates_in_failed_on_no_payload() {
        let samples = vec![0i32; 1000];
        let (result, trace) = extract_data_tracked(&samples, None, KEY);
        assert!(result.is_err());
        assert!(matches!(trace.last(), Some(ExtractState::Failed(_))));
    }
}
