//! Framed header: magic string, CF/EF/VERSION/FILENAMES/SIZES/HMAC blocks,
//! concurrent depth probing, and the delimiter-scanning block parser.
//!
//! ```text
//! MAGIC | CF_block | EF_block | VERSION_block | FILENAMES_block | SIZES_block | HMAC_block
//! ```
//! Every block after `MAGIC` is `ASCII_decimal_length · "BLK" · payload`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use crate::bits;
use crate::quality::{Quality, ALL as ALL_QUALITIES};

/// Literal magic string prefix, emitted without a length prefix.
pub const MAGIC: &[u8] = b"CipherNest";
/// Literal 3-byte block delimiter separating a block's ASCII length from its payload.
pub const DELIMITER: &[u8] = b"BLK";
/// Current header version string, embedded in the VERSION block.
pub const VERSION: &str = "1.0";
/// Raw HMAC-SHA256 output length.
pub const HMAC_LEN: usize = 32;

/// Below this many samples, `probe_quality` runs sequentially instead of
/// fanning out — four threads for a handful of samples is pure overhead.
/// Matches the "<64 KiB" guidance for 16-bit carriers (2 bytes/sample).
const SEQUENTIAL_PROBE_THRESHOLD_SAMPLES: usize = 32 * 1024;

#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("carrier does not contain a payload embedded by this system")]
    NotEmbedded,
    #[error("header is corrupted")]
    Corrupted,
}

/// Parsed header metadata — the "blocks" referenced throughout the spec.
#[derive(Debug, Clone)]
pub struct HeaderBlocks {
    pub compressed: bool,
    pub encrypted: bool,
    pub version: String,
    pub filenames: String,
    pub sizes: String,
    pub hmac: Vec<u8>,
}

impl HeaderBlocks {
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }
    pub fn version(&self) -> &str {
        &self.version
    }
    pub fn filenames(&self) -> Vec<String> {
        crate::secret_file::split_filenames(&self.filenames)
    }
    pub fn sizes(&self) -> Result<Vec<usize>, HeaderError> {
        crate::secret_file::split_sizes(&self.sizes).map_err(|_| HeaderError::Corrupted)
    }

    fn hmac_input(&self) -> Vec<u8> {
        let mut v = Vec::new();
        v.push(if self.compressed { b'1' } else { b'0' });
        v.push(if self.encrypted { b'1' } else { b'0' });
        v.extend_from_slice(self.version.as_bytes());
        v.extend_from_slice(self.filenames.as_bytes());
        v.extend_from_slice(self.sizes.as_bytes());
        v
    }
}

fn wrap_block(payload: &[u8]) -> Vec<u8> {
    let mut out = payload.len().to_string().into_bytes();
    out.extend_from_slice(DELIMITER);
    out.extend_from_slice(payload);
    out
}

fn compute_hmac(key: &[u8], input: &[u8]) -> Vec<u8> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(input);
    mac.finalize().into_bytes().to_vec()
}

/// Build the full header byte string for one embed.
///
/// `hmac_key` is the passphrase's UTF-8 bytes if present, else the process
/// `SECRET_KEY` — callers resolve that choice before calling.
#[allow(clippy::too_many_arguments)]
pub fn build(
    compressed: bool,
    encrypted: bool,
    filenames: &str,
    sizes: &str,
    hmac_key: &[u8],
) -> Vec<u8> {
    let cf = [if compressed { b'1' } else { b'0' }];
    let ef = [if encrypted { b'1' } else { b'0' }];

    let blocks = HeaderBlocks {
        compressed,
        encrypted,
        version: VERSION.to_string(),
        filenames: filenames.to_string(),
        sizes: sizes.to_string(),
        hmac: Vec::new(),
    };
    let tag = compute_hmac(hmac_key, &blocks.hmac_input());

    let mut out = Vec::new();
    out.extend_from_slice(MAGIC);
    out.extend(wrap_block(&cf));
    out.extend(wrap_block(&ef));
    out.extend(wrap_block(VERSION.as_bytes()));
    out.extend(wrap_block(filenames.as_bytes()));
    out.extend(wrap_block(sizes.as_bytes()));
    out.extend(wrap_block(&tag));
    out
}

/// Verify `blocks`'s stored HMAC against one freshly computed with `key`,
/// in constant time.
pub fn verify_hmac(key: &[u8], blocks: &HeaderBlocks) -> bool {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(&blocks.hmac_input());
    mac.verify_slice(&blocks.hmac).is_ok()
}

/// Number of samples the magic string occupies at a given depth.
pub fn magic_sample_count(depth: u8) -> usize {
    bits::samples_for_bytes(MAGIC.len(), depth)
}

fn probe_one(samples: &[i32], quality: Quality) -> Option<Quality> {
    let depth = quality.depth();
    let n = magic_sample_count(depth);
    if n > samples.len() {
        return None;
    }
    if bits::unpack(samples, 0, n, depth) == MAGIC {
        Some(quality)
    } else {
        None
    }
}

/// Try all four candidate depths for a magic-string match.
///
/// Conceptually a data-parallel fan-out with a join barrier: each candidate
/// is an independent pure function over a disjoint read-only prefix of
/// `samples`; the first true result in quality-map order (not completion
/// order) wins. Collapses to a sequential scan for small buffers, which is
/// observably identical since completion order never affects the result.
pub fn probe_quality(samples: &[i32]) -> Option<Quality> {
    if samples.len() < SEQUENTIAL_PROBE_THRESHOLD_SAMPLES {
        return ALL_QUALITIES.iter().find_map(|&q| probe_one(samples, q));
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        // `par_iter().map().collect()` preserves input order regardless of
        // which thread finishes first, so picking the first `Some` here is
        // picking the first match in quality-map order, not completion order.
        let results: Vec<Option<Quality>> =
            ALL_QUALITIES.par_iter().map(|&q| probe_one(samples, q)).collect();
        results.into_iter().flatten().next()
    }
    #[cfg(not(feature = "parallel"))]
    {
        ALL_QUALITIES.iter().find_map(|&q| probe_one(samples, q))
    }
}

fn read_one_byte(samples: &[i32], depth: u8, index: usize) -> Result<u8, HeaderError> {
    let chunks_per_byte = 8 / depth as usize;
    if index + chunks_per_byte > samples.len() {
        return Err(HeaderError::Corrupted);
    }
    Ok(bits::unpack(samples, index, chunks_per_byte, depth)[0])
}

/// Scan sample-by-byte from `start` until the `BLK` delimiter appears,
/// parse the preceding ASCII-decimal length, then consume that many bytes'
/// worth of samples as the block payload. Returns `(payload, next_index)`.
fn next_block(samples: &[i32], depth: u8, start: usize) -> Result<(Vec<u8>, usize), HeaderError> {
    let chunks_per_byte = 8 / depth as usize;
    let mut idx = start;
    let mut scanned = Vec::new();
    loop {
        let byte = read_one_byte(samples, depth, idx)?;
        idx += chunks_per_byte;
        scanned.push(byte);
        if scanned.len() >= DELIMITER.len() && &scanned[scanned.len() - DELIMITER.len()..] == DELIMITER {
            break;
        }
        if scanned.len() > 32 {
            // A sane ASCII-decimal length prefix is never this long; bail
            // out rather than scanning the whole buffer on corrupt input.
            return Err(HeaderError::Corrupted);
        }
    }
    let length_bytes = &scanned[..scanned.len() - DELIMITER.len()];
    let length: usize = std::str::from_utf8(length_bytes)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(HeaderError::Corrupted)?;
    let num_samples = bits::samples_for_bytes(length, depth);
    if idx + num_samples > samples.len() {
        return Err(HeaderError::Corrupted);
    }
    let payload = bits::unpack(samples, idx, num_samples, depth);
    Ok((payload, idx + num_samples))
}

/// Parse the six header blocks (`CF, EF, VERSION, FILENAMES, EMBEDDED_SIZES,
/// HMAC`) starting at `start` (the first sample after the magic string).
/// Returns the parsed blocks and the index of the first payload sample.
pub fn parse_blocks(samples: &[i32], depth: u8, start: usize) -> Result<(HeaderBlocks, usize), HeaderError> {
    let (cf, idx) = next_block(samples, depth, start)?;
    let (ef, idx) = next_block(samples, depth, idx)?;
    let (version, idx) = next_block(samples, depth, idx)?;
    let (filenames, idx) = next_block(samples, depth, idx)?;
    let (sizes, idx) = next_block(samples, depth, idx)?;
    let (hmac, idx) = next_block(samples, depth, idx)?;

    if hmac.len() != HMAC_LEN {
        return Err(HeaderError::Corrupted);
    }

    Ok((
        HeaderBlocks {
            compressed: cf == b"1",
            encrypted: ef == b"1",
            version: String::from_utf8_lossy(&version).into_owned(),
            filenames: String::from_utf8_lossy(&filenames).into_owned(),
            sizes: String::from_utf8_lossy(&sizes).into_owned(),
            hmac,
        },
        idx,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embed_header(samples: &mut [i32], depth: u8, header: &[u8]) -> usize {
        bits::pack(samples, 0, header, depth)
    }

    #[test]
    fn build_then_parse_round_trip() {
        let key = b"secret";
        let header = build(true, false, "a.txt/b.txt", "10/20", key);
        let depth = 2u8;
        let needed = bits::samples_for_bytes(header.len(), depth);
        let mut samples = vec![0i32; needed];
        embed_header(&mut samples, depth, &header);

        assert_eq!(probe_quality(&samples), Quality::from_depth(depth));
        let start = magic_sample_count(depth);
        let (blocks, next) = parse_blocks(&samples, depth, start).unwrap();
        assert_eq!(next, needed);
        assert!(blocks.is_compressed());
        assert!(!blocks.is_encrypted());
        assert_eq!(blocks.version(), "1.0");
        assert_eq!(blocks.filenames(), vec!["a.txt", "b.txt"]);
        assert_eq!(blocks.sizes().unwrap(), vec![10, 20]);
        assert!(verify_hmac(key, &blocks));
        assert!(!verify_hmac(b"wrong", &blocks));
    }

    #[test]
    fn probe_quality_absent_on_silence() {
        let samples = vec![0i32; 1000];
        assert_eq!(probe_quality(&samples), None);
    }

    #[test]
    fn tampered_header_byte_breaks_hmac() {
        let key = b"secret";
        let header = build(false, false, "a.txt", "8", key);
        let depth = 1u8;
        let needed = bits::samples_for_bytes(header.len(), depth);
        let mut samples = vec![0i32; needed];
        embed_header(&mut samples, depth, &header);
        samples[50] ^= 1;
        let start = magic_sample_count(depth);
        let (blocks, _) = parse_blocks(&samples, depth, start).unwrap();
        assert!(!verify_hmac(key, &blocks));
    }
}
