//! WAV carrier adapter: the one real audio codec this crate decodes/encodes
//! itself, so the CLI is runnable end-to-end against real files.
//!
//! FLAC and AIFF are named as supported carriers by the external interface
//! (see the crate's module doc comment) but are not decoded here — that
//! decode/encode step is explicitly an external collaborator's job per the
//! scope this crate was built to. [`UnsupportedCarrier`] makes that boundary
//! a real type instead of a silent no-op.

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PcmError {
    #[error("WAV read/write error: {0}")]
    Wav(#[from] hound::Error),
    #[error("carrier format not decoded by this crate: {0} (external collaborator boundary)")]
    UnsupportedCarrier(String),
}

/// Enough of a WAV's format to re-encode samples back into an equivalent
/// container after embedding/extracting mutates them.
#[derive(Debug, Clone, Copy)]
pub struct WavMeta {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

/// Decode a WAV file into an `i32` sample buffer plus enough metadata to
/// re-encode it. Samples are widened from their native width (commonly 16-bit)
/// into `i32`, the engine's working representation.
pub fn read_wav(path: impl AsRef<Path>) -> Result<(WavMeta, Vec<i32>), PcmError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let meta = WavMeta {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
    };
    let samples: Result<Vec<i32>, hound::Error> = reader.samples::<i32>().collect();
    Ok((meta, samples?))
}

/// Re-encode a sample buffer (same length and order as what [`read_wav`]
/// produced) back into a WAV file with the original format.
pub fn write_wav(path: impl AsRef<Path>, meta: WavMeta, samples: &[i32]) -> Result<(), PcmError> {
    let spec = hound::WavSpec {
        channels: meta.channels,
        sample_rate: meta.sample_rate,
        bits_per_sample: meta.bits_per_sample,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// FLAC carrier decode is out of scope for this crate; see the module doc comment.
pub fn read_flac(_path: impl AsRef<Path>) -> Result<(WavMeta, Vec<i32>), PcmError> {
    Err(PcmError::UnsupportedCarrier("FLAC".to_string()))
}

/// AIFF carrier decode is out of scope for this crate; see the module doc comment.
pub fn read_aiff(_path: impl AsRef<Path>) -> Result<(WavMeta, Vec<i32>), PcmError> {
    Err(PcmError::UnsupportedCarrier("AIFF".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn wav_round_trip() {
        let meta = WavMeta { channels: 1, sample_rate: 44_100, bits_per_sample: 16 };
        let samples: Vec<i32> = (0..2000i32).map(|i| (i % 200) - 100).collect();

        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), meta, &samples).unwrap();

        let (read_meta, read_samples) = read_wav(file.path()).unwrap();
        assert_eq!(read_meta.channels, meta.channels);
        assert_eq!(read_meta.sample_rate, meta.sample_rate);
        assert_eq!(read_samples, samples);
    }

    #[test]
    fn flac_is_unsupported() {
        assert!(matches!(read_flac("whatever.flac"), Err(PcmError::UnsupportedCarrier(_))));
    }
}
