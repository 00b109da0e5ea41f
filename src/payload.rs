//! `ExtractedPayload`: the result of a successful `extract_data` call.

use crate::header::HeaderBlocks;

/// Header metadata plus the ordered `(name, bytes)` pairs recovered from a
/// carrier. The bytes here are exactly the on-wire bytes written during
/// embed — decrypting/decompressing them back to the original file content
/// is the archive builder's job, not the engine's (see the crate's module
/// doc comment).
#[derive(Debug, Clone)]
pub struct ExtractedPayload {
    pub metadata: HeaderBlocks,
    pub extracted_files: Vec<(String, Vec<u8>)>,
}

impl ExtractedPayload {
    pub fn is_encrypted(&self) -> bool {
        self.metadata.is_encrypted()
    }

    pub fn is_compressed(&self) -> bool {
        self.metadata.is_compressed()
    }

    pub fn version(&self) -> &str {
        self.metadata.version()
    }

    pub fn filenames(&self) -> Vec<String> {
        self.extracted_files.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.extracted_files.iter().map(|(_, bytes)| bytes.len()).collect()
    }
}
