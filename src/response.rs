//! Response records for the three external operations of the crate's HTTP
//! shim boundary (`inspect`, `embed`, `extract`): a pure, side-effect-free
//! mapping from core results/errors to the stable two-digit codes and
//! `serde`-friendly shapes an HTTP layer would serialize and send back.
//!
//! This module carries no transport dependency — no HTTP types, nothing
//! beyond the `serde`/`serde_json` the rest of the crate already derives
//! `Serialize` with.

use serde::Serialize;

use crate::error::{StegoError, CODE_OK_ALREADY_EMBEDDED, CODE_OK_FREE_SPACE};
use crate::header::HeaderBlocks;

/// Response for a successful `inspect` call.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "code")]
pub enum InspectResponse {
    /// Carrier already holds a payload embedded by this system.
    #[serde(rename = "03")]
    AlreadyEmbedded { filenames: Vec<String>, sizes: Vec<usize>, version: String },
    /// Carrier is empty; reports remaining capacity for the requested plan.
    #[serde(rename = "00")]
    FreeSpace { free_space_bytes: isize },
}

impl InspectResponse {
    pub fn already_embedded(blocks: &HeaderBlocks) -> Result<InspectResponse, StegoError> {
        Ok(InspectResponse::AlreadyEmbedded {
            filenames: blocks.filenames(),
            sizes: blocks.sizes().map_err(|_| StegoError::DataCorrupted)?,
            version: blocks.version().to_string(),
        })
    }

    pub fn free_space(free_space_bytes: isize) -> InspectResponse {
        InspectResponse::FreeSpace { free_space_bytes }
    }

    pub fn code(&self) -> &'static str {
        match self {
            InspectResponse::AlreadyEmbedded { .. } => CODE_OK_ALREADY_EMBEDDED,
            InspectResponse::FreeSpace { .. } => CODE_OK_FREE_SPACE,
        }
    }
}

/// Response for a successful `embed` call: the re-encoded carrier is handed
/// back through whatever container adapter the caller used, so the only
/// thing this record carries is the stable success code.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedResponse {
    pub code: &'static str,
    pub files_embedded: usize,
}

impl EmbedResponse {
    pub fn ok(files_embedded: usize) -> EmbedResponse {
        EmbedResponse { code: CODE_OK_FREE_SPACE, files_embedded }
    }
}

/// Response for a successful `extract` call.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractResponse {
    pub code: &'static str,
    pub filenames: Vec<String>,
}

impl ExtractResponse {
    pub fn ok(filenames: Vec<String>) -> ExtractResponse {
        ExtractResponse { code: CODE_OK_FREE_SPACE, filenames }
    }
}

/// A failure from any of the three operations, shaped for direct
/// serialization into an error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

impl From<&StegoError> for ErrorResponse {
    fn from(err: &StegoError) -> ErrorResponse {
        ErrorResponse { code: err.code(), message: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_space_response_serializes_with_success_code() {
        let resp = InspectResponse::free_space(128);
        assert_eq!(resp.code(), "00");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"code\":\"00\""));
        assert!(json.contains("\"free_space_bytes\":128"));
    }

    #[test]
    fn already_embedded_response_serializes_with_metadata() {
        let blocks = HeaderBlocks {
            compressed: false,
            encrypted: false,
            version: "1.0".to_string(),
            filenames: "a.txt/b.txt".to_string(),
            sizes: "10/20".to_string(),
            hmac: vec![0u8; 32],
        };
        let resp = InspectResponse::already_embedded(&blocks).unwrap();
        assert_eq!(resp.code(), "03");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"code\":\"03\""));
        assert!(json.contains("a.txt"));
    }

    #[test]
    fn error_response_carries_stable_code() {
        let err = StegoError::RequirePassword;
        let resp = ErrorResponse::from(&err);
        assert_eq!(resp.code, "08");
    }
}
