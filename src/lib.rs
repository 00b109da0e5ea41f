//! # ciphernest — authenticated LSB audio steganography engine
//!
//! Format guarantees:
//! - The carrier's high bits above the configured depth are never touched
//! - A payload is self-describing: magic string, then length-prefixed ASCII
//!   blocks (`CF`, `EF`, `VERSION`, `FILENAMES`, `EMBEDDED_SIZES`, `HMAC`)
//! - `HMAC` authenticates header metadata only; payload confidentiality (not
//!   authenticity) comes from the optional AES-256-CBC envelope
//! - Embedding depth is a whole-payload property, auto-detected from the
//!   magic string — never mixed within one carrier
//! - `extract_data` returns on-wire bytes as embedded; decrypting/
//!   decompressing them back to original file content is the caller's job
//!   (the archive-builder layer), not this crate's

pub mod archive_builder;
pub mod bits;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod engine;
pub mod error;
pub mod header;
pub mod payload;
pub mod quality;
pub mod response;
pub mod secret_file;
pub mod wav;

pub use config::{Config, ConfigError};
pub use engine::{embed, extract_data, extract_data_tracked, free_space, get_header_blocks, ExtractState};
pub use error::{StegoError, CODE_OK_ALREADY_EMBEDDED, CODE_OK_FREE_SPACE};
pub use header::HeaderBlocks;
pub use payload::ExtractedPayload;
pub use quality::Quality;
pub use response::{EmbedResponse, ErrorResponse, ExtractResponse, InspectResponse};
pub use secret_file::SecretFile;
