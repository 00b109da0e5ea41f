//! Shared error taxonomy for the steganographic engine, plus the stable
//! two-digit response codes an HTTP shim would map these onto.

use thiserror::Error;

/// Every way an `inspect` / `embed` / `extract` call can fail.
#[derive(Error, Debug)]
pub enum StegoError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not enough free space in the carrier for this payload")]
    RunOutOfFreeSpace,

    #[error("carrier does not contain a payload embedded by this system")]
    NotEmbeddedBySystem,

    #[error("a passphrase is required to extract this payload")]
    RequirePassword,

    #[error("wrong passphrase")]
    WrongPassword,

    #[error("payload data is corrupted")]
    DataCorrupted,

    #[error("internal error: {0}")]
    Internal(String),
}

impl StegoError {
    /// Stable two-digit response code (see the response-code table).
    ///
    /// `05` and `08` are deliberately distinct: the source this system was
    /// modeled on conflated "invalid request" and "password required" under
    /// one code. Here `05` is invalid-request-only and `08` is
    /// require-password-only.
    pub const fn code(&self) -> &'static str {
        match self {
            StegoError::InvalidArgument(_) => "05",
            StegoError::RunOutOfFreeSpace => "01",
            StegoError::NotEmbeddedBySystem => "02",
            StegoError::RequirePassword => "08",
            StegoError::WrongPassword => "06",
            StegoError::DataCorrupted => "07",
            StegoError::Internal(_) => "04",
        }
    }

    /// HTTP status class an illustrative HTTP shim would use for this error.
    pub const fn http_status(&self) -> u16 {
        match self {
            StegoError::Internal(_) => 500,
            _ => 400,
        }
    }
}

/// Response code for a successful `inspect` call reporting remaining capacity.
pub const CODE_OK_FREE_SPACE: &str = "00";
/// Response code for a successful `inspect` call reporting an existing payload.
pub const CODE_OK_ALREADY_EMBEDDED: &str = "03";
