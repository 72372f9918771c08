//! Save/restore errors

use std::path::PathBuf;

use sv_core::CampaignError;
use thiserror::Error;

/// Save/restore errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Invalid save path: {0}")]
    InvalidPath(String),

    #[error("No active campaign to save")]
    NoActiveCampaign,

    #[error("Save file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid save file (bad magic number)")]
    InvalidMagic,

    #[error("Unsupported save format: expected {expected}, found {found}")]
    UnsupportedFormat { expected: u32, found: u32 },

    #[error("Save file holds '{found}', expected '{expected}'")]
    TypeMismatch { expected: String, found: String },

    #[error("Incompatible save version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("Save file truncated")]
    Truncated,

    #[error("Save file corrupted (checksum mismatch: expected {expected:#010x}, found {found:#010x})")]
    ChecksumMismatch { expected: u32, found: u32 },

    #[error("Encoding error: {0}")]
    Encode(String),

    #[error("Decoding error: {0}")]
    Decode(String),

    #[error("Restored campaign is inconsistent: {0}")]
    Reconstruction(#[from] CampaignError),
}

impl SaveError {
    /// Whether this is a load failure: missing, unreadable, foreign,
    /// truncated, corrupted or inconsistent data. Argument errors are not.
    pub fn is_load_failure(&self) -> bool {
        !matches!(self, SaveError::InvalidPath(_) | SaveError::NoActiveCampaign)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SaveError::IncompatibleVersion {
            expected: 1,
            found: 7,
        };
        assert!(err.to_string().contains("expected 1, found 7"));

        let err = SaveError::ChecksumMismatch {
            expected: 0xdead,
            found: 0xbeef,
        };
        assert!(err.to_string().contains("0x0000dead"));
    }

    #[test]
    fn test_load_failure_grouping() {
        assert!(SaveError::Truncated.is_load_failure());
        assert!(SaveError::NotFound(PathBuf::from("x")).is_load_failure());
        assert!(SaveError::InvalidMagic.is_load_failure());
        assert!(!SaveError::InvalidPath(String::new()).is_load_failure());
        assert!(!SaveError::NoActiveCampaign.is_load_failure());
    }
}
