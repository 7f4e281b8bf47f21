//! Error types and handling infrastructure for input-overlay.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! custom error types. The binary layers `anyhow` on top for context.
//!
//! ## Propagation
//!
//! - **Load-time errors** (`ConfigError`, `AssetError`) abort only the overlay instance
//!   being opened and are returned to the caller as values
//! - **Degradations** (`HookInstallError`) are logged; the overlay keeps running
//! - **Steady-state errors** (`TransientInputRead`) never leave the tick loop

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for input-overlay operations.
#[derive(Error, Debug)]
pub enum OverlayError {
    /// Malformed or missing layout fields
    #[error("Invalid layout: {message}")]
    ConfigError { message: String },

    /// Missing or corrupt texture/layout file
    #[error("Asset unavailable ({path}): {message}")]
    AssetError {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The system-wide wheel observer could not be installed
    #[error("Global input observer unavailable: {message}")]
    HookInstallError { message: String },

    /// A single poll of a physical input code failed
    #[error("Failed to read input code {code:#04x}: {message}")]
    TransientInputRead { code: u16, message: String },

    /// The overlay's processing loop is no longer running
    #[error("Overlay engine has stopped")]
    EngineStopped,

    /// Generic error for cases not covered by specific variants
    #[error("Operation failed: {message}")]
    Other { message: String },
}

/// Standard Result type for input-overlay operations.
pub type Result<T> = std::result::Result<T, OverlayError>;

impl OverlayError {
    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an AssetError without an underlying io error
    pub fn asset(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::AssetError {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create an AssetError from an io::Error
    pub fn asset_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = match source.kind() {
            std::io::ErrorKind::NotFound => "file not found".to_string(),
            std::io::ErrorKind::PermissionDenied => "permission denied".to_string(),
            _ => "read failed".to_string(),
        };
        Self::AssetError {
            path: path.into(),
            message,
            source: Some(source),
        }
    }

    /// Create a HookInstallError with a descriptive message
    pub fn hook_install(message: impl Into<String>) -> Self {
        Self::HookInstallError {
            message: message.into(),
        }
    }

    /// Create a TransientInputRead error for one input code
    pub fn input_read(code: u16, message: impl Into<String>) -> Self {
        Self::TransientInputRead {
            code,
            message: message.into(),
        }
    }

    /// Create a generic Other error with a descriptive message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Whether this error is fatal to loading an overlay instance.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::ConfigError { .. } | Self::AssetError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let config = OverlayError::config("canvas.size is required");
        assert_eq!(config.to_string(), "Invalid layout: canvas.size is required");

        let asset = OverlayError::asset("/tmp/keys.png", "unsupported image format");
        assert_eq!(
            asset.to_string(),
            "Asset unavailable (/tmp/keys.png): unsupported image format"
        );

        let read = OverlayError::input_read(0x41, "device lost");
        assert_eq!(read.to_string(), "Failed to read input code 0x41: device lost");
    }

    #[test]
    fn test_asset_io_keeps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = OverlayError::asset_io("/missing/layout.json", io_err);

        match &err {
            OverlayError::AssetError {
                message, source, ..
            } => {
                assert_eq!(message, "file not found");
                assert!(source.is_some());
            }
            _ => panic!("Expected AssetError variant"),
        }
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_load_failure_classification() {
        assert!(OverlayError::config("bad").is_load_failure());
        assert!(OverlayError::asset("/x", "bad").is_load_failure());
        assert!(!OverlayError::hook_install("denied").is_load_failure());
        assert!(!OverlayError::input_read(1, "busy").is_load_failure());
        assert!(!OverlayError::EngineStopped.is_load_failure());
    }
}
