//! Error handling for rtfx
//!
//! Nothing in the audio path is fatal. The queue and source errors are
//! rejections the caller recovers from by emitting silence or dropping a
//! block; parameter errors are clamped at the configuration boundary.

use thiserror::Error;

/// Result type alias for rtfx operations
pub type Result<T> = std::result::Result<T, RtfxError>;

/// Main error type for rtfx operations
#[derive(Error, Debug)]
pub enum RtfxError {
    // Queue Errors (raised on the real-time path, integer payloads only)
    #[error("Buffer full: {requested} samples requested, {free} free")]
    BufferFull { requested: usize, free: usize },

    #[error("Buffer underrun: {requested} samples requested, {available} available")]
    BufferUnderrun { requested: usize, available: usize },

    #[error("Sample source exhausted")]
    SourceExhausted,

    // Configuration Errors
    #[error("Invalid parameter {param}: {value} (expected {expected})")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    // File Errors
    #[error("File not found: {path}")]
    FileNotFound {
        path: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Audio contains no samples")]
    EmptyAudio,

    // Device Errors
    #[error("Audio device error: {reason}")]
    Device { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RtfxError {
    /// Shorthand for building an `InvalidParameter` error
    pub fn invalid_parameter(
        param: &str,
        value: impl ToString,
        expected: impl Into<String>,
    ) -> Self {
        RtfxError::InvalidParameter {
            param: param.to_string(),
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            RtfxError::BufferFull { .. } => "BUFFER_FULL",
            RtfxError::BufferUnderrun { .. } => "BUFFER_UNDERRUN",
            RtfxError::SourceExhausted => "SOURCE_EXHAUSTED",
            RtfxError::InvalidParameter { .. } => "INVALID_PARAMETER",
            RtfxError::FileNotFound { .. } => "FILE_NOT_FOUND",
            RtfxError::InvalidAudio { .. } => "INVALID_AUDIO",
            RtfxError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            RtfxError::EmptyAudio => "EMPTY_AUDIO",
            RtfxError::Device { .. } => "DEVICE_ERROR",
            RtfxError::Io(_) => "IO_ERROR",
            RtfxError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable without stopping the engine
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RtfxError::BufferFull { .. }
                | RtfxError::BufferUnderrun { .. }
                | RtfxError::SourceExhausted
                | RtfxError::InvalidParameter { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            RtfxError::BufferFull { .. } => vec![
                "The block was dropped; the render side is not keeping up",
                "Increase ring_capacity in the engine settings",
            ],
            RtfxError::BufferUnderrun { .. } => vec![
                "The block was rendered as silence",
                "Check that the capture device is delivering audio",
            ],
            RtfxError::SourceExhausted => vec![
                "Playback reached the end of the file",
                "Use looping playback to repeat the file",
            ],
            RtfxError::InvalidParameter { .. } => vec![
                "Check the value against the documented range",
                "Remove the setting to fall back to its default",
            ],
            RtfxError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            RtfxError::InvalidAudio { .. } => vec![
                "Try converting the file to WAV format first",
                "The file may be corrupted - try re-exporting from source",
            ],
            RtfxError::UnsupportedFormat { .. } => vec![
                "Convert to 16-bit or float WAV at the engine sample rate",
            ],
            RtfxError::Device { .. } => vec![
                "Check that an input and an output device are connected",
                "Try a different sample rate or block size",
            ],
            _ => vec![],
        }
    }
}
